//! Closed-form signal synthesis.
//!
//! Each family in the catalog is a pure function of an integer sample
//! index. The generators are total over `i64`: they never panic, never
//! overflow and never return NaN, returning 0 outside their support.

use crate::correlation::MAX_TABLE_SAMPLES;
use crate::error::{DspError, DspResult};
use lib_types::signal::SignalFamily;
use std::f64::consts::PI;
use std::ops::RangeInclusive;

/// Half-width of the rectangular pulse.
const RECT_HALF_WIDTH: u128 = 3;

/// Half-width of the triangular pulse (value reaches 0 here).
const TRI_HALF_WIDTH: u128 = 5;

/// Gaussian variance term: x(n) = exp(-n^2 / GAUSS_SPREAD).
const GAUSS_SPREAD: f64 = 10.0;

/// Half-width of the windowed cosine burst.
const SINE_HALF_WIDTH: u128 = 8;

/// Pulse train period and pulse width, in samples.
const TRAIN_PERIOD: i128 = 8;
const TRAIN_WIDTH: i128 = 3;

/// Evaluate a signal family at a sample index.
pub fn signal_value(index: i64, family: SignalFamily) -> f64 {
    signal_value_wide(index as i128, family)
}

/// Evaluate a signal family at an index outside the `i64` range.
///
/// Shifted lookups `x(n - m)` with `n` and `m` both `i64` land here so
/// that no lag can overflow the index arithmetic. Dispatch is an
/// exhaustive `match`: a new family does not compile until it gets a
/// generator here.
pub fn signal_value_wide(index: i128, family: SignalFamily) -> f64 {
    match family {
        SignalFamily::Rectangular => {
            if index.unsigned_abs() <= RECT_HALF_WIDTH {
                1.0
            } else {
                0.0
            }
        }
        SignalFamily::Triangular => {
            let n = index.unsigned_abs();
            if n > TRI_HALF_WIDTH {
                0.0
            } else {
                1.0 - n as f64 / TRI_HALF_WIDTH as f64
            }
        }
        SignalFamily::Gaussian => {
            let n = index as f64;
            (-(n * n) / GAUSS_SPREAD).exp()
        }
        SignalFamily::DoublePulse => {
            // |n + 4| <= 1 or |n - 4| <= 1
            if matches!(index, -5..=-3 | 3..=5) {
                1.0
            } else {
                0.0
            }
        }
        SignalFamily::SinePulse => {
            if index.unsigned_abs() > SINE_HALF_WIDTH {
                0.0
            } else {
                (index as f64 * PI / 4.0).cos()
            }
        }
        SignalFamily::PulseTrain => {
            // Euclidean remainder keeps negative indices on the same grid
            if index.rem_euclid(TRAIN_PERIOD) < TRAIN_WIDTH {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// x(index - lag), exact for every pair of `i64` inputs.
#[inline]
pub fn shifted_value(index: i64, lag: i64, family: SignalFamily) -> f64 {
    signal_value_wide(index as i128 - lag as i128, family)
}

/// Index range outside which the family is identically zero.
///
/// Returns `None` for families without a bounded support (Gaussian decays
/// but never reaches zero analytically; the pulse train repeats forever).
pub fn support(family: SignalFamily) -> Option<RangeInclusive<i64>> {
    match family {
        SignalFamily::Rectangular => Some(-(RECT_HALF_WIDTH as i64)..=RECT_HALF_WIDTH as i64),
        // the ramp reaches exactly zero at the half-width
        SignalFamily::Triangular => {
            let edge = TRI_HALF_WIDTH as i64 - 1;
            Some(-edge..=edge)
        }
        SignalFamily::DoublePulse => Some(-5..=5),
        SignalFamily::SinePulse => Some(-(SINE_HALF_WIDTH as i64)..=SINE_HALF_WIDTH as i64),
        SignalFamily::Gaussian | SignalFamily::PulseTrain => None,
    }
}

/// Memoized samples of one family over a symmetric index range.
///
/// The signal does not depend on lag, so the correlation engine evaluates
/// it once per range and reads from the table inside its double loop.
/// Lookups outside the range fall back to [`signal_value`], so a table is
/// observably identical to calling the generator directly.
#[derive(Clone, Debug)]
pub struct SampleTable {
    family: SignalFamily,
    radius: i64,
    samples: Vec<f64>,
}

impl SampleTable {
    /// Tabulate `family` over `[-radius, radius]`.
    ///
    /// Fails when the table would hold more than [`MAX_TABLE_SAMPLES`].
    pub fn new(family: SignalFamily, radius: u64) -> DspResult<Self> {
        let requested = radius.checked_mul(2).and_then(|n| n.checked_add(1));

        match requested {
            Some(n) if n <= MAX_TABLE_SAMPLES => Ok(Self::tabulate(family, radius as i64)),
            _ => Err(DspError::WindowTooLarge {
                requested: requested.unwrap_or(u64::MAX),
                max: MAX_TABLE_SAMPLES,
            }),
        }
    }

    /// Unchecked constructor for radii that were already validated.
    pub(crate) fn tabulate(family: SignalFamily, radius: i64) -> Self {
        let samples = (-radius..=radius)
            .map(|n| signal_value(n, family))
            .collect();

        Self {
            family,
            radius,
            samples,
        }
    }

    /// Family this table was built for.
    pub fn family(&self) -> SignalFamily {
        self.family
    }

    /// Half-width of the tabulated range.
    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Raw samples, index `-radius` first.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample at `index`.
    #[inline]
    pub fn get(&self, index: i64) -> f64 {
        self.get_wide(index as i128)
    }

    /// Sample at an index that may lie beyond the `i64` range.
    #[inline]
    pub fn get_wide(&self, index: i128) -> f64 {
        if index.unsigned_abs() <= self.radius as u128 {
            self.samples[(index + self.radius as i128) as usize]
        } else {
            signal_value_wide(index, self.family)
        }
    }

    /// x(index - lag), read from the table where possible.
    #[inline]
    pub fn shifted(&self, index: i64, lag: i64) -> f64 {
        self.get_wide(index as i128 - lag as i128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(n: i64) -> f64 {
        signal_value(n, SignalFamily::Rectangular)
    }

    #[test]
    fn test_rectangular_support() {
        for n in -20i64..=20 {
            let expected = if n.abs() <= 3 { 1.0 } else { 0.0 };
            assert_eq!(rect(n), expected, "Rectangular({})", n);
        }
    }

    #[test]
    fn test_triangular_shape() {
        let tri = |n| signal_value(n, SignalFamily::Triangular);

        assert_eq!(tri(0), 1.0);
        assert_eq!(tri(5), 0.0);
        assert_eq!(tri(-5), 0.0);
        assert!((tri(2) - 0.6).abs() < 1e-12);
        assert!((tri(-4) - 0.2).abs() < 1e-12);

        for n in -30..=30 {
            let v = tri(n);
            assert!((0.0..=1.0).contains(&v), "Triangular({}) = {}", n, v);
            if n.abs() > 5 {
                assert_eq!(v, 0.0);
            }
        }
    }

    #[test]
    fn test_gaussian_decay() {
        let g = |n| signal_value(n, SignalFamily::Gaussian);

        assert_eq!(g(0), 1.0);
        for n in 0..30 {
            assert!(g(n) > 0.0);
            assert!(g(n + 1) < g(n), "Gaussian not decreasing at {}", n);
            assert_eq!(g(n), g(-n));
        }
        assert!((g(1) - (-0.1f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_double_pulse_support() {
        let ones: Vec<i64> = (-20..=20)
            .filter(|&n| signal_value(n, SignalFamily::DoublePulse) == 1.0)
            .collect();
        assert_eq!(ones, vec![-5, -4, -3, 3, 4, 5]);

        for n in -20..=20 {
            let v = signal_value(n, SignalFamily::DoublePulse);
            assert!(v == 0.0 || v == 1.0);
        }
    }

    #[test]
    fn test_sine_pulse_window() {
        let s = |n| signal_value(n, SignalFamily::SinePulse);

        assert_eq!(s(0), 1.0);
        assert!((s(4) + 1.0).abs() < 1e-12);
        assert!((s(8) - 1.0).abs() < 1e-12);
        assert!(s(2).abs() < 1e-12);
        assert_eq!(s(9), 0.0);
        assert_eq!(s(-9), 0.0);
    }

    #[test]
    fn test_pulse_train_periodicity() {
        let p = |n| signal_value(n, SignalFamily::PulseTrain);

        for n in -64..=64 {
            assert_eq!(p(n), p(n + 8), "period broken at {}", n);
            let expected = if n.rem_euclid(8) < 3 { 1.0 } else { 0.0 };
            assert_eq!(p(n), expected);
        }

        // Negative indices wrap onto the same grid
        assert_eq!(p(-8), 1.0);
        assert_eq!(p(-7), 1.0);
        assert_eq!(p(-6), 1.0);
        assert_eq!(p(-5), 0.0);
        assert_eq!(p(-1), 0.0);
    }

    #[test]
    fn test_generators_total_at_extremes() {
        for family in SignalFamily::ALL {
            for n in [i64::MIN, i64::MIN + 1, -1_000_000_007, 1_000_000_007, i64::MAX] {
                let v = signal_value(n, family);
                assert!(v.is_finite(), "{:?}({}) = {}", family, n, v);
            }
        }

        assert_eq!(signal_value(i64::MIN, SignalFamily::Rectangular), 0.0);
        assert_eq!(signal_value(i64::MAX, SignalFamily::DoublePulse), 0.0);
        assert_eq!(signal_value(i64::MIN, SignalFamily::Gaussian), 0.0);
        // i64::MIN is a multiple of 8
        assert_eq!(signal_value(i64::MIN, SignalFamily::PulseTrain), 1.0);
    }

    #[test]
    fn test_shifted_value_never_overflows() {
        assert_eq!(shifted_value(7, 3, SignalFamily::DoublePulse), 1.0);
        assert_eq!(shifted_value(0, i64::MIN, SignalFamily::Rectangular), 0.0);
        assert_eq!(shifted_value(i64::MIN, i64::MAX, SignalFamily::DoublePulse), 0.0);
        assert_eq!(shifted_value(i64::MAX, i64::MIN, SignalFamily::Gaussian), 0.0);

        // i64::MIN - i64::MAX = 1 - 2^64, which sits on residue 1 of the train
        assert_eq!(shifted_value(i64::MIN, i64::MAX, SignalFamily::PulseTrain), 1.0);
    }

    #[test]
    fn test_support_bounds_are_tight() {
        for family in SignalFamily::ALL {
            match support(family) {
                Some(range) => {
                    assert!(family.has_finite_support());
                    let (lo, hi) = (*range.start(), *range.end());
                    assert_ne!(signal_value(lo, family), 0.0);
                    assert_ne!(signal_value(hi, family), 0.0);
                    for n in (hi + 1)..=(hi + 50) {
                        assert_eq!(signal_value(n, family), 0.0);
                        assert_eq!(signal_value(-n, family), 0.0);
                    }
                }
                None => assert!(!family.has_finite_support()),
            }
        }
    }

    #[test]
    fn test_sample_table_matches_generator() {
        for family in SignalFamily::ALL {
            let table = SampleTable::new(family, 12).unwrap();
            assert_eq!(table.samples().len(), 25);
            assert_eq!(table.radius(), 12);
            for n in -40..=40 {
                assert_eq!(table.get(n), signal_value(n, family), "{:?} at {}", family, n);
                assert_eq!(table.shifted(n, 9), shifted_value(n, 9, family));
            }
            assert_eq!(
                table.shifted(0, i64::MIN),
                shifted_value(0, i64::MIN, family)
            );
        }
    }

    #[test]
    fn test_sample_table_rejects_oversized_radius() {
        for radius in [u64::MAX, u64::MAX / 2, MAX_TABLE_SAMPLES / 2] {
            assert!(matches!(
                SampleTable::new(SignalFamily::Rectangular, radius),
                Err(DspError::WindowTooLarge { .. })
            ));
        }

        let largest = (MAX_TABLE_SAMPLES - 1) / 2;
        let err = SampleTable::new(SignalFamily::Rectangular, largest + 1).unwrap_err();
        assert!(matches!(err, DspError::WindowTooLarge { requested, .. } if requested == MAX_TABLE_SAMPLES + 1));

        let single = SampleTable::new(SignalFamily::Rectangular, 0).unwrap();
        assert_eq!(single.samples(), &[1.0]);
        assert_eq!(single.get(0), 1.0);
        assert_eq!(single.get(3), 1.0);
        assert_eq!(single.get(4), 0.0);
    }
}
