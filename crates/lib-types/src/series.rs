//! Sampled series produced by the correlation engine.
//!
//! All series are indexed by plain integers (sample index `n` or lag `m`)
//! and ordered ascending. Nothing here is mutated after construction: a
//! new lag means a new `CorrelationResult`.

use crate::signal::SignalFamily;
use serde::{Deserialize, Serialize};

/// One display sample of the signal pair at a fixed lag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalSamplePoint {
    /// Sample index n.
    pub index: i64,

    /// x(n).
    pub original: f64,

    /// x(n - m).
    pub shifted: f64,

    /// x(n) * x(n - m).
    pub product: f64,
}

impl SignalSamplePoint {
    /// Build a point from the two signal values; the product is derived.
    #[inline]
    pub fn new(index: i64, original: f64, shifted: f64) -> Self {
        Self {
            index,
            original,
            shifted,
            product: original * shifted,
        }
    }
}

/// Autocorrelation estimate at one lag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPoint {
    /// Lag m.
    pub lag: i64,

    /// R(m).
    pub value: f64,
}

/// Everything a presentation layer needs for one (lag, family) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Requested lag.
    pub lag: i64,

    /// Generator used for every series below.
    pub family: SignalFamily,

    /// Signal pair over the display window, ascending by index.
    pub signal: Vec<SignalSamplePoint>,

    /// Correlation curve over the lag range, ascending by lag.
    pub correlation: Vec<CorrelationPoint>,

    /// Unrounded R at the requested lag.
    pub current_r: f64,
}

impl CorrelationResult {
    /// Curve value at a given lag, if the lag lies inside the curve range.
    pub fn value_at(&self, lag: i64) -> Option<f64> {
        self.correlation
            .binary_search_by_key(&lag, |p| p.lag)
            .ok()
            .map(|i| self.correlation[i].value)
    }

    /// Largest point of the curve. Ties resolve to the smallest lag.
    pub fn peak(&self) -> Option<CorrelationPoint> {
        self.correlation.iter().copied().fold(None, |best, p| match best {
            Some(b) if b.value >= p.value => Some(b),
            _ => Some(p),
        })
    }

    /// Sum of the display-window products.
    ///
    /// Equals `current_r` whenever the display window covers the whole
    /// overlap region of a finite-support family.
    pub fn overlap_energy(&self) -> f64 {
        self.signal.iter().map(|p| p.product).sum()
    }

    /// Index range of the display window.
    pub fn display_range(&self) -> Option<(i64, i64)> {
        match (self.signal.first(), self.signal.last()) {
            (Some(first), Some(last)) => Some((first.index, last.index)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> CorrelationResult {
        CorrelationResult {
            lag: 1,
            family: SignalFamily::Rectangular,
            signal: vec![
                SignalSamplePoint::new(-1, 1.0, 0.0),
                SignalSamplePoint::new(0, 1.0, 1.0),
                SignalSamplePoint::new(1, 0.5, 1.0),
            ],
            correlation: vec![
                CorrelationPoint { lag: -1, value: 2.0 },
                CorrelationPoint { lag: 0, value: 3.0 },
                CorrelationPoint { lag: 1, value: 2.0 },
            ],
            current_r: 2.0,
        }
    }

    #[test]
    fn test_point_product_is_derived() {
        let p = SignalSamplePoint::new(3, 0.25, -2.0);
        assert_eq!(p.product, 0.25 * -2.0);
    }

    #[test]
    fn test_value_at_lookup() {
        let r = sample_result();
        assert_eq!(r.value_at(0), Some(3.0));
        assert_eq!(r.value_at(-1), Some(2.0));
        assert_eq!(r.value_at(5), None);
    }

    #[test]
    fn test_peak_prefers_first_maximum() {
        let mut r = sample_result();
        assert_eq!(r.peak().unwrap().lag, 0);

        r.correlation[2].value = 3.0;
        assert_eq!(r.peak().unwrap().lag, 0);

        r.correlation.clear();
        assert!(r.peak().is_none());
    }

    #[test]
    fn test_overlap_energy_and_range() {
        let r = sample_result();
        assert!((r.overlap_energy() - 1.5).abs() < 1e-12);
        assert_eq!(r.display_range(), Some((-1, 1)));
    }
}
