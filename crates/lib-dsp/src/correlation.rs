//! Truncated discrete autocorrelation.
//!
//! For a lag `m` the engine produces two things:
//!
//! - the display pair `x(n)`, `x(n - m)` and their product over a symmetric
//!   index window, showing which samples overlap at that lag;
//! - the full curve `R(k) = Σ x(i)·x(i - k)` for every `k` in a symmetric
//!   lag range, with the sum truncated to `i ∈ [-W, W]`.
//!
//! # Symmetry
//!
//! The truncated sum is evaluated for `k >= 0` and mirrored onto negative
//! lags. For finite-support families the support sits inside the window
//! and mirroring changes nothing. For the periodic pulse train the
//! truncation window is not shift invariant (the raw sum gives R(1) = 20
//! but R(-1) = 21 with the default window), so mirroring is what makes
//! `R(m) = R(-m)` hold for every family.
//!
//! # Rounding
//!
//! Curve values are rounded to a fixed number of decimal digits (4 by
//! default) to hide summation noise in plots. `current_r` is never
//! rounded.

use crate::error::{DspError, DspResult};
use crate::signal::{signal_value, signal_value_wide, support, SampleTable};
use lib_types::series::{CorrelationPoint, CorrelationResult, SignalSamplePoint};
use lib_types::signal::SignalFamily;

/// Default display window half-width (41 points).
pub const DEFAULT_DISPLAY_HALF_WIDTH: u32 = 20;

/// Default correlation lag range half-width (41 points).
pub const DEFAULT_CORRELATION_HALF_WIDTH: u32 = 20;

/// Default truncation half-width of the inner sum.
pub const DEFAULT_INNER_SUM_HALF_WIDTH: u32 = 40;

/// Default number of decimal digits kept in the curve.
pub const DEFAULT_ROUND_DIGITS: u32 = 4;

/// Largest accepted `round_digits`.
pub const MAX_ROUND_DIGITS: u32 = 12;

/// Upper bound on tabulated samples and on display points.
pub const MAX_TABLE_SAMPLES: u64 = 1 << 24;

/// Engine options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationOptions {
    /// Display window is `[-display_half_width, display_half_width]`.
    pub display_half_width: u32,

    /// Curve covers lags `[-correlation_half_width, correlation_half_width]`.
    pub correlation_half_width: u32,

    /// Inner sum runs over `[-inner_sum_half_width, inner_sum_half_width]`.
    pub inner_sum_half_width: u32,

    /// Decimal digits kept in the curve, `None` to emit raw sums.
    pub round_digits: Option<u32>,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            display_half_width: DEFAULT_DISPLAY_HALF_WIDTH,
            correlation_half_width: DEFAULT_CORRELATION_HALF_WIDTH,
            inner_sum_half_width: DEFAULT_INNER_SUM_HALF_WIDTH,
            round_digits: Some(DEFAULT_ROUND_DIGITS),
        }
    }
}

impl CorrelationOptions {
    /// Check that the options describe a computable window.
    pub fn validate(&self) -> DspResult<()> {
        if let Some(digits) = self.round_digits {
            if digits > MAX_ROUND_DIGITS {
                return Err(DspError::InvalidConfig(format!(
                    "round_digits must be at most {}, got {}",
                    MAX_ROUND_DIGITS, digits
                )));
            }
        }

        let table_samples = 2 * self.table_radius() + 1;
        if table_samples > MAX_TABLE_SAMPLES {
            return Err(DspError::WindowTooLarge {
                requested: table_samples,
                max: MAX_TABLE_SAMPLES,
            });
        }

        let display_samples = 2 * self.display_half_width as u64 + 1;
        if display_samples > MAX_TABLE_SAMPLES {
            return Err(DspError::WindowTooLarge {
                requested: display_samples,
                max: MAX_TABLE_SAMPLES,
            });
        }

        Ok(())
    }

    /// Half-width of the index range touched by the curve sums.
    ///
    /// `x(i - k)` with `|i| <= W` and `|k| <= C` stays within `W + C`.
    pub fn table_radius(&self) -> u64 {
        self.inner_sum_half_width as u64 + self.correlation_half_width as u64
    }
}

/// Autocorrelation engine for one signal family.
///
/// The correlation curve does not depend on the requested lag, so it is
/// computed once at construction together with the sample table. Each
/// [`evaluate`](Self::evaluate) call then only builds the display pair.
#[derive(Clone, Debug)]
pub struct CorrelationEngine {
    family: SignalFamily,
    options: CorrelationOptions,
    table: SampleTable,

    /// Unrounded R(k) for k = 0..=correlation_half_width.
    raw: Vec<f64>,

    /// Emitted curve, ascending lag.
    curve: Vec<CorrelationPoint>,
}

impl CorrelationEngine {
    /// Build an engine after validating the options.
    pub fn new(family: SignalFamily, options: CorrelationOptions) -> DspResult<Self> {
        options.validate()?;
        Ok(Self::build(family, options))
    }

    /// Build an engine with the default windows.
    pub fn with_defaults(family: SignalFamily) -> Self {
        Self::build(family, CorrelationOptions::default())
    }

    fn build(family: SignalFamily, options: CorrelationOptions) -> Self {
        let table = SampleTable::tabulate(family, options.table_radius() as i64);
        let half_width = options.correlation_half_width as i64;
        let inner = options.inner_sum_half_width as i64;

        let raw: Vec<f64> = (0..=half_width)
            .map(|k| lagged_sum(&table, k, inner))
            .collect();

        let curve = (-half_width..=half_width)
            .map(|k| CorrelationPoint {
                lag: k,
                value: round_value(raw[k.unsigned_abs() as usize], options.round_digits),
            })
            .collect();

        tracing::debug!(
            "CorrelationEngine: family={}, table={} samples, curve={} lags, inner window=±{}",
            family,
            table.samples().len(),
            2 * half_width + 1,
            inner
        );

        Self {
            family,
            options,
            table,
            raw,
            curve,
        }
    }

    /// Family this engine evaluates.
    pub fn family(&self) -> SignalFamily {
        self.family
    }

    /// Options the engine was built with.
    pub fn options(&self) -> &CorrelationOptions {
        &self.options
    }

    /// Rounded correlation curve, ascending lag.
    pub fn curve(&self) -> &[CorrelationPoint] {
        &self.curve
    }

    /// Unrounded R at `lag`, or 0 when the lag lies outside the curve range.
    pub fn raw_value(&self, lag: i64) -> f64 {
        usize::try_from(lag.unsigned_abs())
            .ok()
            .and_then(|k| self.raw.get(k))
            .copied()
            .unwrap_or(0.0)
    }

    /// Produce the display pair, the curve and R at `lag`.
    pub fn evaluate(&self, lag: i64) -> CorrelationResult {
        let half_width = self.options.display_half_width as i64;

        let signal = (-half_width..=half_width)
            .map(|n| SignalSamplePoint::new(n, self.table.get(n), self.table.shifted(n, lag)))
            .collect();

        let current_r = self.raw_value(lag);

        tracing::trace!(
            "Evaluated {} at lag {}: R = {:.6}",
            self.family,
            lag,
            current_r
        );

        CorrelationResult {
            lag,
            family: self.family,
            signal,
            correlation: self.curve.clone(),
            current_r,
        }
    }
}

/// Σ_{i=-inner}^{inner} x(i)·x(i - shift), reading samples from `table`.
///
/// Terms where either factor lies outside the family's support are exact
/// zeros and are skipped, which leaves the sum bit-identical.
fn lagged_sum(table: &SampleTable, shift: i64, inner: i64) -> f64 {
    let (lo, hi) = match support(table.family()) {
        Some(s) => (
            (-inner).max(*s.start()).max(s.start() + shift),
            inner.min(*s.end()).min(s.end() + shift),
        ),
        None => (-inner, inner),
    };

    let mut sum = 0.0;
    for i in lo..=hi {
        sum += table.get(i) * table.get(i - shift);
    }
    sum
}

fn round_value(value: f64, digits: Option<u32>) -> f64 {
    match digits {
        Some(d) => round_to(value, d),
        None => value,
    }
}

/// Round to `digits` decimal places, mapping negative zero to zero.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale + 0.0
}

/// Evaluate one lag with the default windows.
///
/// Every `i64` lag is accepted.
pub fn compute(lag: i64, family: SignalFamily) -> CorrelationResult {
    CorrelationEngine::with_defaults(family).evaluate(lag)
}

/// Evaluate one lag with explicit options.
pub fn compute_with(
    lag: i64,
    family: SignalFamily,
    options: &CorrelationOptions,
) -> DspResult<CorrelationResult> {
    Ok(CorrelationEngine::new(family, options.clone())?.evaluate(lag))
}

/// Direct truncated autocorrelation at a single shift (for validation).
///
/// Calls the generator for every term and does not mirror negative
/// shifts. This is O(inner) per lag and should only be used to check the
/// engine.
pub fn direct_autocorrelation(family: SignalFamily, shift: i64, inner_half_width: u32) -> f64 {
    let inner = inner_half_width as i64;
    let mut sum = 0.0;
    for i in -inner..=inner {
        sum += signal_value(i, family) * signal_value_wide(i as i128 - shift as i128, family);
    }
    sum
}
