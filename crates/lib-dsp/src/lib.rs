//! # lib-dsp
//!
//! Numeric core of the autocorrelation lab.
//!
//! This crate provides the two pure building blocks the presentation layer
//! calls into:
//!
//! - **Signal synthesis**: closed-form generators for every catalog family,
//!   total over all integer indices
//! - **Autocorrelation**: the sampled signal pair at a lag plus the full
//!   truncated correlation curve over a lag range
//!
//! ```
//! use lib_dsp::compute;
//! use lib_types::SignalFamily;
//!
//! let result = compute(0, SignalFamily::Rectangular);
//! assert_eq!(result.value_at(0), Some(7.0));
//! ```

pub mod error;
pub mod signal;
pub mod correlation;

pub use error::{DspError, DspResult};
pub use signal::{signal_value, SampleTable};
pub use correlation::{compute, compute_with, CorrelationEngine, CorrelationOptions};
