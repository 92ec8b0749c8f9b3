//! Error types for DSP operations.

use thiserror::Error;

/// Errors that can occur when configuring the correlation engine.
///
/// The numeric core itself is total; only option validation can fail.
#[derive(Debug, Error)]
pub enum DspError {
    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sample table would be larger than the engine allows.
    #[error("Window too large: need {requested} samples, limit is {max}")]
    WindowTooLarge { requested: u64, max: u64 },
}

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;
