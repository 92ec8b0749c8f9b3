//! Lab configuration loading and validation.

use anyhow::{Context, Result};
use lib_dsp::correlation::{
    CorrelationOptions, DEFAULT_CORRELATION_HALF_WIDTH, DEFAULT_DISPLAY_HALF_WIDTH,
    DEFAULT_INNER_SUM_HALF_WIDTH, DEFAULT_ROUND_DIGITS,
};
use lib_types::signal::SignalFamily;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lag range offered by the interactive slider.
pub const UI_LAG_RANGE: (i64, i64) = (-15, 15);

/// Largest number of frames a single sweep may produce.
///
/// Every frame is kept in memory until the results are written.
pub const MAX_SWEEP_FRAMES: u64 = 10_000;

/// Top-level lab configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabConfig {
    /// Run name/description.
    #[serde(default = "default_name")]
    pub name: String,

    /// Signal family to correlate.
    #[serde(default)]
    pub family: SignalFamily,

    /// Engine windows.
    #[serde(default)]
    pub engine: EngineParams,

    /// Lag sweep.
    #[serde(default)]
    pub sweep: SweepParams,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "autocorrelation".to_string()
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            family: SignalFamily::default(),
            engine: EngineParams::default(),
            sweep: SweepParams::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Correlation engine windows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineParams {
    /// Half-width of the display window.
    #[serde(default = "default_display_half_width")]
    pub display_half_width: u32,

    /// Half-width of the correlation lag range.
    #[serde(default = "default_correlation_half_width")]
    pub correlation_half_width: u32,

    /// Truncation half-width of the inner sum.
    #[serde(default = "default_inner_sum_half_width")]
    pub inner_sum_half_width: u32,

    /// Round the curve for display.
    #[serde(default = "default_true")]
    pub round: bool,

    /// Decimal digits kept when rounding.
    #[serde(default = "default_round_digits")]
    pub round_digits: u32,
}

fn default_display_half_width() -> u32 { DEFAULT_DISPLAY_HALF_WIDTH }
fn default_correlation_half_width() -> u32 { DEFAULT_CORRELATION_HALF_WIDTH }
fn default_inner_sum_half_width() -> u32 { DEFAULT_INNER_SUM_HALF_WIDTH }
fn default_round_digits() -> u32 { DEFAULT_ROUND_DIGITS }
fn default_true() -> bool { true }

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            display_half_width: default_display_half_width(),
            correlation_half_width: default_correlation_half_width(),
            inner_sum_half_width: default_inner_sum_half_width(),
            round: true,
            round_digits: default_round_digits(),
        }
    }
}

impl EngineParams {
    /// Convert to engine options.
    pub fn to_options(&self) -> CorrelationOptions {
        CorrelationOptions {
            display_half_width: self.display_half_width,
            correlation_half_width: self.correlation_half_width,
            inner_sum_half_width: self.inner_sum_half_width,
            round_digits: self.round.then_some(self.round_digits),
        }
    }
}

/// Lag sweep parameters.
///
/// The sweep plays the lag forward from `start` in increments of `step`
/// and stops once it reaches `end`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepParams {
    /// First lag.
    #[serde(default = "default_start")]
    pub start: i64,

    /// Upper bound; the sweep stops here.
    #[serde(default = "default_end")]
    pub end: i64,

    /// Lag increment per frame.
    #[serde(default = "default_step")]
    pub step: i64,

    /// Delay between frames in milliseconds, 0 for batch evaluation.
    #[serde(default)]
    pub interval_ms: u64,
}

fn default_start() -> i64 { -8 }
fn default_end() -> i64 { UI_LAG_RANGE.1 }
fn default_step() -> i64 { 1 }

impl SweepParams {
    /// Number of frames the sweep visits, including the clamped last step.
    pub fn frame_count(&self) -> u64 {
        let step = self.step.max(1) as u64;
        match self.start.cmp(&self.end) {
            std::cmp::Ordering::Less => {
                let span = self.end.abs_diff(self.start);
                (span / step + u64::from(span % step != 0)).saturating_add(1)
            }
            std::cmp::Ordering::Equal => 1,
            std::cmp::Ordering::Greater => 2,
        }
    }
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            step: default_step(),
            interval_ms: 0,
        }
    }
}

/// Output configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write the correlation curve.
    #[serde(default = "default_true")]
    pub correlation: bool,

    /// Write one R(m) row per sweep frame.
    #[serde(default = "default_true")]
    pub frames: bool,

    /// Write every display point of every frame.
    #[serde(default)]
    pub signal_pairs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            correlation: true,
            frames: true,
            signal_pairs: false,
        }
    }
}

/// Load configuration from a file.
pub fn load_config(path: &Path) -> Result<LabConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let is_json = path.extension().map_or(false, |e| e == "json");
    parse_config(&content, is_json)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str, is_json: bool) -> Result<LabConfig> {
    let config: LabConfig = if is_json {
        serde_json::from_str(content).with_context(|| "Failed to parse config as JSON")?
    } else {
        // Assume TOML
        toml::from_str(content).with_context(|| "Failed to parse config as TOML")?
    };

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration.
pub fn validate_config(config: &LabConfig) -> Result<()> {
    config
        .engine
        .to_options()
        .validate()
        .context("Invalid engine parameters")?;

    validate_sweep(&config.sweep)
}

/// Validate sweep parameters.
pub fn validate_sweep(sweep: &SweepParams) -> Result<()> {
    if sweep.step < 1 {
        anyhow::bail!("Sweep step must be at least 1 (got {})", sweep.step);
    }

    let frames = sweep.frame_count();
    if frames > MAX_SWEEP_FRAMES {
        anyhow::bail!(
            "Sweep {}..={} step {} has {} frames, limit is {}",
            sweep.start,
            sweep.end,
            sweep.step,
            frames,
            MAX_SWEEP_FRAMES
        );
    }

    let (lo, hi) = UI_LAG_RANGE;
    if sweep.start < lo || sweep.end > hi {
        tracing::warn!(
            "Sweep {}..={} leaves the interactive range {}..={}",
            sweep.start,
            sweep.end,
            lo,
            hi
        );
    }

    if sweep.start > sweep.end {
        tracing::warn!(
            "Sweep starts past its upper bound ({} > {}); it will snap to the bound and stop",
            sweep.start,
            sweep.end
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = parse_config("", false).unwrap();

        assert_eq!(config.name, "autocorrelation");
        assert_eq!(config.family, SignalFamily::Rectangular);
        assert_eq!(config.engine.to_options(), CorrelationOptions::default());
        assert_eq!(config.sweep.start, -8);
        assert_eq!(config.sweep.end, 15);
        assert_eq!(config.sweep.step, 1);
        assert!(config.output.correlation);
        assert!(!config.output.signal_pairs);
    }

    #[test]
    fn test_toml_overrides() {
        let content = r#"
            name = "radar"
            family = "DOUBLE_PULSE"

            [engine]
            inner_sum_half_width = 60
            round = false

            [sweep]
            start = 0
            end = 12
            step = 4
        "#;

        let config = parse_config(content, false).unwrap();
        assert_eq!(config.family, SignalFamily::DoublePulse);

        let options = config.engine.to_options();
        assert_eq!(options.inner_sum_half_width, 60);
        assert_eq!(options.display_half_width, 20);
        assert_eq!(options.round_digits, None);
        assert_eq!(config.sweep.step, 4);
    }

    #[test]
    fn test_json_config() {
        let content = r#"{"family": "PULSE_TRAIN", "sweep": {"interval_ms": 400}}"#;
        let config = parse_config(content, true).unwrap();

        assert_eq!(config.family, SignalFamily::PulseTrain);
        assert_eq!(config.sweep.interval_ms, 400);
        assert_eq!(config.sweep.end, 15);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config("family = \"CHIRP\"", false).is_err());
        assert!(parse_config("[sweep]\nstep = 0", false).is_err());
        assert!(parse_config("[engine]\nround_digits = 40", false).is_err());
    }

    #[test]
    fn test_frame_count() {
        let sweep = |start, end, step| SweepParams { start, end, step, interval_ms: 0 };

        assert_eq!(SweepParams::default().frame_count(), 24);
        assert_eq!(sweep(0, 10, 4).frame_count(), 4);
        assert_eq!(sweep(0, 12, 4).frame_count(), 4);
        assert_eq!(sweep(15, 15, 1).frame_count(), 1);
        assert_eq!(sweep(20, 15, 1).frame_count(), 2);
        assert_eq!(sweep(i64::MIN, i64::MAX, 1).frame_count(), u64::MAX);
    }

    #[test]
    fn test_rejects_oversized_sweep() {
        let huge = SweepParams {
            start: -2_000_000_000,
            end: 2_000_000_000,
            step: 1,
            interval_ms: 0,
        };
        assert!(validate_sweep(&huge).is_err());

        let coarse = SweepParams { step: 1_000_000, ..huge.clone() };
        assert_eq!(coarse.frame_count(), 4001);
        assert!(validate_sweep(&coarse).is_ok());

        let at_limit = SweepParams {
            start: 0,
            end: MAX_SWEEP_FRAMES as i64 - 1,
            step: 1,
            interval_ms: 0,
        };
        assert!(validate_sweep(&at_limit).is_ok());
        assert!(validate_sweep(&SweepParams { end: at_limit.end + 1, ..at_limit }).is_err());
    }
}
