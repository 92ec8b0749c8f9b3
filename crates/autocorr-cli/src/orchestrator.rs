//! Lag sweep orchestration.
//!
//! The engine is stateless per lag; stepping the lag over time is a caller
//! concern and lives here. A sweep starts at a lag, advances by a fixed
//! step, clamps to its upper bound and stops there.

use crate::config::{validate_config, LabConfig};
use anyhow::{Context, Result};
use lib_dsp::correlation::CorrelationEngine;
use lib_types::series::{CorrelationPoint, CorrelationResult};
use lib_types::signal::SignalFamily;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::time::Duration;

/// Lags visited by a sweep, in playback order.
#[derive(Clone, Debug)]
pub struct LagSweep {
    next: Option<i64>,
    end: i64,
    step: i64,
}

impl LagSweep {
    /// Sweep from `start` up to `end` in increments of `step` (at least 1).
    pub fn new(start: i64, end: i64, step: i64) -> Self {
        Self {
            next: Some(start),
            end,
            step: step.max(1),
        }
    }

    /// Whether more frames remain.
    pub fn is_playing(&self) -> bool {
        self.next.is_some()
    }
}

impl Iterator for LagSweep {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next?;

        self.next = match current.cmp(&self.end) {
            Ordering::Less => Some(current.saturating_add(self.step).min(self.end)),
            Ordering::Equal => None,
            // Started past the bound: snap to it once, then stop
            Ordering::Greater => Some(self.end),
        };

        Some(current)
    }
}

/// Sweep orchestrator.
pub struct Orchestrator {
    config: LabConfig,
    engine: CorrelationEngine,
}

impl Orchestrator {
    /// Create a new orchestrator, building the engine once for the run.
    pub fn new(config: LabConfig) -> Result<Self> {
        validate_config(&config)?;

        let engine = CorrelationEngine::new(config.family, config.engine.to_options())
            .context("Failed to build correlation engine")?;

        Ok(Self { config, engine })
    }

    /// Fresh sweep over the configured lags.
    pub fn sweep(&self) -> LagSweep {
        let s = &self.config.sweep;
        LagSweep::new(s.start, s.end, s.step)
    }

    /// Run the sweep.
    ///
    /// With `interval_ms == 0` every frame is evaluated up front, in
    /// parallel. Otherwise frames are played one by one with the configured
    /// delay and handed to `on_frame` as they are produced.
    pub fn run<F>(&self, mut on_frame: F) -> Result<SweepResults>
    where
        F: FnMut(&CorrelationResult) -> Result<()>,
    {
        tracing::info!(
            "Starting sweep '{}': {} from {} to {} step {}",
            self.config.name,
            self.config.family,
            self.config.sweep.start,
            self.config.sweep.end,
            self.config.sweep.step
        );

        let interval = self.config.sweep.interval_ms;
        let frames = if interval == 0 {
            let lags: Vec<i64> = self.sweep().collect();
            let frames: Vec<CorrelationResult> =
                lags.par_iter().map(|&lag| self.engine.evaluate(lag)).collect();

            for frame in &frames {
                on_frame(frame)?;
            }
            frames
        } else {
            let delay = Duration::from_millis(interval);
            let mut frames = Vec::new();
            let mut sweep = self.sweep();

            while let Some(lag) = sweep.next() {
                let frame = self.engine.evaluate(lag);
                on_frame(&frame)?;
                frames.push(frame);

                if sweep.is_playing() {
                    std::thread::sleep(delay);
                }
            }
            frames
        };

        tracing::info!("Sweep complete: {} frames", frames.len());

        Ok(SweepResults {
            name: self.config.name.clone(),
            family: self.config.family,
            curve: self.engine.curve().to_vec(),
            frames,
        })
    }
}

/// Sweep results.
#[derive(Debug)]
pub struct SweepResults {
    /// Run name.
    pub name: String,

    /// Family used for every frame.
    pub family: SignalFamily,

    /// Correlation curve (identical for every frame).
    pub curve: Vec<CorrelationPoint>,

    /// One result per visited lag, in playback order.
    pub frames: Vec<CorrelationResult>,
}

impl SweepResults {
    /// Frame with the largest R(m). Ties resolve to the earliest frame.
    pub fn peak_frame(&self) -> Option<&CorrelationResult> {
        self.frames.iter().fold(None, |best: Option<&CorrelationResult>, f| match best {
            Some(b) if b.current_r >= f.current_r => Some(b),
            _ => Some(f),
        })
    }

    /// Lag the sweep stopped at.
    pub fn final_lag(&self) -> Option<i64> {
        self.frames.last().map(|f| f.lag)
    }
}
