//! Result output formatting and writing.

use crate::config::OutputConfig;
use crate::orchestrator::SweepResults;
use crate::OutputFormat;
use anyhow::Result;
use lib_types::series::CorrelationResult;
use lib_types::signal::SignalFamily;
use std::io::Write;
use std::path::Path;

/// Write one evaluated lag.
pub fn write_result<W: Write>(w: &mut W, result: &CorrelationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(w, "{} at lag m = {}", result.family.label(), result.lag)?;
            writeln!(w, "R(m) = {:.6}", result.current_r)?;
            writeln!(w)?;
            writeln!(w, "{:>5} {:>10} {:>10} {:>10}", "n", "x(n)", "x(n-m)", "product")?;
            for p in &result.signal {
                writeln!(w, "{:>5} {:>10.4} {:>10.4} {:>10.4}", p.index, p.original, p.shifted, p.product)?;
            }
            writeln!(w)?;
            writeln!(w, "{:>5} {:>10}", "m", "R(m)")?;
            for p in &result.correlation {
                let marker = if p.lag == result.lag { "  <" } else { "" };
                writeln!(w, "{:>5} {:>10.4}{}", p.lag, p.value, marker)?;
            }
        }
        OutputFormat::Json => {
            writeln!(w, "{}", serde_json::to_string_pretty(result)?)?;
        }
        OutputFormat::Csv => {
            writeln!(w, "n,x_n,x_n_m,product")?;
            for p in &result.signal {
                writeln!(w, "{},{},{},{}", p.index, p.original, p.shifted, p.product)?;
            }
            writeln!(w)?;
            writeln!(w, "m,r_m")?;
            for p in &result.correlation {
                writeln!(w, "{},{}", p.lag, p.value)?;
            }
        }
    }

    Ok(())
}

/// Write one sweep frame as a single line.
pub fn write_frame<W: Write>(w: &mut W, frame: &CorrelationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let overlap = frame.signal.iter().filter(|p| p.product != 0.0).count();
            writeln!(w, "m={:>4}  R(m)={:>10.4}  overlap={:>3}", frame.lag, frame.current_r, overlap)?;
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "m": frame.lag,
                "r_m": frame.current_r,
                "overlap_energy": frame.overlap_energy(),
            });
            writeln!(w, "{}", json)?;
        }
        OutputFormat::Csv => {
            writeln!(w, "{},{}", frame.lag, frame.current_r)?;
        }
    }

    Ok(())
}

/// Write the catalog entry of a family.
pub fn write_family<W: Write>(w: &mut W, family: SignalFamily, format: OutputFormat) -> Result<()> {
    let info = family.case_study();

    match format {
        OutputFormat::Text => {
            writeln!(w, "{} ({})", family.label(), family)?;
            writeln!(w, "  {} / {}", info.title, info.subtitle)?;
            writeln!(w, "  Concept:     {}", info.concept)?;
            writeln!(w, "  Application: {}", info.application)?;
            writeln!(w, "  {}", info.explanation)?;
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "family": family,
                "label": family.label(),
                "finite_support": family.has_finite_support(),
                "case_study": info,
            });
            writeln!(w, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(w, "{},\"{}\",\"{}\",\"{}\"", family, family.label(), info.concept, info.application)?;
        }
    }

    Ok(())
}

/// Write sweep results to output directory.
pub fn write_results(
    results: &SweepResults,
    output_dir: &Path,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    // Write correlation curve
    if config.correlation {
        let curve_path = output_dir.join("correlation.csv");
        let mut f = std::fs::File::create(&curve_path)?;

        writeln!(f, "m,r_m")?;
        for p in &results.curve {
            writeln!(f, "{},{}", p.lag, p.value)?;
        }

        tracing::info!("Wrote correlation curve to {:?}", curve_path);
    }

    // Write per-frame R(m)
    if config.frames {
        let frames_path = output_dir.join("frames.csv");
        let mut f = std::fs::File::create(&frames_path)?;

        writeln!(f, "frame,m,r_m,overlap_energy")?;
        for (i, frame) in results.frames.iter().enumerate() {
            writeln!(f, "{},{},{},{}", i, frame.lag, frame.current_r, frame.overlap_energy())?;
        }

        tracing::info!("Wrote {} frames to {:?}", results.frames.len(), frames_path);
    }

    // Write every display point (large for long sweeps)
    if config.signal_pairs {
        let pairs_path = output_dir.join("signal_pairs.csv");
        let mut f = std::fs::File::create(&pairs_path)?;

        writeln!(f, "m,n,x_n,x_n_m,product")?;
        for frame in &results.frames {
            for p in &frame.signal {
                writeln!(f, "{},{},{},{},{}", frame.lag, p.index, p.original, p.shifted, p.product)?;
            }
        }

        tracing::info!("Wrote signal pairs to {:?}", pairs_path);
    }

    // Write summary
    let peak = results.peak_frame();
    let summary_path = output_dir.join("summary.txt");
    let mut f = std::fs::File::create(&summary_path)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "name": results.name,
                "family": results.family,
                "frames": results.frames.len(),
                "final_lag": results.final_lag(),
                "peak_lag": peak.map(|p| p.lag),
                "peak_r": peak.map(|p| p.current_r),
            });
            writeln!(f, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(f, "metric,value")?;
            writeln!(f, "family,{}", results.family)?;
            writeln!(f, "frames,{}", results.frames.len())?;
            if let Some(p) = peak {
                writeln!(f, "peak_lag,{}", p.lag)?;
                writeln!(f, "peak_r,{}", p.current_r)?;
            }
        }
        OutputFormat::Text => {
            writeln!(f, "Autocorrelation Lab Sweep Summary")?;
            writeln!(f, "=================================")?;
            writeln!(f)?;
            writeln!(f, "Run:     {}", results.name)?;
            writeln!(f, "Family:  {}", results.family.label())?;
            writeln!(f, "Frames:  {}", results.frames.len())?;
            if let Some(last) = results.final_lag() {
                writeln!(f, "Stopped: m = {}", last)?;
            }
            if let Some(p) = peak {
                writeln!(f)?;
                writeln!(f, "Peak R(m) = {:.4} at m = {}", p.current_r, p.lag)?;
            }
        }
    }

    tracing::info!("Wrote summary to {:?}", summary_path);

    Ok(())
}
