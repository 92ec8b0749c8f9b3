//! Autocorrelation Lab CLI: step a lag across canonical signals and watch R(m).
//!
//! This is the main entry point for the autocorrelation teaching tool.

mod config;
mod orchestrator;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lib_dsp::correlation::CorrelationOptions;
use lib_types::signal::SignalFamily;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "autocorr-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the signal pair and correlation curve at one lag
    Compute {
        /// Signal family (rectangular, triangular, gaussian, double-pulse, sine-pulse, pulse-train)
        #[arg(short = 's', long, default_value = "rectangular")]
        family: SignalFamily,

        /// Lag m
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        lag: i64,

        /// Display window half-width
        #[arg(long, default_value = "20")]
        display: u32,

        /// Correlation lag range half-width
        #[arg(long, default_value = "20")]
        correlation: u32,

        /// Truncation half-width of the inner sum
        #[arg(long, default_value = "40")]
        inner: u32,

        /// Decimal digits kept in the curve
        #[arg(long, default_value = "4")]
        digits: u32,

        /// Emit raw, unrounded curve values
        #[arg(long)]
        no_round: bool,
    },

    /// Step the lag toward an upper bound, one frame per step
    Sweep {
        /// Signal family
        #[arg(short = 's', long, default_value = "rectangular")]
        family: SignalFamily,

        /// First lag
        #[arg(long, default_value = "-8", allow_hyphen_values = true)]
        from: i64,

        /// Upper bound; the sweep stops here
        #[arg(long, default_value = "15", allow_hyphen_values = true)]
        to: i64,

        /// Lag increment per frame
        #[arg(long, default_value = "1")]
        step: i64,

        /// Delay between frames (0 evaluates all frames at once)
        #[arg(long, default_value = "0")]
        interval_ms: u64,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a sweep described by a configuration file
    Run {
        /// Path to the lab configuration file (TOML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// List the signal catalog and its application notes
    Families {
        /// Show a single family
        family: Option<SignalFamily>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Compute { family, lag, display, correlation, inner, digits, no_round } => {
            let options = CorrelationOptions {
                display_half_width: display,
                correlation_half_width: correlation,
                inner_sum_half_width: inner,
                round_digits: (!no_round).then_some(digits),
            };
            compute(family, lag, &options, cli.format)?;
        }
        Commands::Sweep { family, from, to, step, interval_ms, output } => {
            let config = config::LabConfig {
                name: format!("{}-sweep", family.as_str().to_lowercase()),
                family,
                sweep: config::SweepParams {
                    start: from,
                    end: to,
                    step,
                    interval_ms,
                },
                ..Default::default()
            };
            run_sweep(config, output.as_deref(), cli.format)?;
        }
        Commands::Run { config, output } => {
            tracing::info!("Loading configuration from {:?}", config);
            let config = config::load_config(&config)?;
            run_sweep(config, Some(&output), cli.format)?;
        }
        Commands::Families { family } => {
            list_families(family, cli.format)?;
        }
    }

    Ok(())
}

fn compute(family: SignalFamily, lag: i64, options: &CorrelationOptions, format: OutputFormat) -> Result<()> {
    tracing::info!("Computing {} at lag {}", family, lag);

    let result = lib_dsp::compute_with(lag, family, options)
        .context("Failed to compute autocorrelation")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    output::write_result(&mut out, &result, format)?;
    out.flush()?;

    Ok(())
}

fn run_sweep(config: config::LabConfig, output_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let output_config = config.output.clone();
    let orchestrator = orchestrator::Orchestrator::new(config)?;

    if matches!(format, OutputFormat::Csv) {
        println!("m,r_m");
    }

    let results = orchestrator.run(|frame| {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        output::write_frame(&mut out, frame, format)?;
        out.flush()?;
        Ok(())
    })?;

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)?;
        output::write_results(&results, dir, format, &output_config)?;
        tracing::info!("Sweep complete. Results written to {:?}", dir);
    }

    Ok(())
}

fn list_families(family: Option<SignalFamily>, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if matches!(format, OutputFormat::Csv) {
        writeln!(out, "family,label,concept,application")?;
    }

    let families: Vec<SignalFamily> = match family {
        Some(f) => vec![f],
        None => SignalFamily::ALL.to_vec(),
    };

    for (i, f) in families.iter().enumerate() {
        if i > 0 && matches!(format, OutputFormat::Text) {
            writeln!(out)?;
        }
        output::write_family(&mut out, *f, format)?;
    }

    Ok(())
}
