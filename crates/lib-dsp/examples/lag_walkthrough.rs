//! Lag walkthrough example.
//!
//! This example demonstrates:
//! 1. Building a correlation engine for a signal family
//! 2. Stepping the lag across the overlap region
//! 3. Reading the display pair and R(m) at each step
//! 4. Locating the secondary peak that encodes the echo delay

use lib_dsp::correlation::CorrelationEngine;
use lib_types::SignalFamily;

fn main() {
    let family = SignalFamily::DoublePulse;
    let engine = CorrelationEngine::with_defaults(family);
    let info = family.case_study();

    println!("=== Autocorrelation Lab: {} ===\n", family.label());
    println!("{} ({})", info.title, info.subtitle);
    println!("  {}\n", info.explanation);

    println!("Stepping lag from -10 to 10...");
    for lag in -10..=10 {
        let result = engine.evaluate(lag);
        let overlapping = result.signal.iter().filter(|p| p.product != 0.0).count();
        let bar = "#".repeat(result.current_r.max(0.0).round() as usize);
        println!("  m={:>3}  R={:>6.3}  overlap={:>2}  {}", lag, result.current_r, overlapping, bar);
    }

    // Side lobe: first strict local maximum at a positive lag
    let side_lobe = engine
        .curve()
        .windows(3)
        .find(|w| w[1].lag > 0 && w[1].value > w[0].value && w[1].value > w[2].value)
        .map(|w| w[1]);

    if let Some(peak) = side_lobe {
        println!("\nSide lobe at m={} (R={:.4}): echo delay of {} samples", peak.lag, peak.value, peak.lag);
    }
}
