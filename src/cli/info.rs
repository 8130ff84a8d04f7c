use anyhow::{Context, Result};
use std::path::PathBuf;

use crystalfit::analysis::locate;
use crystalfit::analysis::resonance::zero_phase_point;
use crystalfit::sweep::SampleSeries;
use crystalfit::units::format_si;

/// Display information about a sweep file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let sweep = SampleSeries::from_csv_path(&file).context("Failed to read sweep file")?;

    println!("Sweep Information");
    println!("=================");
    println!("File: {}", file.display());
    println!();

    println!("Samples: {}", sweep.len());
    if let Some((start, stop)) = sweep.frequency_range() {
        println!(
            "Range:   {} .. {}",
            format_si(start, "Hz"),
            format_si(stop, "Hz")
        );
    }
    if let Some(resolution) = sweep.frequency_resolution() {
        println!("Step:    {:.3} Hz", resolution);
    }
    println!();

    match locate(&sweep) {
        Ok(point) => {
            println!("Resonance:");
            println!("  fs:        {}", format_si(point.fs, "Hz"));
            println!("  fp:        {}", format_si(point.fp, "Hz"));
            println!("  Min. loss: {:.3} dB", point.loss_min);
        }
        Err(e) => println!("Resonance: {}", e),
    }

    if let Some(zero) = zero_phase_point(&sweep) {
        println!(
            "  Zero phase: {} ({:.3} dB)",
            format_si(zero.frequency, "Hz"),
            zero.loss
        );
    }

    Ok(())
}
