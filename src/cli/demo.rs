use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crystalfit::analysis::{extract_report, ExtractionConfig, Method};
use crystalfit::simulate::{simulate_transmission, BvdCrystal, SweepPlan};
use crystalfit::units::{format_capacitance, format_inductance, format_si};

use super::report::print_report;

/// 26 MHz fundamental crystal used for the demo sweep
fn demo_crystal() -> BvdCrystal {
    BvdCrystal::new(20.0, 7.5e-3, 5.0e-15, 2.0e-12)
}

/// Simulate a crystal, write its sweep and extract it again
pub fn run(output: PathBuf, method: Method) -> Result<()> {
    info!("crystalfit - Synthetic Sweep Demo");
    info!("=================================");

    let crystal = demo_crystal();
    let config = ExtractionConfig::two_port();
    let plan = SweepPlan::new(25_980_000.0, 26_030_000.0, 5001);

    info!(
        "Simulating {} points from {} to {}",
        plan.points,
        format_si(plan.start_hz, "Hz"),
        format_si(plan.stop_hz, "Hz")
    );
    let sweep = simulate_transmission(&crystal, config.source_resistance_ohm, &plan)
        .context("Failed to simulate sweep")?;

    sweep
        .to_csv_path(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());

    let report = extract_report(&sweep, method, &config).context("Extraction failed")?;

    println!("Simulated crystal:");
    println!("  fs {}", format_si(crystal.series_resonance(), "Hz"));
    println!("  fp {}", format_si(crystal.parallel_resonance(), "Hz"));
    println!("  R1 {:.2} Ohm", crystal.r1);
    println!("  L1 {}", format_inductance(crystal.l1));
    println!("  C1 {}", format_capacitance(crystal.c1));
    println!("  C0 {}", format_capacitance(crystal.c0));
    println!("  Q  {:.0}", crystal.quality_factor());
    println!();
    print_report(&output, &report);

    Ok(())
}
