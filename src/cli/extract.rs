use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crystalfit::analysis::{extract_report, extract_two_sweep, Method};
use crystalfit::sweep::SampleSeries;

use super::report::{print_json, print_report};
use super::{stray_source_for, ExtractionArgs};

/// Extract the equivalent circuit from one sweep file
pub fn run(
    input: PathBuf,
    args: &ExtractionArgs,
    stray_sweep: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let (mut method, mut config) = args.resolve()?;
    if stray_sweep.is_some() {
        if args.method.is_some() && method != Method::G3uur {
            anyhow::bail!(
                "--stray-sweep is only used by the g3uur method, not {}",
                method
            );
        }
        method = Method::G3uur;
    }
    config.stray_source = stray_source_for(stray_sweep.is_some(), config.stray_source);

    info!("crystalfit - Crystal Parameter Extraction");
    info!("=========================================");
    info!("Input:  {}", input.display());
    info!("Method: {}", method);
    info!("Rl:     {} Ohm", config.source_resistance_ohm);
    if config.load_capacitance_pf > 0.0 {
        info!("Cl:     {} pF", config.load_capacitance_pf);
    }

    let sweep = SampleSeries::from_csv_path(&input)
        .with_context(|| format!("Failed to load sweep: {}", input.display()))?;
    info!("Loaded {} samples", sweep.len());

    let report = match &stray_sweep {
        Some(path) => {
            info!("Stray sweep: {}", path.display());
            let stray = SampleSeries::from_csv_path(path)
                .with_context(|| format!("Failed to load stray sweep: {}", path.display()))?;
            extract_two_sweep(&sweep, &stray, &config)
        }
        None => extract_report(&sweep, method, &config),
    }
    .with_context(|| format!("Extraction failed for {}", input.display()))?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&input, &report);
    }

    Ok(())
}
