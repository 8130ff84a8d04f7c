use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;

use crystalfit::analysis::extract_batch;
use crystalfit::sweep::SampleSeries;

use super::report::summary_line;
use super::ExtractionArgs;

/// Extract every sweep file and print one line per file
pub fn run(inputs: Vec<PathBuf>, args: &ExtractionArgs) -> Result<()> {
    let (method, config) = args.resolve()?;
    info!("Extracting {} sweeps with the {} method", inputs.len(), method);

    let mut loaded = Vec::with_capacity(inputs.len());
    let mut failures = 0usize;
    for path in &inputs {
        match SampleSeries::from_csv_path(path) {
            Ok(sweep) => loaded.push((path, sweep)),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                println!("{}: load failed: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    let (paths, sweeps): (Vec<_>, Vec<_>) = loaded.into_iter().unzip();
    let results = extract_batch(&sweeps, method, &config);

    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(model) => println!("{}: {}", path.display(), summary_line(&model)),
            Err(e) => {
                println!("{}: {} ({})", path.display(), e, e.kind());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} sweeps failed", failures, inputs.len());
    }
    Ok(())
}
