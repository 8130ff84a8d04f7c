//! # crystalfit CLI
//!
//! A command-line tool for extracting quartz crystal equivalent circuits
//! from swept transmission measurements.
//!
//! ## Usage
//!
//! ```bash
//! # Extract with the 45 degree phase method on a 12.5 Ohm fixture
//! crystalfit extract sweep.csv
//!
//! # -3 dB method with ESR at 18 pF load, one-port fixture
//! crystalfit extract sweep.csv --method three-db --fixture one-port --cl 18
//!
//! # Two-sweep method with a second sweep of the empty fixture
//! crystalfit extract sweep.csv --method g3uur --stray-sweep empty.csv
//!
//! # Generate a synthetic sweep and analyse it
//! crystalfit demo demo_sweep.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
