use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crystalfit::analysis::{ExtractionConfig, Method, StraySource};
use crystalfit::units::parse_scaled;

mod batch;
mod demo;
mod extract;
mod info;

mod config;
mod report;

pub use config::{Config, Fixture};

/// crystalfit - Quartz crystal equivalent-circuit extraction
#[derive(Parser)]
#[command(name = "crystalfit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Measurement fixture preset.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FixtureArg {
    /// 2-port 50 Ohm system with resistive padding (Rl = 12.5 Ohm)
    #[default]
    TwoPort,
    /// Plain one-port 50 Ohm setup (Rl = 50 Ohm)
    OnePort,
}

impl From<FixtureArg> for Fixture {
    fn from(arg: FixtureArg) -> Self {
        match arg {
            FixtureArg::TwoPort => Fixture::TwoPort,
            FixtureArg::OnePort => Fixture::OnePort,
        }
    }
}

/// Flags shared by every command that runs an extraction.
///
/// Each flag overrides the matching `[extraction]` key of the config file,
/// which in turn overrides the fixture preset.
#[derive(Args, Debug, Default, Clone)]
pub struct ExtractionArgs {
    /// Extraction method (phase-shift, three-db, g3uur)
    #[arg(short = 'm', long)]
    method: Option<Method>,

    /// Fixture preset providing the default source/load resistance
    #[arg(long, value_enum)]
    fixture: Option<FixtureArg>,

    /// Source/load resistance in Ohm
    #[arg(long, value_name = "OHM")]
    rl: Option<f64>,

    /// Load capacitance in pF for the ESR figure (accepts `18` or `18p`)
    #[arg(long, value_name = "PF", value_parser = parse_pf)]
    cl: Option<f64>,

    /// Stray fixture capacitance in fF for the two-sweep method
    #[arg(long = "stray-ff", value_name = "FF", value_parser = parse_ff)]
    stray_ff: Option<f64>,

    /// Nominal package capacitance in pF for the two-sweep method
    #[arg(long = "nominal-c0-pf", value_name = "PF", value_parser = parse_pf)]
    nominal_c0_pf: Option<f64>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn parse_pf(s: &str) -> Result<f64, String> {
    parse_scaled(s, 1e-12).ok_or_else(|| format!("invalid capacitance '{}'", s))
}

fn parse_ff(s: &str) -> Result<f64, String> {
    parse_scaled(s, 1e-15).ok_or_else(|| format!("invalid capacitance '{}'", s))
}

impl ExtractionArgs {
    /// Resolve the method and fixture configuration.
    ///
    /// Precedence: command-line flags, then the config file, then the
    /// fixture preset.
    pub fn resolve(&self) -> Result<(Method, ExtractionConfig)> {
        let file = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let section = file.extraction;

        let fixture = self
            .fixture
            .map(Fixture::from)
            .or(section.fixture)
            .unwrap_or_default();
        let mut config = fixture.preset();

        if let Some(rl) = self.rl.or(section.source_resistance_ohm) {
            config.source_resistance_ohm = rl;
        }
        if let Some(cl) = self.cl.or(section.load_capacitance_pf) {
            config.load_capacitance_pf = cl;
        }
        if let Some(stray) = self.stray_ff.or(section.stray_capacitance_ff) {
            config.stray_capacitance_ff = stray;
        }
        if let Some(c0) = self.nominal_c0_pf.or(section.nominal_c0_pf) {
            config.nominal_c0_pf = c0;
        }
        if let Some(source) = section.stray_source {
            config.stray_source = source;
        }

        let method = self.method.or(section.method).unwrap_or_default();
        config.validate()?;
        Ok((method, config))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the equivalent circuit from one sweep
    Extract {
        /// Sweep CSV file
        #[arg(value_name = "CSV")]
        input: PathBuf,

        #[command(flatten)]
        extraction: ExtractionArgs,

        /// Second sweep of the empty fixture (two-sweep method)
        #[arg(long = "stray-sweep", value_name = "CSV")]
        stray_sweep: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract every sweep and print one line per file
    Batch {
        /// Sweep CSV files
        #[arg(value_name = "CSV", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },

    /// Display information about a sweep file
    Info {
        /// Sweep CSV file
        #[arg(value_name = "CSV")]
        file: PathBuf,
    },

    /// Simulate a 26 MHz crystal, write the sweep and analyse it
    Demo {
        /// Output CSV path
        #[arg(value_name = "OUTPUT", default_value = "demo_sweep.csv")]
        output: PathBuf,

        /// Extraction method (phase-shift, three-db, g3uur)
        #[arg(short = 'm', long, default_value = "phase-shift")]
        method: Method,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract {
            input,
            extraction,
            stray_sweep,
            json,
        } => extract::run(input, &extraction, stray_sweep, json),
        Commands::Batch { inputs, extraction } => batch::run(inputs, &extraction),
        Commands::Info { file } => info::run(file),
        Commands::Demo { output, method } => demo::run(output, method),
    }
}

/// Stray source implied by the presence of a stray sweep file
fn stray_source_for(stray_sweep: bool, configured: StraySource) -> StraySource {
    if stray_sweep {
        StraySource::StraySweep
    } else {
        configured
    }
}
