//! TOML configuration file support for repeated measurements on one fixture.
//!
//! Instead of passing the fixture flags every time, users can keep them in a
//! config file:
//!
//! ```toml
//! # crystalfit.toml
//! [extraction]
//! method = "three-db"
//! fixture = "two-port"
//! source_resistance_ohm = 12.5
//! load_capacitance_pf = 18.0
//! stray_capacitance_ff = 600.0
//! nominal_c0_pf = 0.0
//! stray_source = "configured"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crystalfit::analysis::{ExtractionConfig, Method, StraySource};

/// Root configuration structure for crystalfit.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Extraction settings.
    #[serde(default)]
    pub extraction: ExtractionSection,
}

/// Measurement fixture preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fixture {
    /// 2-port 50 Ohm system with resistive padding
    #[default]
    TwoPort,
    /// Plain one-port 50 Ohm setup
    OnePort,
}

impl Fixture {
    /// Returns the configuration preset for this fixture.
    pub fn preset(&self) -> ExtractionConfig {
        match self {
            Fixture::TwoPort => ExtractionConfig::two_port(),
            Fixture::OnePort => ExtractionConfig::one_port(),
        }
    }
}

/// Settings for the extraction commands. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionSection {
    /// Extraction method.
    pub method: Option<Method>,

    /// Fixture preset.
    pub fixture: Option<Fixture>,

    /// Source/load resistance in Ohm.
    pub source_resistance_ohm: Option<f64>,

    /// Load capacitance in pF.
    pub load_capacitance_pf: Option<f64>,

    /// Stray fixture capacitance in fF.
    pub stray_capacitance_ff: Option<f64>,

    /// Nominal package capacitance in pF.
    pub nominal_c0_pf: Option<f64>,

    /// Where the two-sweep method takes the stray capacitance from.
    pub stray_source: Option<StraySource>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
