use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Extraction strategy selector.
///
/// All strategies share the resonance-location step and differ in how the
/// bandwidth is measured and which closed-form formula set converts it into
/// circuit elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// 45° phase-crossing bandwidth around the series resonance.
    #[default]
    PhaseShift,
    /// -3 dB transmission bandwidth around the series resonance.
    ThreeDb,
    /// G3UUR two-sweep variant: C1 from the fs/fp spacing and the known
    /// shunt capacitance, no bandwidth measurement.
    G3uur,
}

impl Method {
    /// Returns all available method names
    pub fn variants() -> &'static [&'static str] {
        &["phase-shift", "three-db", "g3uur"]
    }

    /// Returns true if the method measures a bandwidth
    pub fn uses_bandwidth(&self) -> bool {
        !matches!(self, Method::G3uur)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::PhaseShift => write!(f, "phase-shift"),
            Method::ThreeDb => write!(f, "three-db"),
            Method::G3uur => write!(f, "g3uur"),
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "phase-shift" | "phaseshift" | "phase" | "45" => Ok(Method::PhaseShift),
            "three-db" | "threedb" | "3db" | "-3db" => Ok(Method::ThreeDb),
            "g3uur" | "two-sweep" => Ok(Method::G3uur),
            _ => Err(format!(
                "Unknown method '{}'. Valid options: {}",
                s,
                Method::variants().join(", ")
            )),
        }
    }
}

/// Where the two-sweep method takes the fixture stray capacitance from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StraySource {
    /// Use [`ExtractionConfig::stray_capacitance_ff`] as given
    #[default]
    Configured,
    /// Derive it from the reactance reading of a second sweep taken
    /// without the crystal
    StraySweep,
}

/// Measurement fixture and formula constants for one extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Source and load resistance seen by the crystal, in Ohm.
    /// 12.5 for a 2-port 50 Ohm system with resistive padding,
    /// 50 for a plain one-port setup.
    pub source_resistance_ohm: f64,

    /// Load capacitance in pF used for the ESR figure (0 = not specified)
    pub load_capacitance_pf: f64,

    /// Stray fixture capacitance in fF for the two-sweep method
    pub stray_capacitance_ff: f64,

    /// Nominal package capacitance C0 in pF for the two-sweep method.
    /// This is a caller-supplied constant, never derived from the sweep.
    pub nominal_c0_pf: f64,

    /// Source of the stray capacitance for the two-sweep method
    pub stray_source: StraySource,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::two_port()
    }
}

impl ExtractionConfig {
    /// 2-port 50 Ohm fixture with resistive padding (Rl = 12.5 Ohm)
    pub fn two_port() -> Self {
        Self {
            source_resistance_ohm: 12.5,
            load_capacitance_pf: 0.0,
            stray_capacitance_ff: 600.0,
            nominal_c0_pf: 0.0,
            stray_source: StraySource::Configured,
        }
    }

    /// Plain one-port 50 Ohm fixture (Rl = 50 Ohm)
    pub fn one_port() -> Self {
        Self {
            source_resistance_ohm: 50.0,
            ..Self::two_port()
        }
    }

    /// Set the source/load resistance in Ohm
    pub fn with_source_resistance(mut self, ohm: f64) -> Self {
        self.source_resistance_ohm = ohm;
        self
    }

    /// Set the load capacitance in pF
    pub fn with_load_capacitance_pf(mut self, pf: f64) -> Self {
        self.load_capacitance_pf = pf;
        self
    }

    /// Set the stray fixture capacitance in fF
    pub fn with_stray_capacitance_ff(mut self, ff: f64) -> Self {
        self.stray_capacitance_ff = ff;
        self
    }

    /// Set the nominal package capacitance in pF
    pub fn with_nominal_c0_pf(mut self, pf: f64) -> Self {
        self.nominal_c0_pf = pf;
        self
    }

    /// Set the stray capacitance source
    pub fn with_stray_source(mut self, source: StraySource) -> Self {
        self.stray_source = source;
        self
    }

    /// Load capacitance in Farad (0 when not specified)
    pub fn load_capacitance(&self) -> f64 {
        self.load_capacitance_pf * 1e-12
    }

    /// Configured stray capacitance in Farad
    pub fn stray_capacitance(&self) -> f64 {
        self.stray_capacitance_ff * 1e-15
    }

    /// Nominal package capacitance in Farad
    pub fn nominal_c0(&self) -> f64 {
        self.nominal_c0_pf * 1e-12
    }

    /// Check the caller contract
    pub fn validate(&self) -> Result<(), ExtractionError> {
        let rl = self.source_resistance_ohm;
        if !rl.is_finite() || rl <= 0.0 {
            return Err(ExtractionError::invalid(format!(
                "source resistance must be positive, got {} Ohm",
                rl
            )));
        }

        let capacitances = [
            ("load capacitance", self.load_capacitance_pf, "pF"),
            ("stray capacitance", self.stray_capacitance_ff, "fF"),
            ("nominal C0", self.nominal_c0_pf, "pF"),
        ];
        for (name, value, unit) in capacitances {
            if !value.is_finite() || value < 0.0 {
                return Err(ExtractionError::invalid(format!(
                    "{} must be a non-negative number, got {} {}",
                    name, value, unit
                )));
            }
        }

        Ok(())
    }
}
