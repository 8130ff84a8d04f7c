use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BandwidthMeasurement, Method, ResonancePoint, ZeroPhasePoint};
use crate::units::{format_capacitance, format_inductance};

/// Butterworth-Van Dyke equivalent circuit of one crystal.
///
/// Produced in one pass by a successful extraction; every field is finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitModel {
    /// Strategy that produced the model
    pub method: Method,
    /// Motional resistance R1 in Ohm
    pub r1: f64,
    /// Motional capacitance C1 in Farad
    pub c1: f64,
    /// Motional inductance L1 in Henry
    pub l1: f64,
    /// Static (shunt) capacitance C0 in Farad
    pub c0: f64,
    /// Quality factor
    pub q: f64,
    /// Series resonance frequency in Hz
    pub fs: f64,
    /// Parallel resonance frequency in Hz
    pub fp: f64,
    /// Effective series resistance under the configured load capacitance,
    /// in Ohm. Only the -3 dB method reports it, and only when a load
    /// capacitance is configured.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub esr: Option<f64>,
}

impl fmt::Display for CircuitModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fs = {:.0} Hz", self.fs)?;
        writeln!(f, "fp = {:.0} Hz", self.fp)?;
        writeln!(f, "R1 = {:.2} Ohm", self.r1)?;
        writeln!(f, "L1 = {}", format_inductance(self.l1))?;
        writeln!(f, "C1 = {}", format_capacitance(self.c1))?;
        writeln!(f, "C0 = {}", format_capacitance(self.c0))?;
        if let Some(esr) = self.esr {
            writeln!(f, "ESR = {:.2} Ohm", esr)?;
        }
        write!(f, "Q = {:.0}", self.q)
    }
}

/// A circuit model together with the intermediate values that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// The extracted circuit
    pub model: CircuitModel,
    /// Located resonance frequencies and minimum loss
    pub resonance: ResonancePoint,
    /// Measured bandwidth (absent for the two-sweep method)
    pub bandwidth: Option<BandwidthMeasurement>,
    /// Effective resistance `2*Rl + R1` in Ohm
    pub effective_resistance: f64,
    /// Step between the first two samples in Hz
    pub frequency_resolution: Option<f64>,
    /// Sample with the phase closest to zero
    pub zero_phase: Option<ZeroPhasePoint>,
    /// Stray capacitance used by the two-sweep method, in Farad
    pub stray_capacitance: Option<f64>,
    /// Number of samples in the analysed sweep
    pub sample_count: usize,
}
