//! Closed-form conversion of resonance measurements into BVD elements.
//!
//! Every formula set starts from the same motional resistance:
//!
//! ```text
//! R1   = 2*Rl*(10^(|loss_min|/20) - 1)
//! reff = 2*Rl + R1
//! ```
//!
//! and ends with the same static capacitance estimate
//! `C0 = C1*fs^2 / (fp^2 - fs^2)`. The three sets are kept side by side in
//! [`FormulaSet::compute`] so they can be audited against each other.

use std::f64::consts::PI;

use log::warn;

use super::{CircuitModel, ExtractionError, Method};

/// Inputs shared by all formula sets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaInputs {
    /// Series resonance frequency in Hz
    pub fs: f64,
    /// Parallel resonance frequency in Hz
    pub fp: f64,
    /// Stored loss at fs in dB
    pub loss_min: f64,
    /// Measured bandwidth in Hz (required by the bandwidth methods)
    pub bandwidth: Option<f64>,
    /// Source/load resistance Rl in Ohm
    pub source_resistance: f64,
    /// Load capacitance in Farad, 0 if not specified
    pub load_capacitance: f64,
    /// Stray fixture capacitance in Farad
    pub stray_capacitance: f64,
    /// Nominal package capacitance in Farad
    pub nominal_c0: f64,
}

/// Motional resistance R1 and effective resistance `2*Rl + R1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionalResistance {
    /// R1 in Ohm
    pub r1: f64,
    /// reff in Ohm
    pub reff: f64,
}

/// Compute R1 and reff from the minimum insertion loss
pub fn motional_resistance(
    loss_min: f64,
    source_resistance: f64,
) -> Result<MotionalResistance, ExtractionError> {
    if !source_resistance.is_finite() || source_resistance <= 0.0 {
        return Err(ExtractionError::invalid(format!(
            "source resistance must be positive, got {} Ohm",
            source_resistance
        )));
    }
    let r1 = 2.0 * source_resistance * (10f64.powf(loss_min.abs() / 20.0) - 1.0);
    Ok(MotionalResistance {
        r1,
        reff: 2.0 * source_resistance + r1,
    })
}

/// `C0 = C1*fs^2 / (fp^2 - fs^2)`
pub fn static_capacitance(c1: f64, fs: f64, fp: f64) -> Result<f64, ExtractionError> {
    let denominator = fp * fp - fs * fs;
    if denominator == 0.0 {
        return Err(ExtractionError::degenerate(format!(
            "fs and fp coincide at {} Hz",
            fs
        )));
    }
    Ok(c1 * fs * fs / denominator)
}

/// Formula set used to turn the measurements into circuit elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaSet {
    /// 45° bandwidth formulas
    PhaseShift,
    /// -3 dB bandwidth formulas (with ESR)
    ThreeDb,
    /// fs/fp spacing with known shunt capacitance
    G3uur,
}

impl From<Method> for FormulaSet {
    fn from(method: Method) -> Self {
        match method {
            Method::PhaseShift => FormulaSet::PhaseShift,
            Method::ThreeDb => FormulaSet::ThreeDb,
            Method::G3uur => FormulaSet::G3uur,
        }
    }
}

impl FormulaSet {
    fn method(&self) -> Method {
        match self {
            FormulaSet::PhaseShift => Method::PhaseShift,
            FormulaSet::ThreeDb => Method::ThreeDb,
            FormulaSet::G3uur => Method::G3uur,
        }
    }

    /// Compute the full circuit model.
    ///
    /// Fails with `DegenerateResonance` when fs == fp or any result is not
    /// finite, `ZeroBandwidth` for a non-positive bandwidth, and
    /// `InvalidConfiguration` for a non-positive Rl or missing bandwidth.
    pub fn compute(&self, inputs: &FormulaInputs) -> Result<CircuitModel, ExtractionError> {
        let FormulaInputs {
            fs,
            fp,
            loss_min,
            ..
        } = *inputs;

        if !fs.is_finite() || fs <= 0.0 {
            return Err(ExtractionError::degenerate(format!(
                "series resonance must be a positive frequency, got {} Hz",
                fs
            )));
        }
        if fp == fs {
            return Err(ExtractionError::degenerate(format!(
                "fs and fp coincide at {} Hz",
                fs
            )));
        }
        if fp < fs {
            warn!("fp ({} Hz) lies below fs ({} Hz); C0 will be negative", fp, fs);
        }

        let MotionalResistance { r1, reff } =
            motional_resistance(loss_min, inputs.source_resistance)?;

        let model = match self {
            FormulaSet::PhaseShift => {
                let bandwidth = self.bandwidth(inputs)?;
                let c1 = bandwidth / (2.0 * PI * fs * fs * reff);
                let l1 = reff / (2.0 * PI * bandwidth);
                let q = 2.0 * PI * fs * l1 / r1;
                let c0 = static_capacitance(c1, fs, fp)?;
                CircuitModel {
                    method: Method::PhaseShift,
                    r1,
                    c1,
                    l1,
                    c0,
                    q,
                    fs,
                    fp,
                    esr: None,
                }
            }
            FormulaSet::ThreeDb => {
                let bandwidth = self.bandwidth(inputs)?;
                let q = fs / bandwidth;
                let l1 = q * reff / (2.0 * PI * fs);
                let c1 = 1.0 / (4.0 * PI * PI * fs * fs * l1);
                let c0 = static_capacitance(c1, fs, fp)?;
                let cl = inputs.load_capacitance;
                let esr = if cl == 0.0 {
                    None
                } else {
                    Some(r1 * (1.0 + c0 / cl).powi(2))
                };
                CircuitModel {
                    method: Method::ThreeDb,
                    r1,
                    c1,
                    l1,
                    c0,
                    q,
                    fs,
                    fp,
                    esr,
                }
            }
            FormulaSet::G3uur => {
                let shunt = inputs.nominal_c0 + inputs.stray_capacitance;
                let c1 = (fp / fs - 1.0) * 2.0 * shunt;
                let l1 = 1.0 / (4.0 * PI * PI * fs * fs * c1);
                let c0 = static_capacitance(c1, fs, fp)?;
                let q = 2.0 * PI * fs * l1 / reff;
                CircuitModel {
                    method: Method::G3uur,
                    r1,
                    c1,
                    l1,
                    c0,
                    q,
                    fs,
                    fp,
                    esr: None,
                }
            }
        };

        check_finite(&model)?;
        Ok(model)
    }

    fn bandwidth(&self, inputs: &FormulaInputs) -> Result<f64, ExtractionError> {
        let bandwidth = inputs.bandwidth.ok_or_else(|| {
            ExtractionError::invalid(format!(
                "the {} formulas require a measured bandwidth",
                self.method()
            ))
        })?;
        if bandwidth.is_nan() || bandwidth <= 0.0 {
            return Err(ExtractionError::ZeroBandwidth(format!(
                "bandwidth of {} Hz cannot be used",
                bandwidth
            )));
        }
        Ok(bandwidth)
    }
}

fn check_finite(model: &CircuitModel) -> Result<(), ExtractionError> {
    let fields = [
        ("R1", model.r1),
        ("C1", model.c1),
        ("L1", model.l1),
        ("C0", model.c0),
        ("Q", model.q),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(ExtractionError::degenerate(format!(
                "{} evaluated to {}",
                name, value
            )));
        }
    }
    if let Some(esr) = model.esr {
        if !esr.is_finite() {
            return Err(ExtractionError::degenerate(format!("ESR evaluated to {}", esr)));
        }
    }
    Ok(())
}
