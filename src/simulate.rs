//! # Synthetic Sweeps
//!
//! Forward model of a crystal in a series-through transmission fixture.
//! Produces [`SampleSeries`] values in the same sign convention as the
//! measurement front end, for demos, tests and benchmarks.
//!
//! The crystal is the Butterworth-Van Dyke network: the motional branch
//! `R1 + L1 + C1` in parallel with the static capacitance `C0`. It sits in
//! series between a source and a load of resistance `Rl` each:
//!
//! ```text
//! S21   = 2*Rl / (2*Rl + Z)
//! loss  = 20*log10(|S21|)        (dB, <= 0, maximum at fs)
//! phase = arg(S21)               (degrees)
//! ```

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::analysis::ExtractionError;
use crate::sweep::{SampleSeries, SampleSeriesBuilder};

/// Butterworth-Van Dyke crystal model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvdCrystal {
    /// Motional resistance in Ohm
    pub r1: f64,
    /// Motional inductance in Henry
    pub l1: f64,
    /// Motional capacitance in Farad
    pub c1: f64,
    /// Static capacitance in Farad (0 for none)
    pub c0: f64,
}

impl BvdCrystal {
    /// Create a crystal from its four elements
    pub fn new(r1: f64, l1: f64, c1: f64, c0: f64) -> Self {
        Self { r1, l1, c1, c0 }
    }

    /// Series resonance `1 / (2*pi*sqrt(L1*C1))` in Hz
    pub fn series_resonance(&self) -> f64 {
        1.0 / (2.0 * PI * (self.l1 * self.c1).sqrt())
    }

    /// Parallel resonance `fs*sqrt(1 + C1/C0)` in Hz (infinite without C0)
    pub fn parallel_resonance(&self) -> f64 {
        self.series_resonance() * (1.0 + self.c1 / self.c0).sqrt()
    }

    /// Unloaded quality factor `2*pi*fs*L1/R1`
    pub fn quality_factor(&self) -> f64 {
        2.0 * PI * self.series_resonance() * self.l1 / self.r1
    }

    /// Terminal impedance at `frequency` Hz
    pub fn impedance(&self, frequency: f64) -> Complex64 {
        let omega = 2.0 * PI * frequency;
        let motional = Complex64::new(self.r1, omega * self.l1 - 1.0 / (omega * self.c1));
        if self.c0 == 0.0 {
            return motional;
        }
        let shunt = Complex64::new(0.0, -1.0 / (omega * self.c0));
        motional * shunt / (motional + shunt)
    }
}

/// Linear frequency sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPlan {
    /// First frequency in Hz
    pub start_hz: f64,
    /// Last frequency in Hz
    pub stop_hz: f64,
    /// Number of points, including both ends
    pub points: usize,
}

impl SweepPlan {
    /// Sweep from `start_hz` to `stop_hz` inclusive
    pub fn new(start_hz: f64, stop_hz: f64, points: usize) -> Self {
        Self {
            start_hz,
            stop_hz,
            points,
        }
    }

    /// Sweep of `span_hz` centred on `center_hz`
    pub fn centered(center_hz: f64, span_hz: f64, points: usize) -> Self {
        Self::new(center_hz - span_hz / 2.0, center_hz + span_hz / 2.0, points)
    }

    /// Frequency step in Hz
    pub fn step(&self) -> f64 {
        (self.stop_hz - self.start_hz) / (self.points.saturating_sub(1).max(1)) as f64
    }

    /// Iterate over the sweep frequencies
    pub fn frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        let step = self.step();
        (0..self.points).map(move |i| self.start_hz + i as f64 * step)
    }

    fn validate(&self) -> Result<(), ExtractionError> {
        if self.points < 2 {
            return Err(ExtractionError::invalid(format!(
                "a sweep needs at least 2 points, got {}",
                self.points
            )));
        }
        if !self.start_hz.is_finite()
            || !self.stop_hz.is_finite()
            || self.start_hz <= 0.0
            || self.stop_hz <= self.start_hz
        {
            return Err(ExtractionError::invalid(format!(
                "invalid sweep range {} Hz .. {} Hz",
                self.start_hz, self.stop_hz
            )));
        }
        Ok(())
    }
}

/// Simulate the transmission sweep of `crystal` between source and load
/// resistances of `source_resistance` Ohm
pub fn simulate_transmission(
    crystal: &BvdCrystal,
    source_resistance: f64,
    plan: &SweepPlan,
) -> Result<SampleSeries, ExtractionError> {
    plan.validate()?;
    if !source_resistance.is_finite() || source_resistance <= 0.0 {
        return Err(ExtractionError::invalid(format!(
            "source resistance must be positive, got {} Ohm",
            source_resistance
        )));
    }

    let termination = Complex64::new(2.0 * source_resistance, 0.0);
    let mut builder = SampleSeriesBuilder::with_capacity(plan.points);
    for frequency in plan.frequencies() {
        let s21 = termination / (termination + crystal.impedance(frequency));
        builder.push(frequency, 20.0 * s21.norm().log10(), s21.arg().to_degrees());
    }
    builder.build()
}

/// Simulate the sweep of an empty fixture whose stored reading is the
/// reactance `-1/(2*pi*f*Cstray)` of the stray capacitance
pub fn simulate_stray_sweep(
    stray_capacitance: f64,
    plan: &SweepPlan,
) -> Result<SampleSeries, ExtractionError> {
    plan.validate()?;
    if !stray_capacitance.is_finite() || stray_capacitance <= 0.0 {
        return Err(ExtractionError::invalid(format!(
            "stray capacitance must be positive, got {} F",
            stray_capacitance
        )));
    }

    let mut builder = SampleSeriesBuilder::with_capacity(plan.points);
    for frequency in plan.frequencies() {
        let reactance = -1.0 / (2.0 * PI * frequency * stray_capacitance);
        builder.push(frequency, reactance, -90.0);
    }
    builder.build()
}
