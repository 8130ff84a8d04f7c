use std::f64::consts::PI;

use log::{debug, info};

use super::bandwidth::{BandwidthEstimator, BandwidthMeasurement};
use super::params::{motional_resistance, FormulaInputs, FormulaSet};
use super::resonance::{locate, zero_phase_point};
use super::{CircuitModel, ExtractionConfig, ExtractionError, ExtractionReport, Method, StraySource};
use crate::sweep::SampleSeries;

/// Stateless extraction strategy: a method bound to a validated fixture
/// configuration.
///
/// An `Extractor` holds no per-sweep state, so one instance can be shared
/// freely and used on any number of sweeps, including from several threads.
///
/// # Example
///
/// ```rust
/// use crystalfit::analysis::{ExtractionConfig, Extractor, Method};
/// use crystalfit::simulate::{simulate_transmission, BvdCrystal, SweepPlan};
///
/// let crystal = BvdCrystal::new(20.0, 7.5e-3, 5.0e-15, 2.0e-12);
/// let plan = SweepPlan::new(25_980_000.0, 26_030_000.0, 5001);
/// let sweep = simulate_transmission(&crystal, 12.5, &plan)?;
///
/// let extractor = Extractor::new(Method::PhaseShift, ExtractionConfig::two_port())?;
/// let model = extractor.extract(&sweep)?;
/// assert!((model.r1 - 20.0).abs() < 1.0);
/// # Ok::<(), crystalfit::analysis::ExtractionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Extractor {
    method: Method,
    config: ExtractionConfig,
}

impl Extractor {
    /// Create an extractor, rejecting an invalid configuration up front
    pub fn new(method: Method, config: ExtractionConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        Ok(Self { method, config })
    }

    /// The selected method
    pub fn method(&self) -> Method {
        self.method
    }

    /// The fixture configuration
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract the circuit model from one sweep
    pub fn extract(&self, series: &SampleSeries) -> Result<CircuitModel, ExtractionError> {
        self.report(series).map(|r| r.model)
    }

    /// Extract the circuit model with the intermediate values
    pub fn report(&self, series: &SampleSeries) -> Result<ExtractionReport, ExtractionError> {
        run(series, None, self.method, &self.config)
    }

    /// Extract with the two-sweep method using a second sweep taken
    /// without the crystal.
    ///
    /// Only valid for an extractor bound to [`Method::G3uur`].
    pub fn report_two_sweep(
        &self,
        series: &SampleSeries,
        stray: &SampleSeries,
    ) -> Result<ExtractionReport, ExtractionError> {
        if self.method != Method::G3uur {
            return Err(ExtractionError::invalid(format!(
                "a stray sweep only applies to g3uur, extractor uses {}",
                self.method
            )));
        }
        run(series, Some(stray), self.method, &self.config)
    }
}

/// Extract the circuit model from one sweep
pub fn extract(
    series: &SampleSeries,
    method: Method,
    config: &ExtractionConfig,
) -> Result<CircuitModel, ExtractionError> {
    extract_report(series, method, config).map(|r| r.model)
}

/// Extract the circuit model and the intermediate values from one sweep
pub fn extract_report(
    series: &SampleSeries,
    method: Method,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, ExtractionError> {
    config.validate()?;
    run(series, None, method, config)
}

/// Two-sweep (G3UUR) extraction.
///
/// `stray` is the sweep taken without the crystal. It is only read when
/// `config.stray_source` is [`StraySource::StraySweep`]; otherwise the
/// configured stray capacitance is used.
pub fn extract_two_sweep(
    series: &SampleSeries,
    stray: &SampleSeries,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, ExtractionError> {
    config.validate()?;
    run(series, Some(stray), Method::G3uur, config)
}

/// Extract every sweep independently, one result per input.
///
/// With the `parallel` feature the sweeps are processed on the rayon
/// thread pool; results keep the input order either way.
pub fn extract_batch(
    series: &[SampleSeries],
    method: Method,
    config: &ExtractionConfig,
) -> Vec<Result<CircuitModel, ExtractionError>> {
    if let Err(e) = config.validate() {
        return series.iter().map(|_| Err(e.clone())).collect();
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        series
            .par_iter()
            .map(|s| run(s, None, method, config).map(|r| r.model))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        series
            .iter()
            .map(|s| run(s, None, method, config).map(|r| r.model))
            .collect()
    }
}

/// Stray fixture capacitance from a sweep taken without the crystal.
///
/// The stored reading nearest `fs` is taken as the fixture reactance Xc in
/// Ohm, giving `Cstray = -1 / (2*pi*fs*Xc)`.
pub fn stray_capacitance_from_sweep(
    stray: &SampleSeries,
    fs: f64,
) -> Result<f64, ExtractionError> {
    let index = stray
        .nearest_index(fs)
        .ok_or(ExtractionError::InsufficientData {
            required: 1,
            actual: 0,
        })?;
    let reactance = stray.losses()[index];
    debug!(
        "stray sweep reading at {} Hz: {} Ohm",
        stray.frequencies()[index],
        reactance
    );

    if reactance == 0.0 {
        return Err(ExtractionError::degenerate(
            "stray sweep reads zero reactance at fs",
        ));
    }

    let capacitance = -1.0 / (2.0 * PI * fs * reactance);
    if !capacitance.is_finite() || capacitance <= 0.0 {
        return Err(ExtractionError::invalid(format!(
            "stray sweep implies a non-physical capacitance of {} F",
            capacitance
        )));
    }
    Ok(capacitance)
}

fn run(
    series: &SampleSeries,
    stray: Option<&SampleSeries>,
    method: Method,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, ExtractionError> {
    let frequency_resolution = series.frequency_resolution();
    if let Some(resolution) = frequency_resolution {
        debug!("frequency resolution = {:.2} Hz", resolution);
    }

    let resonance = locate(series)?;
    if resonance.fs_index == resonance.fp_index {
        return Err(ExtractionError::degenerate(format!(
            "fs and fp coincide at {} Hz (flat loss column)",
            resonance.fs
        )));
    }

    let bandwidth: Option<BandwidthMeasurement> = match method {
        Method::PhaseShift => Some(BandwidthEstimator::PhaseCrossing.measure(series, &resonance)?),
        Method::ThreeDb => Some(BandwidthEstimator::ThreeDb.measure(series, &resonance)?),
        Method::G3uur => None,
    };

    let stray_capacitance = match method {
        Method::G3uur => Some(match (config.stray_source, stray) {
            (StraySource::Configured, _) => config.stray_capacitance(),
            (StraySource::StraySweep, Some(stray)) => {
                stray_capacitance_from_sweep(stray, resonance.fs)?
            }
            (StraySource::StraySweep, None) => {
                return Err(ExtractionError::invalid(
                    "stray capacitance source is the stray sweep, but none was supplied",
                ))
            }
        }),
        _ => None,
    };
    if let Some(cstray) = stray_capacitance {
        debug!("Cstray = {} F", cstray);
    }

    let inputs = FormulaInputs {
        fs: resonance.fs,
        fp: resonance.fp,
        loss_min: resonance.loss_min,
        bandwidth: bandwidth.map(|b| b.bandwidth_hz),
        source_resistance: config.source_resistance_ohm,
        load_capacitance: config.load_capacitance(),
        stray_capacitance: stray_capacitance.unwrap_or(0.0),
        nominal_c0: config.nominal_c0(),
    };
    let model = FormulaSet::from(method).compute(&inputs)?;
    let effective_resistance =
        motional_resistance(resonance.loss_min, config.source_resistance_ohm)?.reff;

    for line in model.to_string().lines() {
        info!("{}", line);
    }

    Ok(ExtractionReport {
        model,
        resonance,
        bandwidth,
        effective_resistance,
        frequency_resolution,
        zero_phase: zero_phase_point(series),
        stray_capacitance,
        sample_count: series.len(),
    })
}
