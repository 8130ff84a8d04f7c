//! Bandwidth estimation around the series resonance.
//!
//! Two interchangeable estimators read the same [`SampleSeries`]:
//!
//! - [`BandwidthEstimator::PhaseCrossing`]: separation of the points where
//!   the phase descends through +45° and -45°.
//! - [`BandwidthEstimator::ThreeDb`]: separation of the points where the
//!   stored loss crosses `loss_min - 3 dB` on either skirt.
//!
//! Both make a single pass in frequency order. A missing crossing is always
//! reported as [`ExtractionError::BandwidthNotFound`]; neither estimator
//! falls back to a zero bandwidth.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{ExtractionError, ResonancePoint};
use crate::sweep::SampleSeries;

/// Phase in degrees that marks the edges of the phase-crossing bandwidth
pub const PHASE_CROSSING_DEG: f64 = 45.0;

/// Drop below the best transmission that marks the -3 dB bandwidth
pub const THREE_DB_DROP: f64 = 3.0;

/// Crossing detection compares neighbouring pairs
pub const MIN_BANDWIDTH_SAMPLES: usize = 3;

/// The two crossing frequencies and the bandwidth between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandwidthMeasurement {
    /// Lower crossing frequency in Hz
    pub lower_hz: f64,
    /// Upper crossing frequency in Hz
    pub upper_hz: f64,
    /// `upper_hz - lower_hz`
    pub bandwidth_hz: f64,
}

impl BandwidthMeasurement {
    fn new(lower_hz: f64, upper_hz: f64) -> Result<Self, ExtractionError> {
        let bandwidth_hz = upper_hz - lower_hz;
        if bandwidth_hz <= 0.0 {
            return Err(ExtractionError::ZeroBandwidth(format!(
                "crossings at {} Hz and {} Hz",
                lower_hz, upper_hz
            )));
        }
        debug!("bandwidth = {} Hz ({} Hz .. {} Hz)", bandwidth_hz, lower_hz, upper_hz);
        Ok(Self {
            lower_hz,
            upper_hz,
            bandwidth_hz,
        })
    }
}

/// Bandwidth estimation algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandwidthEstimator {
    /// 45° phase-crossing bandwidth
    PhaseCrossing,
    /// -3 dB transmission bandwidth
    ThreeDb,
}

impl BandwidthEstimator {
    /// Measure the bandwidth and return both crossing frequencies
    pub fn measure(
        &self,
        series: &SampleSeries,
        resonance: &ResonancePoint,
    ) -> Result<BandwidthMeasurement, ExtractionError> {
        if series.len() < MIN_BANDWIDTH_SAMPLES {
            return Err(ExtractionError::InsufficientData {
                required: MIN_BANDWIDTH_SAMPLES,
                actual: series.len(),
            });
        }

        match self {
            BandwidthEstimator::PhaseCrossing => phase_crossing(series),
            BandwidthEstimator::ThreeDb => three_db(series, resonance),
        }
    }

    /// Bandwidth in Hz
    pub fn estimate(
        &self,
        series: &SampleSeries,
        resonance: &ResonancePoint,
    ) -> Result<f64, ExtractionError> {
        self.measure(series, resonance).map(|m| m.bandwidth_hz)
    }
}

/// Scan for the first +45° descent, stopping at the first -45° descent.
///
/// Each crossing is placed at the plain midpoint of the bracketing pair.
/// The scan is ordered: a -45° descent ahead of any +45° descent ends it
/// with no +45° point, so a recorded pair is always `plus < minus`.
fn phase_crossing(series: &SampleSeries) -> Result<BandwidthMeasurement, ExtractionError> {
    let phase = series.phases();
    let frequency = series.frequencies();

    let mut plus: Option<f64> = None;
    let mut minus: Option<f64> = None;

    for m in 1..phase.len() {
        let (prev, cur) = (phase[m - 1], phase[m]);
        let midpoint = (frequency[m - 1] + frequency[m]) / 2.0;

        if cur <= PHASE_CROSSING_DEG && prev >= PHASE_CROSSING_DEG {
            if plus.is_none() {
                debug!("+45deg crossing at {} Hz ({} deg)", midpoint, cur);
                plus = Some(midpoint);
            }
        } else if cur <= -PHASE_CROSSING_DEG && prev >= -PHASE_CROSSING_DEG {
            debug!("-45deg crossing at {} Hz ({} deg)", midpoint, cur);
            minus = Some(midpoint);
            break;
        }
    }

    match (plus, minus) {
        (Some(plus), Some(minus)) => BandwidthMeasurement::new(plus, minus),
        (None, _) => Err(ExtractionError::BandwidthNotFound(
            "no +45deg phase crossing in sweep".to_string(),
        )),
        (Some(_), None) => Err(ExtractionError::BandwidthNotFound(
            "no -45deg phase crossing in sweep".to_string(),
        )),
    }
}

/// Scan for the first rise through `loss_min - 3 dB`, then the first fall
/// through it. Each crossing is placed at the lower sample of its pair.
fn three_db(
    series: &SampleSeries,
    resonance: &ResonancePoint,
) -> Result<BandwidthMeasurement, ExtractionError> {
    let loss = series.losses();
    let frequency = series.frequencies();
    let threshold = resonance.loss_min - THREE_DB_DROP;

    let mut lower: Option<f64> = None;
    let mut upper: Option<f64> = None;

    for m in 0..loss.len() - 1 {
        let (cur, next) = (loss[m], loss[m + 1]);
        match lower {
            None => {
                if cur <= threshold && next >= threshold {
                    debug!("first -3dB point at {} Hz", frequency[m]);
                    lower = Some(frequency[m]);
                }
            }
            Some(_) => {
                if cur >= threshold && next <= threshold {
                    debug!("second -3dB point at {} Hz", frequency[m]);
                    upper = Some(frequency[m]);
                    break;
                }
            }
        }
    }

    match (lower, upper) {
        (Some(lower), Some(upper)) => BandwidthMeasurement::new(lower, upper),
        (None, _) => Err(ExtractionError::BandwidthNotFound(format!(
            "loss never rises through {} dB below fs",
            threshold
        ))),
        (Some(_), None) => Err(ExtractionError::BandwidthNotFound(format!(
            "loss never falls through {} dB above fs",
            threshold
        ))),
    }
}
