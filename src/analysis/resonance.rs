//! Series/parallel resonance location.

use log::debug;
use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::sweep::SampleSeries;

/// Minimum number of samples needed to tell fs and fp apart
pub const MIN_LOCATE_SAMPLES: usize = 2;

/// Resonance frequencies and best transmission found in one sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonancePoint {
    /// Series resonance frequency in Hz (maximum of the stored loss column)
    pub fs: f64,
    /// Parallel resonance frequency in Hz (minimum of the stored loss column)
    pub fp: f64,
    /// Stored loss at fs in dB: the minimum insertion loss
    pub loss_min: f64,
    /// Sample index of fs
    pub fs_index: usize,
    /// Sample index of fp
    pub fp_index: usize,
}

/// Sample whose phase is closest to zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroPhasePoint {
    /// Frequency in Hz
    pub frequency: f64,
    /// Stored loss in dB
    pub loss: f64,
}

/// Locate fs, fp and the minimum insertion loss.
///
/// The stored loss column holds negated insertion loss, so fs is the
/// argmax and fp the argmin. Ties resolve to the lowest index. A sweep
/// where both coincide is returned as is; the formulas that divide by
/// `fp² - fs²` report it.
pub fn locate(series: &SampleSeries) -> Result<ResonancePoint, ExtractionError> {
    if series.len() < MIN_LOCATE_SAMPLES {
        return Err(ExtractionError::InsufficientData {
            required: MIN_LOCATE_SAMPLES,
            actual: series.len(),
        });
    }

    let losses = series.losses();
    let mut fs_index = 0;
    let mut fp_index = 0;
    for (i, &loss) in losses.iter().enumerate().skip(1) {
        if loss > losses[fs_index] {
            fs_index = i;
        }
        if loss < losses[fp_index] {
            fp_index = i;
        }
    }

    let frequencies = series.frequencies();
    let point = ResonancePoint {
        fs: frequencies[fs_index],
        fp: frequencies[fp_index],
        loss_min: losses[fs_index],
        fs_index,
        fp_index,
    };

    debug!("minimum loss: {} dB", point.loss_min);
    debug!("fs = {} Hz", point.fs);
    debug!("fp = {} Hz", point.fp);

    Ok(point)
}

/// Sample with the smallest absolute phase (first on ties)
pub fn zero_phase_point(series: &SampleSeries) -> Option<ZeroPhasePoint> {
    let phases = series.phases();
    let mut best: Option<usize> = None;
    for (i, phase) in phases.iter().enumerate() {
        match best {
            Some(b) if phase.abs() >= phases[b].abs() => {}
            _ => best = Some(i),
        }
    }

    best.map(|i| ZeroPhasePoint {
        frequency: series.frequencies()[i],
        loss: series.losses()[i],
    })
}
