//! # Resonance-Parameter Extraction
//!
//! This module turns one swept transmission measurement of a quartz crystal
//! into its Butterworth-Van Dyke (BVD) equivalent circuit: motional R1, C1,
//! L1, static C0 and the quality factor Q.
//!
//! ## Pipeline
//!
//! ```text
//! SampleSeries -> locate -> (fs, fp, loss_min)
//!              -> bandwidth estimator -> bandwidth
//!              -> formula set -> CircuitModel
//! ```
//!
//! 1. [`resonance::locate`] finds the series resonance (maximum of the
//!    stored loss column), the parallel resonance (its minimum) and the
//!    minimum insertion loss.
//! 2. A [`BandwidthEstimator`] measures the characteristic bandwidth around
//!    fs, either from the ±45° phase crossings or from the -3 dB skirt.
//! 3. A [`FormulaSet`] converts the measurements into circuit elements.
//!
//! ## Methods
//!
//! | Method | Bandwidth | Formulas |
//! |--------|-----------|----------|
//! | [`Method::PhaseShift`] | ±45° phase | `C1 = BW/(2*pi*fs^2*reff)`, `L1 = reff/(2*pi*BW)`, `Q = 2*pi*fs*L1/R1` |
//! | [`Method::ThreeDb`] | -3 dB loss | `Q = fs/BW`, `L1 = Q*reff/(2*pi*fs)`, `C1 = 1/(4*pi^2*fs^2*L1)`, ESR |
//! | [`Method::G3uur`] | none | `C1 = 2*(fp/fs - 1)*(C0_nominal + Cstray)`, `L1 = 1/(4*pi^2*fs^2*C1)` |
//!
//! All methods are pure functions of the sweep and the configuration. No
//! state is kept between calls and no I/O is performed.
//!
//! ## Usage
//!
//! ```rust
//! use crystalfit::analysis::{extract, ExtractionConfig, Method};
//! use crystalfit::simulate::{simulate_transmission, BvdCrystal, SweepPlan};
//!
//! let crystal = BvdCrystal::new(20.0, 7.5e-3, 5.0e-15, 2.0e-12);
//! let sweep = simulate_transmission(
//!     &crystal,
//!     12.5,
//!     &SweepPlan::new(25_980_000.0, 26_030_000.0, 5001),
//! )?;
//!
//! let model = extract(&sweep, Method::ThreeDb, &ExtractionConfig::two_port())?;
//! println!("{}", model);
//! # Ok::<(), crystalfit::analysis::ExtractionError>(())
//! ```

pub mod bandwidth;
mod config;
mod error;
mod extract;
mod model;
pub mod params;
pub mod resonance;

#[cfg(test)]
mod tests;

pub use bandwidth::{BandwidthEstimator, BandwidthMeasurement};
pub use config::{ExtractionConfig, Method, StraySource};
pub use error::{ErrorKind, ExtractionError};
pub use extract::{
    extract, extract_batch, extract_report, extract_two_sweep, stray_capacitance_from_sweep,
    Extractor,
};
pub use model::{CircuitModel, ExtractionReport};
pub use params::{FormulaInputs, FormulaSet};
pub use resonance::{locate, ResonancePoint, ZeroPhasePoint};
