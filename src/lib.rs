//! # crystalfit - Quartz Crystal Equivalent-Circuit Extraction
//!
//! `crystalfit` turns a swept transmission measurement of a quartz crystal
//! into its Butterworth-Van Dyke (BVD) equivalent circuit:
//!
//! ```text
//!        +---- R1 ---- L1 ---- C1 ----+
//!   o----+                            +----o
//!        +------------ C0 ------------+
//! ```
//!
//! ## Key Features
//!
//! - **Three extraction methods**: 45° phase-crossing bandwidth, -3 dB
//!   bandwidth (with ESR at a given load capacitance) and the G3UUR
//!   two-sweep method that needs no bandwidth at all.
//!
//! - **Pure and stateless**: extraction is a function of the sweep and the
//!   fixture configuration. Extractors can be shared across threads and
//!   batches run in parallel with the `parallel` feature.
//!
//! - **Typed failures**: a missing crossing, a degenerate resonance or a
//!   zero bandwidth is an [`analysis::ExtractionError`], never a silent zero.
//!
//! - **CSV in, CSV out**: sweeps load from and save to the column layout
//!   written by the usual scalar network analyser front ends.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crystalfit::prelude::*;
//!
//! let sweep = SampleSeries::from_csv_path("sweep.csv")?;
//! let model = extract(&sweep, Method::PhaseShift, &ExtractionConfig::two_port())?;
//!
//! println!("R1 = {:.2} Ohm, Q = {:.0}", model.r1, model.q);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Sign Convention
//!
//! The loss column stores *negated insertion loss* in dB: 0 is perfect
//! transmission and larger is better. Series resonance is therefore the
//! maximum of the column and parallel resonance its minimum. See
//! [`sweep`] for the full data model.
//!
//! ## Architecture
//!
//! - [`sweep`]: validated sample series and CSV I/O
//! - [`analysis`]: resonance location, bandwidth estimation and the formula sets
//! - [`simulate`]: synthetic BVD sweeps for demos and tests
//! - [`units`]: SI prefix parsing and formatting

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod simulate;
pub mod sweep;
pub mod units;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::analysis::{
        extract, extract_batch, extract_report, extract_two_sweep, locate, BandwidthEstimator,
        BandwidthMeasurement, CircuitModel, ErrorKind, ExtractionConfig, ExtractionError,
        ExtractionReport, Extractor, Method, ResonancePoint, StraySource,
    };
    pub use crate::simulate::{simulate_stray_sweep, simulate_transmission, BvdCrystal, SweepPlan};
    pub use crate::sweep::{Sample, SampleSeries, SampleSeriesBuilder, SweepError};
}
