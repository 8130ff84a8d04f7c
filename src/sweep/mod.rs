//! # Sweep Data Model
//!
//! A [`SampleSeries`] is the immutable record of one frequency sweep: an
//! ordered sequence of `{frequency, loss, phase}` samples. It is the only
//! input the extraction engine reads.
//!
//! ## Sign Convention
//!
//! The `loss` column stores the *negated* insertion loss, as exported by
//! the measurement front end: values are typically negative and the series
//! resonance sits at the column **maximum**. The analysis modules depend on
//! this convention.
//!
//! ## Tables
//!
//! The [`csv_io`] submodule loads and saves the three-column table
//! (`Frequency(Hz)`, `Transmission Loss(dB)`, `Phase(deg)`). Loading is a
//! convenience for callers; the extraction engine never performs I/O.

pub mod csv_io;
mod error;
mod types;


pub use error::SweepError;
pub use types::{Sample, SampleSeries, SampleSeriesBuilder};
