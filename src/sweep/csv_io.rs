//! CSV load/save of sweep tables.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use super::{SampleSeries, SampleSeriesBuilder, SweepError};

/// Header of the frequency column
pub const FREQUENCY_COLUMN: &str = "Frequency(Hz)";
/// Header of the stored transmission-loss column
pub const LOSS_COLUMN: &str = "Transmission Loss(dB)";
/// Header of the phase column
pub const PHASE_COLUMN: &str = "Phase(deg)";

impl SampleSeries {
    /// Load a sweep table from a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, SweepError> {
        let path = path.as_ref();
        debug!("reading sweep table: {}", path.display());
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parse a sweep table from a reader.
    ///
    /// Columns are located by header name, ignoring case and surrounding
    /// whitespace, so an extra index column written by dataframe exports
    /// is tolerated. Rows must already be sorted by frequency.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SweepError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();

        let frequency_idx = find_column(&headers, FREQUENCY_COLUMN, "frequency")?;
        let loss_idx = find_column(&headers, LOSS_COLUMN, "loss")?;
        let phase_idx = find_column(&headers, PHASE_COLUMN, "phase")?;

        let mut builder = SampleSeriesBuilder::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let field = |idx: usize, name: &str| -> Result<f64, SweepError> {
                let raw = record.get(idx).ok_or_else(|| SweepError::InvalidRecord {
                    line,
                    message: format!("missing {} field", name),
                })?;
                raw.parse::<f64>().map_err(|e| SweepError::InvalidRecord {
                    line,
                    message: format!("{} value '{}': {}", name, raw, e),
                })
            };

            builder.push(
                field(frequency_idx, FREQUENCY_COLUMN)?,
                field(loss_idx, LOSS_COLUMN)?,
                field(phase_idx, PHASE_COLUMN)?,
            );
        }

        let series = builder.build()?;
        debug!("loaded {} samples", series.len());
        Ok(series)
    }

    /// Write the sweep table to a CSV file
    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<(), SweepError> {
        let path = path.as_ref();
        debug!("saving sweep table to {}", path.display());
        let file = File::create(path)?;
        self.to_csv_writer(BufWriter::new(file))
    }

    /// Write the sweep table with the standard three-column header
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<(), SweepError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([FREQUENCY_COLUMN, LOSS_COLUMN, PHASE_COLUMN])?;
        for sample in self.iter() {
            csv_writer.write_record(&[
                sample.frequency.to_string(),
                sample.loss.to_string(),
                sample.phase.to_string(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Exact header match first, then the first header containing `keyword`
fn find_column(headers: &[String], name: &str, keyword: &str) -> Result<usize, SweepError> {
    let wanted = name.to_lowercase();
    headers
        .iter()
        .position(|h| *h == wanted)
        .or_else(|| headers.iter().position(|h| h.contains(keyword)))
        .ok_or_else(|| SweepError::MissingColumn(name.to_string()))
}
