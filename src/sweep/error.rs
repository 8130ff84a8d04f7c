use crate::analysis::ExtractionError;

/// Errors that can occur while loading or saving a sweep table
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// I/O error reading or writing the table
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A required column is missing from the header
    #[error("Missing required sweep column: {0}")]
    MissingColumn(String),

    /// A record could not be interpreted
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord {
        /// 1-based line number in the source table
        line: u64,
        /// What was wrong with the record
        message: String,
    },

    /// The table parsed but does not form a valid sample series
    #[error("Invalid sweep: {0}")]
    SeriesError(#[from] ExtractionError),
}
