use std::fmt;

/// Errors that can occur while extracting circuit parameters from a sweep
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    /// The sweep holds too few samples for the requested analysis step
    #[error("Insufficient data: {required} samples required, {actual} available")]
    InsufficientData {
        /// Minimum number of samples the step needs
        required: usize,
        /// Number of samples in the sweep
        actual: usize,
    },

    /// A bandwidth crossing was not found within the swept range
    #[error("Bandwidth not found: {0}")]
    BandwidthNotFound(String),

    /// fs equals fp, or a formula denominator vanished
    #[error("Degenerate resonance: {0}")]
    DegenerateResonance(String),

    /// The bandwidth is zero (or negative), so no formula can use it
    #[error("Zero bandwidth: {0}")]
    ZeroBandwidth(String),

    /// Configuration or input data violates the caller contract
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Category of an [`ExtractionError`], without the details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ExtractionError::InsufficientData`]
    InsufficientData,
    /// See [`ExtractionError::BandwidthNotFound`]
    BandwidthNotFound,
    /// See [`ExtractionError::DegenerateResonance`]
    DegenerateResonance,
    /// See [`ExtractionError::ZeroBandwidth`]
    ZeroBandwidth,
    /// See [`ExtractionError::InvalidConfiguration`]
    InvalidConfiguration,
}

impl ExtractionError {
    /// Returns the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::InsufficientData { .. } => ErrorKind::InsufficientData,
            ExtractionError::BandwidthNotFound(_) => ErrorKind::BandwidthNotFound,
            ExtractionError::DegenerateResonance(_) => ErrorKind::DegenerateResonance,
            ExtractionError::ZeroBandwidth(_) => ErrorKind::ZeroBandwidth,
            ExtractionError::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ExtractionError::InvalidConfiguration(message.into())
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        ExtractionError::DegenerateResonance(message.into())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InsufficientData => "insufficient-data",
            ErrorKind::BandwidthNotFound => "bandwidth-not-found",
            ErrorKind::DegenerateResonance => "degenerate-resonance",
            ErrorKind::ZeroBandwidth => "zero-bandwidth",
            ErrorKind::InvalidConfiguration => "invalid-configuration",
        };
        f.write_str(name)
    }
}
