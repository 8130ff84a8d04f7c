use crate::analysis::ExtractionError;

/// A single swept measurement point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Stimulus frequency in Hz
    pub frequency: f64,
    /// Stored transmission reading in dB (the negated insertion loss:
    /// larger means better transmission)
    pub loss: f64,
    /// Transmission phase in degrees, approximately [-180, 180]
    pub phase: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(frequency: f64, loss: f64, phase: f64) -> Self {
        Self {
            frequency,
            loss,
            phase,
        }
    }
}

/// Immutable, frequency-ordered record of one measurement sweep.
///
/// Columns are stored separately (structure of arrays) because every
/// analysis pass scans one or two columns end to end. Construction
/// enforces the model invariants:
///
/// - all three columns have the same length
/// - every value is finite
/// - frequency is strictly increasing
///
/// A series may hold fewer samples than an analysis step needs; that is
/// reported by the step itself with [`ExtractionError::InsufficientData`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    frequency: Vec<f64>,
    loss: Vec<f64>,
    phase: Vec<f64>,
}

impl SampleSeries {
    /// Create a series from its three columns
    pub fn new(
        frequency: Vec<f64>,
        loss: Vec<f64>,
        phase: Vec<f64>,
    ) -> Result<Self, ExtractionError> {
        if frequency.len() != loss.len() || frequency.len() != phase.len() {
            return Err(ExtractionError::invalid(format!(
                "column lengths differ: frequency={}, loss={}, phase={}",
                frequency.len(),
                loss.len(),
                phase.len()
            )));
        }

        for (i, ((f, l), p)) in frequency.iter().zip(&loss).zip(&phase).enumerate() {
            if !f.is_finite() || !l.is_finite() || !p.is_finite() {
                return Err(ExtractionError::invalid(format!(
                    "non-finite value in sample {} ({}, {}, {})",
                    i, f, l, p
                )));
            }
        }

        if let Some(i) = frequency.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ExtractionError::invalid(format!(
                "frequency must be strictly increasing: sample {} ({} Hz) follows {} Hz",
                i + 1,
                frequency[i + 1],
                frequency[i]
            )));
        }

        Ok(Self {
            frequency,
            loss,
            phase,
        })
    }

    /// Create a series from individual samples
    pub fn from_samples<I>(samples: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut builder = SampleSeriesBuilder::new();
        for sample in samples {
            builder = builder.sample(sample);
        }
        builder.build()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// Returns true if the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Frequency column in Hz
    pub fn frequencies(&self) -> &[f64] {
        &self.frequency
    }

    /// Stored loss column in dB
    pub fn losses(&self) -> &[f64] {
        &self.loss
    }

    /// Phase column in degrees
    pub fn phases(&self) -> &[f64] {
        &self.phase
    }

    /// Sample at `index`, if present
    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample::new(
            *self.frequency.get(index)?,
            self.loss[index],
            self.phase[index],
        ))
    }

    /// Iterate over the samples in frequency order
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.frequency
            .iter()
            .zip(&self.loss)
            .zip(&self.phase)
            .map(|((&f, &l), &p)| Sample::new(f, l, p))
    }

    /// Step between the first two samples in Hz.
    ///
    /// Reported for diagnostics only; the sweep is not required to be
    /// uniformly spaced.
    pub fn frequency_resolution(&self) -> Option<f64> {
        match self.frequency.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }

    /// First and last frequency of the sweep
    pub fn frequency_range(&self) -> Option<(f64, f64)> {
        Some((*self.frequency.first()?, *self.frequency.last()?))
    }

    /// Index of the sample whose frequency is closest to `frequency`
    pub fn nearest_index(&self, frequency: f64) -> Option<usize> {
        if self.frequency.is_empty() {
            return None;
        }
        let upper = self.frequency.partition_point(|&f| f < frequency);
        if upper == 0 {
            return Some(0);
        }
        if upper == self.frequency.len() {
            return Some(upper - 1);
        }
        let below = frequency - self.frequency[upper - 1];
        let above = self.frequency[upper] - frequency;
        Some(if below <= above { upper - 1 } else { upper })
    }
}

/// Builder for constructing a [`SampleSeries`] point by point
#[derive(Debug, Default)]
pub struct SampleSeriesBuilder {
    frequency: Vec<f64>,
    loss: Vec<f64>,
    phase: Vec<f64>,
}

impl SampleSeriesBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frequency: Vec::with_capacity(capacity),
            loss: Vec::with_capacity(capacity),
            phase: Vec::with_capacity(capacity),
        }
    }

    /// Append a point
    pub fn add_point(mut self, frequency: f64, loss: f64, phase: f64) -> Self {
        self.push(frequency, loss, phase);
        self
    }

    /// Append a sample
    pub fn sample(self, sample: Sample) -> Self {
        self.add_point(sample.frequency, sample.loss, sample.phase)
    }

    /// Append a point in place
    pub fn push(&mut self, frequency: f64, loss: f64, phase: f64) {
        self.frequency.push(frequency);
        self.loss.push(loss);
        self.phase.push(phase);
    }

    /// Validate and freeze the series
    pub fn build(self) -> Result<SampleSeries, ExtractionError> {
        SampleSeries::new(self.frequency, self.loss, self.phase)
    }
}
