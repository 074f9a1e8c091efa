use rootnet_engine::FieldGeometry;
use serde::{Deserialize, Serialize};

/// A raw dataset record: a structure of total `length` built from `n_segments` segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    pub name: String,
    pub length: f64,
    pub n_segments: usize,
}

impl DataRecord {
    /// Length of a single segment (`length / n_segments`).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn segment_length(&self) -> f64 {
        self.length / self.n_segments as f64
    }
}

/// Parameters of one growth run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthParams {
    /// Diagnostic label.
    pub name: String,
    pub beta: f64,
    pub segment_length: f64,
    pub n_segments: usize,
    pub radius: f64,
    #[serde(default = "default_unit_length")]
    pub unit_length: f64,
}

const fn default_unit_length() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamError {
    #[display("beta must lie strictly between 0 and 1, got {value}")]
    Beta { value: f64 },
    #[display("segment length must be positive, got {value}")]
    SegmentLength { value: f64 },
    #[display("at least one segment is required")]
    NoSegments,
    #[display("radius must be positive, got {value}")]
    Radius { value: f64 },
    #[display("unit length must be positive, got {value}")]
    UnitLength { value: f64 },
}

impl GrowthParams {
    /// Creates parameters with the default unit length of 1.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        beta: f64,
        segment_length: f64,
        n_segments: usize,
        radius: f64,
    ) -> Self {
        Self {
            name: name.into(),
            beta,
            segment_length,
            n_segments,
            radius,
            unit_length: default_unit_length(),
        }
    }

    /// Derives run parameters from a dataset record.
    #[must_use]
    pub fn from_record(record: &DataRecord, beta: f64, radius: f64, unit_length: f64) -> Self {
        Self {
            name: record.name.clone(),
            beta,
            segment_length: record.segment_length(),
            n_segments: record.n_segments,
            radius,
            unit_length,
        }
    }

    #[must_use]
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(ParamError::Beta { value: self.beta });
        }
        if self.n_segments == 0 {
            return Err(ParamError::NoSegments);
        }
        if !positive(self.segment_length) {
            return Err(ParamError::SegmentLength {
                value: self.segment_length,
            });
        }
        if !positive(self.radius) {
            return Err(ParamError::Radius { value: self.radius });
        }
        if !positive(self.unit_length) {
            return Err(ParamError::UnitLength {
                value: self.unit_length,
            });
        }
        Ok(())
    }

    /// Field spanning `2 · n_segments · segment_length` on both axes.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn field_geometry(&self) -> FieldGeometry {
        let side = 2.0 * self.n_segments as f64 * self.segment_length;
        FieldGeometry::new(side, side, self.unit_length)
    }
}
