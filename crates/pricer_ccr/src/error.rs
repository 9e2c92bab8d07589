//! Error types for path construction and ensemble aggregation.

use crate::config::ConfigError;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building exposure paths or aggregating an ensemble.
///
/// Every variant reflects bad input data. Nothing in this crate retries or
/// repairs inputs: mismatched grids are never truncated or padded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CcrError {
    /// A numeric input was NaN or infinite.
    #[error("Non-finite value for {field}: {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A probability or recovery rate fell outside [0, 1].
    #[error("{field} must be in range [0, 1], got {value}")]
    OutOfUnitRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A hazard rate was negative.
    #[error("Hazard rate must be non-negative, got {0}")]
    NegativeHazardRate(f64),

    /// An array-valued input was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Anchor dates were not strictly increasing.
    #[error("Anchor dates must be strictly increasing: {previous} is followed by {next} at vertex {index}")]
    NonIncreasingDates {
        /// Vertex index of the offending date.
        index: usize,
        /// Date at `index - 1`.
        previous: NaiveDate,
        /// Date at `index`.
        next: NaiveDate,
    },

    /// A survival probability increased along a numeraire path.
    #[error("{entity} survival probability increases at vertex {index}: {previous} -> {next}")]
    IncreasingSurvival {
        /// `"bank"` or `"counterparty"`.
        entity: &'static str,
        /// Vertex index of the offending point.
        index: usize,
        /// Survival probability at `index - 1`.
        previous: f64,
        /// Survival probability at `index`.
        next: f64,
    },

    /// Two paths that must share a grid have different vertex counts.
    #[error("Vertex count mismatch: expected {expected} vertices, got {actual}")]
    VertexCountMismatch {
        /// Vertex count of the reference grid.
        expected: usize,
        /// Vertex count of the offending path.
        actual: usize,
    },

    /// Two paths that must share a grid disagree on a date.
    #[error("Date grid mismatch at vertex {index}: expected {expected}, got {actual}")]
    DateMismatch {
        /// Vertex index of the first disagreement.
        index: usize,
        /// Date on the reference grid.
        expected: NaiveDate,
        /// Date on the offending path.
        actual: NaiveDate,
    },

    /// A scenario path failed validation during aggregation.
    #[error("Scenario path {index} is invalid: {reason}")]
    InvalidScenarioPath {
        /// Index of the path within the ensemble.
        index: usize,
        /// Why the path was rejected.
        reason: String,
    },

    /// The aggregation configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl CcrError {
    /// Returns `value` if it is finite, otherwise a [`CcrError::NonFinite`].
    #[inline]
    pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, CcrError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CcrError::NonFinite { field, value })
        }
    }

    /// Returns `value` if it is finite and in [0, 1].
    #[inline]
    pub fn ensure_unit_interval(field: &'static str, value: f64) -> Result<f64, CcrError> {
        let value = Self::ensure_finite(field, value)?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(CcrError::OutOfUnitRange { field, value })
        }
    }
}
