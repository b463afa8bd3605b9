//! Error taxonomy shared by the player, grid and engine layers.

use thiserror::Error;

/// Failures surfaced by construction and per-hour simulation calls.
///
/// All variants are local precondition failures: nothing in the core performs
/// I/O, so none of them are retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A capacity, efficiency, price or probability outside its domain.
    #[error("invalid configuration: {field} {message}")]
    InvalidConfiguration {
        /// Parameter name (e.g. `"battery_capacity_kwh"`).
        field: String,
        /// Constraint that was violated.
        message: String,
    },

    /// A negative or non-finite value handed to a per-hour computation.
    #[error("invalid input: {field} = {value}")]
    InvalidInput {
        /// Argument name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A profile whose length does not match the simulated horizon.
    #[error("dimension mismatch: {field} has {actual} entries, expected {expected}")]
    DimensionMismatch {
        /// Profile name.
        field: String,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
}

impl SimError {
    pub(crate) fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejects negative and non-finite per-hour quantities.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidInput { field, value })
    }
}

/// Rejects a value outside the closed unit interval.
pub(crate) fn ensure_unit_interval(field: &str, value: f64) -> Result<f64, SimError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SimError::config(field, format!("must be in [0.0, 1.0], got {value}")))
    }
}
