//! Common trait for renewable sources on the microgrid.

/// A renewable source producing energy over the simulated day.
///
/// Implementors hold a fixed hourly profile; reading it has no side effects.
pub trait Generator {
    /// Energy produced during `hour` (kWh, >= 0).
    ///
    /// Hours outside the day produce nothing.
    fn generation_kwh(&self, hour: usize) -> f64;

    /// Returns a human-readable type name for the source.
    fn source_type(&self) -> &'static str;
}

/// Rejects a negative or non-finite nameplate capacity.
pub(crate) fn ensure_capacity(field: &str, capacity: f64) -> Result<f64, crate::error::SimError> {
    if capacity.is_finite() && capacity >= 0.0 {
        Ok(capacity)
    } else {
        Err(crate::error::SimError::config(
            field,
            format!("must be >= 0, got {capacity}"),
        ))
    }
}
