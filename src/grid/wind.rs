use rand::Rng;

use super::types::{Generator, ensure_capacity};
use crate::error::SimError;
use crate::sim::types::HOURS_PER_DAY;

/// Wind turbine whose hourly output is drawn once, uniformly over
/// `[0, capacity)`, and then held fixed for the whole day.
#[derive(Debug, Clone)]
pub struct WindTurbine {
    /// Nameplate capacity in kilowatts.
    pub capacity_kw: f64,

    /// Hourly generation (kWh), fixed at construction.
    profile: Vec<f64>,
}

impl WindTurbine {
    /// Creates a turbine and draws its 24-hour profile from `rng`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfiguration`] for a negative or non-finite capacity.
    pub fn new<R: Rng>(capacity_kw: f64, rng: &mut R) -> Result<Self, SimError> {
        let capacity_kw = ensure_capacity("wind_capacity_kw", capacity_kw)?;
        let profile = (0..HOURS_PER_DAY)
            .map(|_| rng.random::<f64>() * capacity_kw)
            .collect();
        Ok(Self {
            capacity_kw,
            profile,
        })
    }

    /// Creates a turbine with an explicit 24-hour profile.
    ///
    /// # Errors
    ///
    /// * [`SimError::DimensionMismatch`] if `profile` does not hold 24 values.
    /// * [`SimError::InvalidConfiguration`] if any value is negative or above
    ///   `capacity_kw`.
    pub fn with_profile(capacity_kw: f64, profile: Vec<f64>) -> Result<Self, SimError> {
        let capacity_kw = ensure_capacity("wind_capacity_kw", capacity_kw)?;
        if profile.len() != HOURS_PER_DAY {
            return Err(SimError::DimensionMismatch {
                field: "wind profile".into(),
                expected: HOURS_PER_DAY,
                actual: profile.len(),
            });
        }
        if let Some(kwh) = profile.iter().find(|kwh| !(0.0..=capacity_kw).contains(*kwh)) {
            return Err(SimError::config(
                "wind profile",
                format!("{kwh} is outside [0, {capacity_kw}]"),
            ));
        }
        Ok(Self {
            capacity_kw,
            profile,
        })
    }

    /// Hourly generation profile (kWh).
    pub fn profile(&self) -> &[f64] {
        &self.profile
    }
}

impl Generator for WindTurbine {
    fn generation_kwh(&self, hour: usize) -> f64 {
        self.profile.get(hour).copied().unwrap_or(0.0)
    }

    fn source_type(&self) -> &'static str {
        "Wind"
    }
}
