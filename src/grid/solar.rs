use std::f64::consts::PI;

use super::types::{Generator, ensure_capacity};
use crate::error::SimError;
use crate::sim::types::HOURS_PER_DAY;

/// Solar array following a fixed diurnal sinusoid.
///
/// Output for hour `h` is `capacity * (0.5 * sin((h - 6) * π / 12) + 0.5)`:
/// zero at midnight, half capacity at 06:00 and 18:00, full capacity at noon.
/// The curve maps into `[0, 1]` so output is never negative.
#[derive(Debug, Clone)]
pub struct SolarPv {
    /// Nameplate capacity in kilowatts.
    pub capacity_kw: f64,
}

impl SolarPv {
    /// Creates a solar array.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfiguration`] for a negative or non-finite capacity.
    pub fn new(capacity_kw: f64) -> Result<Self, SimError> {
        Ok(Self {
            capacity_kw: ensure_capacity("solar_capacity_kw", capacity_kw)?,
        })
    }

    /// Fraction of capacity available at `hour` (0.0–1.0).
    pub fn daylight_frac(hour: usize) -> f64 {
        0.5 * ((hour as f64 - 6.0) * PI / 12.0).sin() + 0.5
    }

    /// Recomputes the full 24-hour generation profile (kWh per hour).
    pub fn profile(&self) -> Vec<f64> {
        (0..HOURS_PER_DAY)
            .map(|h| Self::daylight_frac(h) * self.capacity_kw)
            .collect()
    }
}

impl Generator for SolarPv {
    fn generation_kwh(&self, hour: usize) -> f64 {
        if hour >= HOURS_PER_DAY {
            return 0.0;
        }
        Self::daylight_frac(hour) * self.capacity_kw
    }

    fn source_type(&self) -> &'static str {
        "SolarPV"
    }
}
