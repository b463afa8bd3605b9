use super::types::ensure_capacity;
use crate::error::{SimError, ensure_non_negative};

/// Shared battery storage coupling every player to one limited energy pool.
///
/// State of charge is tracked as absolute energy (kWh) and always stays in
/// `[0, capacity_kwh]`. Charging is capped by headroom and by the energy
/// offered, then derated by the charge efficiency. Discharging is capped by
/// stored energy and by the shortfall, and the drawn amount is derated by the
/// discharge efficiency before leaving the store.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Usable capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Stored energy in kilowatt-hours.
    pub soc_kwh: f64,

    /// Charging efficiency (0, 1].
    pub eta_charge: f64,

    /// Discharging efficiency (0, 1].
    pub eta_discharge: f64,
}

impl Battery {
    /// Creates a battery.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Usable capacity (>= 0)
    /// * `soc_kwh` - Initial stored energy, within `[0, capacity_kwh]`
    /// * `eta_charge` - Charging efficiency in (0, 1]
    /// * `eta_discharge` - Discharging efficiency in (0, 1]
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for any value outside its domain.
    pub fn new(
        capacity_kwh: f64,
        soc_kwh: f64,
        eta_charge: f64,
        eta_discharge: f64,
    ) -> Result<Self, SimError> {
        let capacity_kwh = ensure_capacity("battery_capacity_kwh", capacity_kwh)?;
        if !(0.0..=capacity_kwh).contains(&soc_kwh) {
            return Err(SimError::config(
                "initial_soc_kwh",
                format!("must be in [0, {capacity_kwh}], got {soc_kwh}"),
            ));
        }
        for (field, eta) in [
            ("charge_efficiency", eta_charge),
            ("discharge_efficiency", eta_discharge),
        ] {
            if !(eta > 0.0 && eta <= 1.0) {
                return Err(SimError::config(field, format!("must be in (0, 1], got {eta}")));
            }
        }

        Ok(Self {
            capacity_kwh,
            soc_kwh,
            eta_charge,
            eta_discharge,
        })
    }

    /// Remaining room before the battery is full (kWh).
    pub fn headroom_kwh(&self) -> f64 {
        self.capacity_kwh - self.soc_kwh
    }

    /// Charges from `available_kwh` of surplus energy.
    ///
    /// Returns the energy taken from the supply before efficiency losses.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidInput`] if `available_kwh` is negative or non-finite.
    pub fn charge(&mut self, available_kwh: f64) -> Result<f64, SimError> {
        let available_kwh = ensure_non_negative("available_kwh", available_kwh)?;
        let max_charge_kwh = self.headroom_kwh().min(available_kwh);
        self.soc_kwh = self
            .capacity_kwh
            .min(self.soc_kwh + max_charge_kwh * self.eta_charge);
        Ok(max_charge_kwh)
    }

    /// Discharges against a supply shortfall of `shortfall_kwh`.
    ///
    /// Returns the energy requested from the store before efficiency derating.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidInput`] if `shortfall_kwh` is negative or non-finite.
    pub fn discharge(&mut self, shortfall_kwh: f64) -> Result<f64, SimError> {
        let shortfall_kwh = ensure_non_negative("shortfall_kwh", shortfall_kwh)?;
        let max_discharge_kwh = self.soc_kwh.min(shortfall_kwh);
        self.soc_kwh = (self.soc_kwh - max_discharge_kwh * self.eta_discharge).max(0.0);
        Ok(max_discharge_kwh)
    }
}
