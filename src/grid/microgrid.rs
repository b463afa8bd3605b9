//! Shared microgrid: renewable supply, battery accounting and the hourly step.

use rand::Rng;

use super::battery::Battery;
use super::solar::SolarPv;
use super::types::Generator;
use super::wind::WindTurbine;
use crate::error::{SimError, ensure_non_negative};
use crate::players::Player;
use crate::sim::types::{HOURS_PER_DAY, HourResult, PlayerHourResult};

/// Microgrid owning the renewable sources and the battery.
///
/// `solar_generation` is recomputed from the diurnal curve at the start of
/// every hour; wind output is fixed when the turbine is built. The battery is
/// the only state that carries from one hour to the next.
#[derive(Debug, Clone)]
pub struct Microgrid {
    solar: SolarPv,
    wind: WindTurbine,
    battery: Battery,
    solar_generation: Vec<f64>,
}

impl Microgrid {
    /// Assembles a microgrid from its sources and storage.
    pub fn new(solar: SolarPv, wind: WindTurbine, battery: Battery) -> Self {
        Self {
            solar,
            wind,
            battery,
            solar_generation: vec![0.0; HOURS_PER_DAY],
        }
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Current battery state of charge (kWh).
    pub fn battery_soc(&self) -> f64 {
        self.battery.soc_kwh
    }

    /// Last computed solar profile (kWh per hour).
    pub fn solar_generation(&self) -> &[f64] {
        &self.solar_generation
    }

    /// Wind profile drawn at construction (kWh per hour).
    pub fn wind_generation(&self) -> &[f64] {
        self.wind.profile()
    }

    /// Type names of the attached sources.
    pub fn source_types(&self) -> [&'static str; 2] {
        [self.solar.source_type(), self.wind.source_type()]
    }

    /// Recomputes the full 24-hour solar profile.
    pub fn generate_energy(&mut self) {
        self.solar_generation = self.solar.profile();
    }

    /// Advances the microgrid by one hour.
    ///
    /// 1. Recompute solar and read `renewable = solar + wind` for `hour`.
    /// 2. Pre-charge the battery from the renewable supply.
    /// 3. Run every player's demand response in list order against
    ///    `floor(total_demand / players)` and commit each new demand.
    /// 4. If `total_demand` exceeds the renewable supply, discharge the
    ///    battery against the shortfall.
    ///
    /// `total_demand` is used exactly as supplied; it is not re-summed from the
    /// updated player demands.
    ///
    /// # Errors
    ///
    /// * [`SimError::InvalidInput`] for an hour outside the day or a negative
    ///   `total_demand`.
    /// * [`SimError::InvalidConfiguration`] when `players` is empty.
    pub fn simulate_one_hour<R: Rng>(
        &mut self,
        total_demand: f64,
        players: &mut [Player],
        hour: usize,
        rng: &mut R,
    ) -> Result<HourResult, SimError> {
        if hour >= HOURS_PER_DAY {
            return Err(SimError::InvalidInput {
                field: "hour",
                value: hour as f64,
            });
        }
        let total_demand = ensure_non_negative("total_demand", total_demand)?;
        if players.is_empty() {
            return Err(SimError::config("players", "at least one player is required"));
        }

        self.generate_energy();
        let solar_kwh = self.solar_generation[hour];
        let wind_kwh = self.wind.generation_kwh(hour);
        let renewable_kwh = solar_kwh + wind_kwh;

        self.battery.charge(renewable_kwh)?;
        let battery_soc_after_charge_kwh = self.battery.soc_kwh;

        let opponent_demand_kwh = (total_demand / players.len() as f64).floor();
        let mut total_cost_savings = 0.0;
        let mut outcomes = Vec::with_capacity(players.len());

        for player in players.iter_mut() {
            let demand_before_kwh = player.demand_at(hour).ok_or(SimError::InvalidInput {
                field: "hour",
                value: hour as f64,
            })?;
            let response = player.simulate_demand_response(
                demand_before_kwh,
                hour,
                opponent_demand_kwh,
                renewable_kwh,
                battery_soc_after_charge_kwh,
                rng,
            )?;
            total_cost_savings += response.cost_savings;
            player.commit_demand(hour, response.new_demand)?;

            log::trace!(
                "hour {hour}: player {} {} {demand_before_kwh:.3} -> {:.3} kWh",
                player.id(),
                response.strategy,
                response.new_demand
            );

            outcomes.push(PlayerHourResult {
                player_id: player.id(),
                strategy: response.strategy,
                price: response.price,
                demand_before_kwh,
                demand_after_kwh: response.new_demand,
                cost_savings: response.cost_savings,
            });
        }

        if total_demand > renewable_kwh {
            self.battery.discharge(total_demand - renewable_kwh)?;
        }

        Ok(HourResult {
            hour,
            solar_kwh,
            wind_kwh,
            renewable_kwh,
            total_demand_kwh: total_demand,
            opponent_demand_kwh,
            battery_soc_after_charge_kwh,
            battery_soc_kwh: self.battery.soc_kwh,
            total_cost_savings,
            players: outcomes,
        })
    }
}
