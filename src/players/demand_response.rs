//! Cooperative and competitive demand-reduction rules.

use rand::Rng;
use serde::Serialize;

use super::player::{Player, Strategy};
use crate::error::{SimError, ensure_non_negative};

/// Outcome of one player's demand response for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandResponse {
    /// Demand after the response (kWh), never above the input demand.
    pub new_demand: f64,
    /// `(demand - new_demand) * price`, never negative.
    pub cost_savings: f64,
    /// Strategy drawn for the hour.
    pub strategy: Strategy,
    /// Tariff applied to the hour (currency/kWh).
    pub price: f64,
}

/// Sheds `factor` of `max_demand`, with the shed quantity truncated toward zero.
///
/// The whole-unit truncation of the reduction is part of the game rules and
/// can leave a fractional remainder in the result.
pub fn truncated_reduction(max_demand: f64, factor: f64) -> f64 {
    (max_demand - (max_demand * factor).trunc()).max(0.0)
}

impl Player {
    /// Runs the hourly game move for this player.
    ///
    /// Validates the inputs, prices the hour, draws a strategy from `rng` and
    /// applies the matching reduction rule. The player's profile is not
    /// touched; the caller commits `new_demand` with [`Player::commit_demand`].
    ///
    /// # Arguments
    ///
    /// * `demand` - Player's current demand for the hour (kWh)
    /// * `hour` - Hour of the day (0–23)
    /// * `opponent_demand` - Rival's comparable demand for the hour (kWh)
    /// * `renewable_generation` - Solar plus wind for the hour (kWh)
    /// * `battery_soc` - Stored battery energy available (kWh)
    /// * `rng` - Random source for the strategy draw
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidInput`] if any quantity is negative or non-finite.
    /// No random sample is consumed in that case.
    pub fn simulate_demand_response<R: Rng>(
        &self,
        demand: f64,
        hour: usize,
        opponent_demand: f64,
        renewable_generation: f64,
        battery_soc: f64,
        rng: &mut R,
    ) -> Result<DemandResponse, SimError> {
        let demand = ensure_non_negative("demand", demand)?;
        let opponent_demand = ensure_non_negative("opponent_demand", opponent_demand)?;
        let renewable_generation =
            ensure_non_negative("renewable_generation", renewable_generation)?;
        let battery_soc = ensure_non_negative("battery_soc", battery_soc)?;

        let price = self.get_hourly_price(hour);
        let strategy = self.decide_strategy(hour, rng);

        let new_demand = match strategy {
            Strategy::Cooperate => self.calculate_cooperative_demand(
                demand,
                opponent_demand,
                renewable_generation,
                battery_soc,
            ),
            Strategy::Compete => {
                self.calculate_competitive_demand(demand, renewable_generation, battery_soc)
            }
        };

        Ok(DemandResponse {
            new_demand,
            cost_savings: (demand - new_demand) * price,
            strategy,
            price,
        })
    }

    /// Demand when cooperating: capped by own demand, the rival's demand and
    /// the energy on hand, then reduced by the cooperative factor.
    pub fn calculate_cooperative_demand(
        &self,
        demand: f64,
        opponent_demand: f64,
        renewable_generation: f64,
        battery_soc: f64,
    ) -> f64 {
        let max_cooperative = demand
            .min(opponent_demand)
            .min(renewable_generation + battery_soc);
        let reduced = truncated_reduction(
            max_cooperative,
            self.preferences().cooperative_reduction_factor,
        );
        demand.min(reduced)
    }

    /// Demand when competing: capped by own demand and the energy on hand,
    /// then reduced by the competitive factor.
    pub fn calculate_competitive_demand(
        &self,
        demand: f64,
        renewable_generation: f64,
        battery_soc: f64,
    ) -> f64 {
        let max_competitive = demand.min(renewable_generation + battery_soc);
        let reduced = truncated_reduction(
            max_competitive,
            self.preferences().competitive_reduction_factor,
        );
        demand.min(reduced)
    }
}
