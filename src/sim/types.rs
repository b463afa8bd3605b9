//! Core simulation types: configuration, hourly records and their text form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::players::Strategy;

/// Length of the simulated horizon in hours.
pub const HOURS_PER_DAY: usize = 24;

/// Aggregate demand handed to the microgrid each hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandBasis {
    /// Sum of every player's full-day profile, constant across the day.
    #[default]
    Daily,
    /// Sum of every player's pre-response demand for the current hour.
    Hourly,
}

/// Centralized simulation configuration.
///
/// # Examples
///
/// ```
/// use mg_game_sim::sim::types::{DemandBasis, SimConfig};
///
/// let cfg = SimConfig::new(42);
/// assert_eq!(cfg.demand_basis, DemandBasis::Daily);
/// assert_eq!(cfg.total_hours(), 24);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Master random seed for the strategy draws.
    pub seed: u64,
    /// How the hourly aggregate demand is derived.
    pub demand_basis: DemandBasis,
}

impl SimConfig {
    /// Creates a configuration with the daily demand basis.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            demand_basis: DemandBasis::Daily,
        }
    }

    /// Returns a copy using `demand_basis`.
    pub fn with_demand_basis(mut self, demand_basis: DemandBasis) -> Self {
        self.demand_basis = demand_basis;
        self
    }

    /// Total number of simulated hours.
    pub fn total_hours(&self) -> usize {
        HOURS_PER_DAY
    }
}

/// One player's share of an hourly step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHourResult {
    /// Player identifier.
    pub player_id: u32,
    /// Strategy drawn this hour.
    pub strategy: Strategy,
    /// Tariff applied this hour (currency/kWh).
    pub price: f64,
    /// Demand read from the profile before the response (kWh).
    pub demand_before_kwh: f64,
    /// Demand committed after the response (kWh).
    pub demand_after_kwh: f64,
    /// Monetary value of the reduction.
    pub cost_savings: f64,
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourResult {
    /// Hour index (0–23).
    pub hour: usize,
    /// Solar generation this hour (kWh).
    pub solar_kwh: f64,
    /// Wind generation this hour (kWh).
    pub wind_kwh: f64,
    /// Solar plus wind (kWh).
    pub renewable_kwh: f64,
    /// Aggregate demand supplied by the caller (kWh).
    pub total_demand_kwh: f64,
    /// Per-player opponent demand, `floor(total_demand / players)` (kWh).
    pub opponent_demand_kwh: f64,
    /// Battery state of charge after the pre-charge (kWh).
    pub battery_soc_after_charge_kwh: f64,
    /// Battery state of charge at the end of the hour (kWh).
    pub battery_soc_kwh: f64,
    /// Sum of every player's cost savings.
    pub total_cost_savings: f64,
    /// Per-player outcomes, in player list order.
    pub players: Vec<PlayerHourResult>,
}

impl HourResult {
    /// Outcome for `player_id`, if the player took part.
    pub fn player(&self, player_id: u32) -> Option<&PlayerHourResult> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}

impl fmt::Display for HourResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.hour + 1;
        for p in &self.players {
            writeln!(
                f,
                "Hour {label} - Player {}: Demand (kWh) = {:.2}, Cost Savings ($) = {:.2}, Strategy = {}",
                p.player_id, p.demand_after_kwh, p.cost_savings, p.strategy,
            )?;
        }
        writeln!(
            f,
            "Hour {label} - Renewable Generation: Solar (kWh) = {:.2}, Wind (kWh) = {:.2}",
            self.solar_kwh, self.wind_kwh,
        )?;
        writeln!(
            f,
            "Hour {label} - Battery State of Charge (kWh): {:.2}",
            self.battery_soc_kwh
        )?;
        write!(
            f,
            "Hour {label} - Total Cost Savings ($): {:.2}",
            self.total_cost_savings
        )
    }
}
