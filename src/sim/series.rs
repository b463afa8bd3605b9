//! Per-player and grid time series extracted from a finished day.

use serde::Serialize;

use super::types::HourResult;

/// Hour-by-hour series for one player, ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeries {
    pub player_id: u32,
    /// 1 where the player cooperated, 0 where it competed.
    pub strategy_flags: Vec<u8>,
    pub prices: Vec<f64>,
    /// Demand before the response (kWh).
    pub demand_before_kwh: Vec<f64>,
    /// Demand after the response (kWh).
    pub demand_after_kwh: Vec<f64>,
    pub cost_savings: Vec<f64>,
    /// Running sum of `cost_savings`.
    pub cumulative_cost_savings: Vec<f64>,
}

/// Hour-by-hour series for the shared microgrid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSeries {
    pub solar_kwh: Vec<f64>,
    pub wind_kwh: Vec<f64>,
    /// State of charge at the end of each hour (kWh).
    pub battery_soc_kwh: Vec<f64>,
}

/// Every hourly record of a run plus the player roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayResults {
    player_ids: Vec<u32>,
    hours: Vec<HourResult>,
}

impl DayResults {
    pub fn new(player_ids: Vec<u32>, hours: Vec<HourResult>) -> Self {
        Self { player_ids, hours }
    }

    pub fn hours(&self) -> &[HourResult] {
        &self.hours
    }

    /// Player ids in stepping order.
    pub fn player_ids(&self) -> &[u32] {
        &self.player_ids
    }

    /// Hour-by-hour series for `player_id`, or `None` for an unknown id.
    pub fn player_series(&self, player_id: u32) -> Option<PlayerSeries> {
        if !self.player_ids.contains(&player_id) {
            return None;
        }
        let outcomes: Vec<_> = self
            .hours
            .iter()
            .filter_map(|h| h.player(player_id))
            .collect();

        let cost_savings: Vec<f64> = outcomes.iter().map(|p| p.cost_savings).collect();
        Some(PlayerSeries {
            player_id,
            strategy_flags: outcomes.iter().map(|p| p.strategy.flag()).collect(),
            prices: outcomes.iter().map(|p| p.price).collect(),
            demand_before_kwh: outcomes.iter().map(|p| p.demand_before_kwh).collect(),
            demand_after_kwh: outcomes.iter().map(|p| p.demand_after_kwh).collect(),
            cumulative_cost_savings: running_sum(&cost_savings),
            cost_savings,
        })
    }

    pub fn grid_series(&self) -> GridSeries {
        GridSeries {
            solar_kwh: self.hours.iter().map(|h| h.solar_kwh).collect(),
            wind_kwh: self.hours.iter().map(|h| h.wind_kwh).collect(),
            battery_soc_kwh: self.hours.iter().map(|h| h.battery_soc_kwh).collect(),
        }
    }

    /// Element-wise sum of every player's cumulative savings.
    pub fn grand_total_cumulative_savings(&self) -> Vec<f64> {
        let hourly: Vec<f64> = self.hours.iter().map(|h| h.total_cost_savings).collect();
        running_sum(&hourly)
    }

    /// Savings summed over all players and hours.
    pub fn total_cost_savings(&self) -> f64 {
        self.hours.iter().map(|h| h.total_cost_savings).sum()
    }
}

fn running_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}
