//! Post-hoc day summary computed from the hourly records.

use std::fmt;

use serde::Serialize;

use super::series::DayResults;
use crate::players::Strategy;

/// Totals for one player over the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player_id: u32,
    /// Hours in which the player cooperated.
    pub cooperation_hours: usize,
    /// Demand before the response, summed over the day (kWh).
    pub demand_before_kwh: f64,
    /// Demand after the response, summed over the day (kWh).
    pub demand_after_kwh: f64,
    pub total_cost_savings: f64,
}

/// Aggregate indicators derived from a complete day.
///
/// Computed from [`DayResults`] so reported totals always agree with the
/// hourly records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    /// Hours covered by the records.
    pub hours: usize,
    pub players: Vec<PlayerSummary>,
    /// Total solar generation (kWh).
    pub solar_kwh: f64,
    /// Total wind generation (kWh).
    pub wind_kwh: f64,
    /// Highest end-of-hour state of charge (kWh).
    pub peak_soc_kwh: f64,
    /// Lowest end-of-hour state of charge (kWh).
    pub min_soc_kwh: f64,
    /// State of charge after the last hour (kWh).
    pub final_soc_kwh: f64,
    /// Savings over all players and hours.
    pub grand_total_cost_savings: f64,
}

impl DaySummary {
    /// Computes all indicators from the day's records.
    ///
    /// An empty run yields zeros.
    pub fn from_results(results: &DayResults) -> Self {
        let hours = results.hours();

        let players = results
            .player_ids()
            .iter()
            .map(|&player_id| {
                let mut summary = PlayerSummary {
                    player_id,
                    cooperation_hours: 0,
                    demand_before_kwh: 0.0,
                    demand_after_kwh: 0.0,
                    total_cost_savings: 0.0,
                };
                for outcome in hours.iter().filter_map(|h| h.player(player_id)) {
                    if outcome.strategy == Strategy::Cooperate {
                        summary.cooperation_hours += 1;
                    }
                    summary.demand_before_kwh += outcome.demand_before_kwh;
                    summary.demand_after_kwh += outcome.demand_after_kwh;
                    summary.total_cost_savings += outcome.cost_savings;
                }
                summary
            })
            .collect();

        let (peak_soc_kwh, min_soc_kwh) = if hours.is_empty() {
            (0.0, 0.0)
        } else {
            hours
                .iter()
                .map(|h| h.battery_soc_kwh)
                .fold((f64::MIN, f64::MAX), |(hi, lo), soc| (hi.max(soc), lo.min(soc)))
        };

        Self {
            hours: hours.len(),
            players,
            solar_kwh: hours.iter().map(|h| h.solar_kwh).sum(),
            wind_kwh: hours.iter().map(|h| h.wind_kwh).sum(),
            peak_soc_kwh,
            min_soc_kwh,
            final_soc_kwh: hours.last().map_or(0.0, |h| h.battery_soc_kwh),
            grand_total_cost_savings: results.total_cost_savings(),
        }
    }
}

impl fmt::Display for DaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Day Summary ---")?;
        for p in &self.players {
            writeln!(
                f,
                "Player {}: savings {:.2} ($), cooperated {}/{} h, demand {:.2} -> {:.2} kWh",
                p.player_id,
                p.total_cost_savings,
                p.cooperation_hours,
                self.hours,
                p.demand_before_kwh,
                p.demand_after_kwh
            )?;
        }
        writeln!(f, "Solar generation:      {:.2} kWh", self.solar_kwh)?;
        writeln!(f, "Wind generation:       {:.2} kWh", self.wind_kwh)?;
        writeln!(
            f,
            "Battery SoC:           min {:.2} / peak {:.2} / final {:.2} kWh",
            self.min_soc_kwh, self.peak_soc_kwh, self.final_soc_kwh
        )?;
        write!(
            f,
            "Grand total savings:   {:.2} ($)",
            self.grand_total_cost_savings
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::{HourResult, PlayerHourResult};

    fn make_hour(hour: usize, soc: f64, strategy: Strategy, savings: f64) -> HourResult {
        HourResult {
            hour,
            solar_kwh: 10.0,
            wind_kwh: 5.0,
            renewable_kwh: 15.0,
            total_demand_kwh: 40.0,
            opponent_demand_kwh: 40.0,
            battery_soc_after_charge_kwh: soc,
            battery_soc_kwh: soc,
            total_cost_savings: savings,
            players: vec![PlayerHourResult {
                player_id: 4,
                strategy,
                price: 0.1,
                demand_before_kwh: 40.0,
                demand_after_kwh: 40.0 - savings / 0.1,
                cost_savings: savings,
            }],
        }
    }

    #[test]
    fn totals_and_soc_extremes() {
        let results = DayResults::new(
            vec![4],
            vec![
                make_hour(0, 3.0, Strategy::Cooperate, 0.5),
                make_hour(1, 9.0, Strategy::Compete, 0.25),
                make_hour(2, 1.0, Strategy::Cooperate, 0.0),
            ],
        );
        let summary = DaySummary::from_results(&results);

        assert_eq!(summary.hours, 3);
        assert_eq!(summary.solar_kwh, 30.0);
        assert_eq!(summary.wind_kwh, 15.0);
        assert_eq!(summary.peak_soc_kwh, 9.0);
        assert_eq!(summary.min_soc_kwh, 1.0);
        assert_eq!(summary.final_soc_kwh, 1.0);
        assert_eq!(summary.grand_total_cost_savings, 0.75);

        let p = &summary.players[0];
        assert_eq!(p.cooperation_hours, 2);
        assert_eq!(p.demand_before_kwh, 120.0);
        assert!((p.demand_after_kwh - 112.5).abs() < 1e-9);
    }

    #[test]
    fn empty_results() {
        let summary = DaySummary::from_results(&DayResults::default());
        assert_eq!(summary.hours, 0);
        assert_eq!(summary.final_soc_kwh, 0.0);
        assert_eq!(summary.peak_soc_kwh, 0.0);
        assert!(summary.players.is_empty());
    }

    #[test]
    fn partial_day_reports_hours_run() {
        let results = DayResults::new(
            vec![4],
            vec![
                make_hour(0, 3.0, Strategy::Cooperate, 0.5),
                make_hour(1, 4.0, Strategy::Compete, 0.5),
            ],
        );
        let text = DaySummary::from_results(&results).to_string();
        assert!(text.contains("cooperated 1/2 h"), "{text}");
    }

    #[test]
    fn display_does_not_panic() {
        let results = DayResults::new(vec![4], vec![make_hour(0, 3.0, Strategy::Compete, 0.5)]);
        let text = DaySummary::from_results(&results).to_string();
        assert!(text.contains("Grand total savings"));
    }
}
