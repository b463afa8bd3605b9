//! Simulation engine that orchestrates players, the microgrid and the hour clock.

use std::collections::BTreeSet;

use rand::{SeedableRng, rngs::StdRng};

use super::clock::Clock;
use super::series::DayResults;
use super::types::{DemandBasis, HourResult, SimConfig};
use crate::error::SimError;
use crate::grid::Microgrid;
use crate::players::Player;

/// Simulation engine owning the players, the microgrid and the strategy RNG.
///
/// The engine holds no per-entity state of its own: demand lives in the
/// players, energy in the microgrid. It only decides which aggregate demand to
/// hand over each hour and keeps hours in order.
pub struct Engine {
    config: SimConfig,
    players: Vec<Player>,
    microgrid: Microgrid,
    rng: StdRng,
    clock: Clock,
    daily_demand_kwh: f64,
    hours: Vec<HourResult>,
}

impl Engine {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Seed and demand basis
    /// * `players` - Game participants, stepped in list order
    /// * `microgrid` - Shared sources and battery
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfiguration`] for an empty player list or a
    /// duplicated player id.
    pub fn new(
        config: SimConfig,
        players: Vec<Player>,
        microgrid: Microgrid,
    ) -> Result<Self, SimError> {
        if players.is_empty() {
            return Err(SimError::config("players", "at least one player is required"));
        }
        let mut ids = BTreeSet::new();
        if let Some(dup) = players.iter().map(Player::id).find(|id| !ids.insert(*id)) {
            return Err(SimError::config("players", format!("duplicate player id {dup}")));
        }

        let daily_demand_kwh = players
            .iter()
            .flat_map(|p| p.initial_demand().iter())
            .sum();

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            clock: Clock::new(config.total_hours()),
            hours: Vec::with_capacity(config.total_hours()),
            config,
            players,
            microgrid,
            daily_demand_kwh,
        })
    }

    /// Aggregate demand handed to the microgrid for `hour` (kWh).
    pub fn total_demand_for(&self, hour: usize) -> f64 {
        match self.config.demand_basis {
            DemandBasis::Daily => self.daily_demand_kwh,
            DemandBasis::Hourly => self
                .players
                .iter()
                .filter_map(|p| p.initial_demand().get(hour))
                .sum(),
        }
    }

    /// Executes the next hour and returns its record.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidInput`] once the day is over, or any error raised by
    /// the microgrid step.
    pub fn step(&mut self) -> Result<HourResult, SimError> {
        let hour = self.clock.tick().ok_or(SimError::InvalidInput {
            field: "hour",
            value: self.clock.next_hour() as f64,
        })?;
        self.step_hour(hour)
    }

    fn step_hour(&mut self, hour: usize) -> Result<HourResult, SimError> {
        let total_demand = self.total_demand_for(hour);
        let result =
            self.microgrid
                .simulate_one_hour(total_demand, &mut self.players, hour, &mut self.rng)?;

        log::debug!(
            "hour {hour}: renewable={:.2} kWh soc={:.2} kWh savings={:.4}",
            result.renewable_kwh,
            result.battery_soc_kwh,
            result.total_cost_savings
        );
        self.hours.push(result.clone());
        Ok(result)
    }

    /// Executes every remaining hour and returns the day's records.
    ///
    /// # Errors
    ///
    /// Propagates the first failing hour.
    pub fn run(&mut self) -> Result<DayResults, SimError> {
        log::info!(
            "simulating {} hours for {} players on {} with a {:.1} kWh battery (seed {}, {:?} demand basis)",
            self.config.total_hours(),
            self.players.len(),
            self.microgrid.source_types().join(" + "),
            self.microgrid.battery().capacity_kwh,
            self.config.seed,
            self.config.demand_basis
        );

        let mut clock = std::mem::take(&mut self.clock);
        let outcome = clock.try_run(|hour| self.step_hour(hour).map(|_| ()));
        self.clock = clock;
        outcome?;

        let results = self.results();
        log::info!(
            "day complete: total savings {:.4}, final soc {:.2} kWh",
            results.total_cost_savings(),
            self.microgrid.battery_soc()
        );
        Ok(results)
    }

    /// Records of every hour simulated so far.
    pub fn results(&self) -> DayResults {
        DayResults::new(
            self.players.iter().map(Player::id).collect(),
            self.hours.clone(),
        )
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn microgrid(&self) -> &Microgrid {
        &self.microgrid
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Battery, SolarPv, WindTurbine};
    use crate::players::{Preferences, PricingSchedule};
    use crate::sim::types::HOURS_PER_DAY;

    fn grid() -> Microgrid {
        Microgrid::new(
            SolarPv::new(50.0).expect("solar"),
            WindTurbine::with_profile(30.0, vec![10.0; HOURS_PER_DAY]).expect("wind"),
            Battery::new(100.0, 0.0, 0.9, 0.9).expect("battery"),
        )
    }

    fn player(id: u32, demand: Vec<f64>) -> Player {
        Player::new(
            id,
            PricingSchedule::new(0.1, 0.2, [16, 17, 18]).expect("tariff"),
            Preferences::default(),
            demand,
        )
        .expect("player")
    }

    fn ramp() -> Vec<f64> {
        (0..HOURS_PER_DAY).map(|h| 20.0 + h as f64).collect()
    }

    #[test]
    fn duplicate_ids_rejected() {
        let players = vec![player(1, ramp()), player(1, ramp())];
        assert!(Engine::new(SimConfig::new(1), players, grid()).is_err());
    }

    #[test]
    fn empty_players_rejected() {
        assert!(Engine::new(SimConfig::new(1), Vec::new(), grid()).is_err());
    }

    #[test]
    fn daily_basis_is_constant() {
        let engine = Engine::new(
            SimConfig::new(1),
            vec![player(1, ramp()), player(2, vec![10.0; HOURS_PER_DAY])],
            grid(),
        )
        .expect("engine");
        let expected: f64 = ramp().iter().sum::<f64>() + 240.0;
        assert_eq!(engine.total_demand_for(0), expected);
        assert_eq!(engine.total_demand_for(23), expected);
    }

    #[test]
    fn hourly_basis_follows_profiles() {
        let engine = Engine::new(
            SimConfig::new(1).with_demand_basis(DemandBasis::Hourly),
            vec![player(1, ramp()), player(2, vec![10.0; HOURS_PER_DAY])],
            grid(),
        )
        .expect("engine");
        assert_eq!(engine.total_demand_for(0), 30.0);
        assert_eq!(engine.total_demand_for(5), 35.0);
    }

    #[test]
    fn run_covers_day_then_stops() {
        let mut engine =
            Engine::new(SimConfig::new(5), vec![player(1, ramp()), player(2, ramp())], grid())
                .expect("engine");
        let results = engine.run().expect("run");
        assert_eq!(results.hours().len(), HOURS_PER_DAY);
        assert!(engine.is_finished());
        assert!(matches!(
            engine.step(),
            Err(SimError::InvalidInput { field: "hour", .. })
        ));
    }

    #[test]
    fn step_by_step_matches_run() {
        let mut stepped =
            Engine::new(SimConfig::new(9), vec![player(1, ramp()), player(2, ramp())], grid())
                .expect("engine");
        let mut ran =
            Engine::new(SimConfig::new(9), vec![player(1, ramp()), player(2, ramp())], grid())
                .expect("engine");

        let mut hours = Vec::new();
        while !stepped.is_finished() {
            hours.push(stepped.step().expect("step"));
        }
        assert_eq!(hours, ran.run().expect("run").hours());
    }

    #[test]
    fn committed_demand_matches_records() {
        let mut engine =
            Engine::new(SimConfig::new(3), vec![player(1, ramp()), player(2, ramp())], grid())
                .expect("engine");
        let results = engine.run().expect("run");
        for hour in results.hours() {
            for (p, outcome) in engine.players().iter().zip(&hour.players) {
                assert_eq!(p.original_demand()[hour.hour], outcome.demand_after_kwh);
                assert_eq!(p.initial_demand()[hour.hour], outcome.demand_before_kwh);
            }
        }
    }
}
