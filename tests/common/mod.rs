//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use mg_game_sim::grid::{Battery, Microgrid, SolarPv, WindTurbine};
use mg_game_sim::players::{Player, Preferences, PricingSchedule};
use mg_game_sim::sim::engine::Engine;
use mg_game_sim::sim::types::{HOURS_PER_DAY, SimConfig};

/// Default simulation configuration (seed 42, daily demand basis).
pub fn default_config() -> SimConfig {
    SimConfig::new(42)
}

/// Default tariff (0.1 base, 0.2 peak over hours 16–18).
pub fn default_pricing() -> PricingSchedule {
    PricingSchedule::new(0.1, 0.2, [16, 17, 18]).expect("default tariff is valid")
}

/// Evening-peaked demand profile between 20 and 48 kWh.
pub fn evening_profile() -> Vec<f64> {
    (0..HOURS_PER_DAY)
        .map(|h| if (16..=20).contains(&h) { 48.0 } else { 20.0 + h as f64 })
        .collect()
}

/// Player with default preferences and the evening profile.
pub fn default_player(id: u32) -> Player {
    player_with(id, Preferences::default())
}

pub fn player_with(id: u32, preferences: Preferences) -> Player {
    Player::new(id, default_pricing(), preferences, evening_profile())
        .expect("fixture player is valid")
}

/// Microgrid with 50 kW solar, a flat 12 kWh wind profile and an empty
/// 100 kWh battery at 0.9 efficiency.
pub fn default_microgrid() -> Microgrid {
    Microgrid::new(
        SolarPv::new(50.0).expect("solar"),
        WindTurbine::with_profile(30.0, vec![12.0; HOURS_PER_DAY]).expect("wind"),
        Battery::new(100.0, 0.0, 0.9, 0.9).expect("battery"),
    )
}

/// Two-player engine on the default microgrid.
pub fn default_engine(config: SimConfig) -> Engine {
    Engine::new(
        config,
        vec![default_player(1), default_player(2)],
        default_microgrid(),
    )
    .expect("fixture engine is valid")
}
