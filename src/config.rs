//! TOML-based scenario configuration and preset definitions.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SimError;
use crate::grid::{Battery, Microgrid, SolarPv, WindTurbine};
use crate::players::{Player, Preferences, PricingSchedule};
use crate::sim::engine::Engine;
use crate::sim::types::{DemandBasis, HOURS_PER_DAY, SimConfig};

/// Seed offset for the wind profile draw.
const WIND_SEED_OFFSET: u64 = 1;
/// Seed offset for random demand profiles; the player id is added on top.
const PROFILE_SEED_OFFSET: u64 = 100;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Seed and demand basis.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Shared sources and storage.
    #[serde(default)]
    pub microgrid: MicrogridConfig,
    /// Game participants, stepped in list order.
    #[serde(default = "default_players")]
    pub players: Vec<PlayerConfig>,
}

/// Global run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// `"daily"` or `"hourly"`.
    pub demand_basis: DemandBasis,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            demand_basis: DemandBasis::Daily,
        }
    }
}

/// Microgrid capacities, efficiencies and initial battery state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MicrogridConfig {
    /// Solar array capacity (kW).
    pub solar_capacity_kw: f64,
    /// Wind turbine capacity (kW).
    pub wind_capacity_kw: f64,
    /// Battery capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Charge efficiency (0.0–1.0].
    pub charge_efficiency: f64,
    /// Discharge efficiency (0.0–1.0].
    pub discharge_efficiency: f64,
    /// Stored energy at hour 0 (kWh).
    pub initial_soc_kwh: f64,
    /// Fixed wind output per hour; drawn from the seed when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_profile_kwh: Option<Vec<f64>>,
}

impl Default for MicrogridConfig {
    fn default() -> Self {
        Self {
            solar_capacity_kw: 50.0,
            wind_capacity_kw: 30.0,
            battery_capacity_kwh: 100.0,
            charge_efficiency: 0.9,
            discharge_efficiency: 0.9,
            initial_soc_kwh: 0.0,
            wind_profile_kwh: None,
        }
    }
}

/// One player's tariff, preferences and demand profile source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub id: u32,
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    #[serde(default = "default_peak_price")]
    pub peak_price: f64,
    #[serde(default = "default_peak_hours")]
    pub peak_hours: Vec<usize>,
    #[serde(default)]
    pub preferences: Preferences,
    /// Explicit 24-hour profile (kWh). Overrides the random bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand_kwh: Option<Vec<f64>>,
    /// Lower bound of the seeded uniform profile (kWh).
    #[serde(default = "default_demand_min")]
    pub demand_min_kwh: f64,
    /// Upper bound of the seeded uniform profile (kWh).
    #[serde(default = "default_demand_max")]
    pub demand_max_kwh: f64,
}

impl PlayerConfig {
    /// A player with default tariff, preferences and a random profile.
    pub fn with_id(id: u32) -> Self {
        Self {
            id,
            base_price: default_base_price(),
            peak_price: default_peak_price(),
            peak_hours: default_peak_hours(),
            preferences: Preferences::default(),
            demand_kwh: None,
            demand_min_kwh: default_demand_min(),
            demand_max_kwh: default_demand_max(),
        }
    }

    /// Resolves the demand profile, drawing it from `seed` when no explicit
    /// profile is configured.
    fn demand_profile(&self, seed: u64) -> Vec<f64> {
        match &self.demand_kwh {
            Some(profile) => profile.clone(),
            None => {
                let mut rng = StdRng::seed_from_u64(
                    seed.wrapping_add(PROFILE_SEED_OFFSET)
                        .wrapping_add(u64::from(self.id)),
                );
                let span = self.demand_max_kwh - self.demand_min_kwh;
                (0..HOURS_PER_DAY)
                    .map(|_| self.demand_min_kwh + rng.random::<f64>() * span)
                    .collect()
            }
        }
    }
}

fn default_base_price() -> f64 {
    0.1
}

fn default_peak_price() -> f64 {
    0.2
}

fn default_peak_hours() -> Vec<usize> {
    vec![16, 17, 18]
}

fn default_demand_min() -> f64 {
    20.0
}

fn default_demand_max() -> f64 {
    50.0
}

/// The two example players: a keener cooperator and a harder competitor.
fn default_players() -> Vec<PlayerConfig> {
    vec![
        PlayerConfig {
            preferences: Preferences {
                cooperation_probability: 0.6,
                cooperative_reduction_factor: 0.3,
                competitive_reduction_factor: 0.2,
            },
            ..PlayerConfig::with_id(1)
        },
        PlayerConfig {
            preferences: Preferences {
                cooperation_probability: 0.5,
                cooperative_reduction_factor: 0.2,
                competitive_reduction_factor: 0.3,
            },
            ..PlayerConfig::with_id(2)
        },
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"microgrid.charge_efficiency"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// The two example players on the default microgrid.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            microgrid: MicrogridConfig::default(),
            players: default_players(),
        }
    }

    /// Both players cooperate most hours.
    pub fn cooperative() -> Self {
        let players = [1, 2]
            .into_iter()
            .map(|id| PlayerConfig {
                preferences: Preferences {
                    cooperation_probability: 0.9,
                    ..Preferences::default()
                },
                ..PlayerConfig::with_id(id)
            })
            .collect();
        Self {
            players,
            ..Self::baseline()
        }
    }

    /// Both players compete most hours, backed by a larger battery.
    pub fn competitive() -> Self {
        let players = [1, 2]
            .into_iter()
            .map(|id| PlayerConfig {
                preferences: Preferences {
                    cooperation_probability: 0.1,
                    competitive_reduction_factor: 0.1,
                    ..Preferences::default()
                },
                ..PlayerConfig::with_id(id)
            })
            .collect();
        Self {
            microgrid: MicrogridConfig {
                battery_capacity_kwh: 200.0,
                ..MicrogridConfig::default()
            },
            players,
            ..Self::baseline()
        }
    }

    /// Baseline with the aggregate demand taken hour by hour.
    pub fn hourly() -> Self {
        Self {
            simulation: SimulationConfig {
                demand_basis: DemandBasis::Hourly,
                ..SimulationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "cooperative", "competitive", "hourly"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "cooperative" => Ok(Self::cooperative()),
            "competitive" => Ok(Self::competitive()),
            "hourly" => Ok(Self::hourly()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let mg = &self.microgrid;
        for (field, value) in [
            ("microgrid.solar_capacity_kw", mg.solar_capacity_kw),
            ("microgrid.wind_capacity_kw", mg.wind_capacity_kw),
            ("microgrid.battery_capacity_kwh", mg.battery_capacity_kwh),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }
        for (field, value) in [
            ("microgrid.charge_efficiency", mg.charge_efficiency),
            ("microgrid.discharge_efficiency", mg.discharge_efficiency),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(ConfigError::new(field, "must be in (0.0, 1.0]"));
            }
        }
        if !(0.0..=mg.battery_capacity_kwh).contains(&mg.initial_soc_kwh) {
            errors.push(ConfigError::new(
                "microgrid.initial_soc_kwh",
                "must be in [0, microgrid.battery_capacity_kwh]",
            ));
        }
        if let Some(profile) = &mg.wind_profile_kwh {
            check_profile(
                &mut errors,
                "microgrid.wind_profile_kwh",
                profile,
                Some(mg.wind_capacity_kw),
            );
        }

        if self.players.is_empty() {
            errors.push(ConfigError::new("players", "at least one player is required"));
        }
        let mut seen = BTreeSet::new();
        for (i, p) in self.players.iter().enumerate() {
            let path = format!("players[{i}]");
            if !seen.insert(p.id) {
                errors.push(ConfigError::new(
                    format!("{path}.id"),
                    format!("duplicate player id {}", p.id),
                ));
            }
            for (name, price) in [("base_price", p.base_price), ("peak_price", p.peak_price)] {
                if !(price.is_finite() && price >= 0.0) {
                    errors.push(ConfigError::new(format!("{path}.{name}"), "must be >= 0"));
                }
            }
            if p.peak_hours.iter().any(|&h| h >= HOURS_PER_DAY) {
                errors.push(ConfigError::new(
                    format!("{path}.peak_hours"),
                    "hours must be in 0..=23",
                ));
            }
            let prefs = &p.preferences;
            for (name, value) in [
                ("cooperation_probability", prefs.cooperation_probability),
                (
                    "cooperative_reduction_factor",
                    prefs.cooperative_reduction_factor,
                ),
                (
                    "competitive_reduction_factor",
                    prefs.competitive_reduction_factor,
                ),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    errors.push(ConfigError::new(
                        format!("{path}.preferences.{name}"),
                        "must be in [0.0, 1.0]",
                    ));
                }
            }
            match &p.demand_kwh {
                Some(profile) => {
                    check_profile(&mut errors, &format!("{path}.demand_kwh"), profile, None);
                }
                None => {
                    if !(p.demand_min_kwh.is_finite() && p.demand_min_kwh >= 0.0) {
                        errors.push(ConfigError::new(
                            format!("{path}.demand_min_kwh"),
                            "must be >= 0",
                        ));
                    }
                    if !(p.demand_max_kwh >= p.demand_min_kwh && p.demand_max_kwh.is_finite()) {
                        errors.push(ConfigError::new(
                            format!("{path}.demand_max_kwh"),
                            format!("must be >= {path}.demand_min_kwh"),
                        ));
                    }
                }
            }
        }

        errors
    }

    /// Engine configuration for this scenario.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig::new(self.simulation.seed).with_demand_basis(self.simulation.demand_basis)
    }

    /// Builds the microgrid, the players and the engine.
    ///
    /// The strategy draws, the wind profile and every random demand profile
    /// use independent RNG streams derived from `simulation.seed`.
    ///
    /// # Errors
    ///
    /// Propagates the first constructor failure; run [`validate`](Self::validate)
    /// first for a complete list.
    pub fn build(&self) -> Result<Engine, SimError> {
        let seed = self.simulation.seed;
        let mg = &self.microgrid;

        let wind = match &mg.wind_profile_kwh {
            Some(profile) => WindTurbine::with_profile(mg.wind_capacity_kw, profile.clone())?,
            None => {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(WIND_SEED_OFFSET));
                WindTurbine::new(mg.wind_capacity_kw, &mut rng)?
            }
        };
        let microgrid = Microgrid::new(
            SolarPv::new(mg.solar_capacity_kw)?,
            wind,
            Battery::new(
                mg.battery_capacity_kwh,
                mg.initial_soc_kwh,
                mg.charge_efficiency,
                mg.discharge_efficiency,
            )?,
        );

        let players = self
            .players
            .iter()
            .map(|p| {
                let pricing =
                    PricingSchedule::new(p.base_price, p.peak_price, p.peak_hours.iter().copied())?;
                Player::new(p.id, pricing, p.preferences, p.demand_profile(seed))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Engine::new(self.sim_config(), players, microgrid)
    }
}

fn check_profile(
    errors: &mut Vec<ConfigError>,
    field: &str,
    profile: &[f64],
    upper: Option<f64>,
) {
    if profile.len() != HOURS_PER_DAY {
        errors.push(ConfigError::new(
            field,
            format!("must hold {HOURS_PER_DAY} values, got {}", profile.len()),
        ));
    }
    let upper = upper.unwrap_or(f64::INFINITY);
    if profile.iter().any(|v| !(v.is_finite() && (0.0..=upper).contains(v))) {
        errors.push(ConfigError::new(field, format!("values must be in [0, {upper}]")));
    }
}
