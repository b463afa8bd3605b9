use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, ensure_unit_interval};
use crate::sim::types::HOURS_PER_DAY;

/// Per-hour game move chosen by a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Reduce demand jointly with the rival.
    Cooperate,
    /// Reduce demand against available supply only.
    Compete,
}

impl Strategy {
    /// Binary chart flag: 1 for cooperate, 0 for compete.
    pub fn flag(self) -> u8 {
        match self {
            Strategy::Cooperate => 1,
            Strategy::Compete => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Cooperate => "cooperate",
            Strategy::Compete => "compete",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavioural preferences driving the strategy draw and demand reductions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Preferences {
    /// Probability of choosing [`Strategy::Cooperate`] in any hour (0.0–1.0).
    pub cooperation_probability: f64,
    /// Share of demand shed when cooperating (0.0–1.0).
    pub cooperative_reduction_factor: f64,
    /// Share of demand shed when competing (0.0–1.0).
    pub competitive_reduction_factor: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            cooperation_probability: 0.5,
            cooperative_reduction_factor: 0.3,
            competitive_reduction_factor: 0.2,
        }
    }
}

impl Preferences {
    /// Checks every field lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_unit_interval("cooperation_probability", self.cooperation_probability)?;
        ensure_unit_interval(
            "cooperative_reduction_factor",
            self.cooperative_reduction_factor,
        )?;
        ensure_unit_interval(
            "competitive_reduction_factor",
            self.competitive_reduction_factor,
        )?;
        Ok(())
    }
}

/// Time-of-use tariff: a flat base price with a surcharge in peak hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingSchedule {
    /// Off-peak price (currency/kWh).
    pub base_price: f64,
    /// Peak price (currency/kWh).
    pub peak_price: f64,
    /// Hours of the day (0–23) billed at the peak price.
    pub peak_hours: BTreeSet<usize>,
}

impl PricingSchedule {
    /// Creates a tariff.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] for a negative or non-finite
    /// price, or a peak hour outside the day.
    pub fn new(
        base_price: f64,
        peak_price: f64,
        peak_hours: impl IntoIterator<Item = usize>,
    ) -> Result<Self, SimError> {
        for (field, price) in [("base_price", base_price), ("peak_price", peak_price)] {
            if !(price.is_finite() && price >= 0.0) {
                return Err(SimError::config(field, format!("must be >= 0, got {price}")));
            }
        }
        let peak_hours: BTreeSet<usize> = peak_hours.into_iter().collect();
        if let Some(&hour) = peak_hours.iter().find(|&&h| h >= HOURS_PER_DAY) {
            return Err(SimError::config(
                "peak_hours",
                format!("hour {hour} is outside 0..{HOURS_PER_DAY}"),
            ));
        }
        Ok(Self {
            base_price,
            peak_price,
            peak_hours,
        })
    }

    /// Price applicable at `hour`.
    pub fn price_at(&self, hour: usize) -> f64 {
        if self.peak_hours.contains(&hour) {
            self.peak_price
        } else {
            self.base_price
        }
    }
}

/// An electricity consumer taking part in the hourly demand-response game.
///
/// A player owns its tariff, its preferences and its 24-hour demand profile.
/// `original_demand` starts as a copy of the initial profile; each simulated
/// hour reads its entry and then replaces it with the post-response value via
/// [`Player::commit_demand`].
#[derive(Debug, Clone)]
pub struct Player {
    id: u32,
    pricing: PricingSchedule,
    preferences: Preferences,
    initial_demand: Vec<f64>,
    original_demand: Vec<f64>,
}

impl Player {
    /// Creates a player with a full-day demand profile in kWh.
    ///
    /// # Errors
    ///
    /// * [`SimError::DimensionMismatch`] if `demand_kwh` does not hold 24 values.
    /// * [`SimError::InvalidConfiguration`] for a negative demand entry or
    ///   preferences outside `[0, 1]`.
    pub fn new(
        id: u32,
        pricing: PricingSchedule,
        preferences: Preferences,
        demand_kwh: Vec<f64>,
    ) -> Result<Self, SimError> {
        if demand_kwh.len() != HOURS_PER_DAY {
            return Err(SimError::DimensionMismatch {
                field: format!("player {id} demand profile"),
                expected: HOURS_PER_DAY,
                actual: demand_kwh.len(),
            });
        }
        if let Some((hour, kwh)) = demand_kwh
            .iter()
            .enumerate()
            .find(|(_, kwh)| !(kwh.is_finite() && **kwh >= 0.0))
        {
            return Err(SimError::config(
                format!("player {id} demand[{hour}]"),
                format!("must be >= 0, got {kwh}"),
            ));
        }
        preferences.validate()?;

        Ok(Self {
            id,
            pricing,
            preferences,
            original_demand: demand_kwh.clone(),
            initial_demand: demand_kwh,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn pricing(&self) -> &PricingSchedule {
        &self.pricing
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Demand profile as supplied at construction.
    pub fn initial_demand(&self) -> &[f64] {
        &self.initial_demand
    }

    /// Working demand profile; hours already simulated hold post-response values.
    pub fn original_demand(&self) -> &[f64] {
        &self.original_demand
    }

    /// Working demand for `hour`, if the hour is inside the day.
    pub fn demand_at(&self, hour: usize) -> Option<f64> {
        self.original_demand.get(hour).copied()
    }

    /// Returns the peak price in peak hours, otherwise the base price.
    pub fn get_hourly_price(&self, hour: usize) -> f64 {
        self.pricing.price_at(hour)
    }

    /// Draws this hour's strategy from `rng`.
    ///
    /// Consumes exactly one uniform sample in `[0, 1)`. The cooperation
    /// probability is time-invariant, so `hour` does not enter the decision.
    pub fn decide_strategy<R: Rng>(&self, _hour: usize, rng: &mut R) -> Strategy {
        let draw: f64 = rng.random();
        if draw < self.preferences.cooperation_probability {
            Strategy::Cooperate
        } else {
            Strategy::Compete
        }
    }

    /// Replaces the working demand for `hour` with a post-response value.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidInput`] if `hour` is outside the day or `demand_kwh`
    /// is negative.
    pub fn commit_demand(&mut self, hour: usize, demand_kwh: f64) -> Result<(), SimError> {
        let demand_kwh = crate::error::ensure_non_negative("demand", demand_kwh)?;
        let slot = self
            .original_demand
            .get_mut(hour)
            .ok_or(SimError::InvalidInput {
                field: "hour",
                value: hour as f64,
            })?;
        *slot = demand_kwh;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn tariff() -> PricingSchedule {
        PricingSchedule::new(0.1, 0.2, [16, 17, 18]).expect("valid tariff")
    }

    fn player(preferences: Preferences) -> Player {
        Player::new(1, tariff(), preferences, vec![30.0; HOURS_PER_DAY]).expect("valid player")
    }

    #[test]
    fn peak_hours_use_peak_price() {
        let p = player(Preferences::default());
        assert_eq!(p.get_hourly_price(15), 0.1);
        assert_eq!(p.get_hourly_price(16), 0.2);
        assert_eq!(p.get_hourly_price(18), 0.2);
        assert_eq!(p.get_hourly_price(19), 0.1);
    }

    #[test]
    fn demand_lookup_stops_at_end_of_day() {
        let p = player(Preferences::default());
        assert_eq!(p.demand_at(HOURS_PER_DAY - 1), Some(30.0));
        assert_eq!(p.demand_at(HOURS_PER_DAY), None);
    }

    #[test]
    fn peak_hour_outside_day_rejected() {
        let err = PricingSchedule::new(0.1, 0.2, [24]);
        assert!(matches!(err, Err(SimError::InvalidConfiguration { .. })));
    }

    #[test]
    fn negative_price_rejected() {
        assert!(PricingSchedule::new(-0.1, 0.2, [16]).is_err());
    }

    #[test]
    fn short_profile_is_dimension_mismatch() {
        let err = Player::new(7, tariff(), Preferences::default(), vec![1.0; 23]);
        assert_eq!(
            err.unwrap_err(),
            SimError::DimensionMismatch {
                field: "player 7 demand profile".into(),
                expected: 24,
                actual: 23,
            }
        );
    }

    #[test]
    fn negative_profile_entry_rejected() {
        let mut demand = vec![1.0; HOURS_PER_DAY];
        demand[5] = -2.0;
        let err = Player::new(1, tariff(), Preferences::default(), demand);
        assert!(matches!(err, Err(SimError::InvalidConfiguration { .. })));
    }

    #[test]
    fn probability_out_of_range_rejected() {
        let prefs = Preferences {
            cooperation_probability: 1.5,
            ..Preferences::default()
        };
        let err = Player::new(1, tariff(), prefs, vec![1.0; HOURS_PER_DAY]);
        assert!(matches!(err, Err(SimError::InvalidConfiguration { .. })));
    }

    #[test]
    fn certain_cooperation_and_certain_competition() {
        let mut rng = StdRng::seed_from_u64(0);
        let always = player(Preferences {
            cooperation_probability: 1.0,
            ..Preferences::default()
        });
        let never = player(Preferences {
            cooperation_probability: 0.0,
            ..Preferences::default()
        });
        for hour in 0..HOURS_PER_DAY {
            assert_eq!(always.decide_strategy(hour, &mut rng), Strategy::Cooperate);
            assert_eq!(never.decide_strategy(hour, &mut rng), Strategy::Compete);
        }
    }

    #[test]
    fn same_seed_same_strategies() {
        let p = player(Preferences::default());
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for hour in 0..HOURS_PER_DAY {
            assert_eq!(p.decide_strategy(hour, &mut a), p.decide_strategy(hour, &mut b));
        }
    }

    #[test]
    fn commit_overwrites_single_hour() {
        let mut p = player(Preferences::default());
        p.commit_demand(3, 12.5).expect("commit");
        assert_eq!(p.demand_at(3), Some(12.5));
        assert_eq!(p.demand_at(4), Some(30.0));
        assert_eq!(p.initial_demand()[3], 30.0);
    }

    #[test]
    fn commit_outside_day_rejected() {
        let mut p = player(Preferences::default());
        assert!(p.commit_demand(24, 1.0).is_err());
        assert!(p.commit_demand(0, -1.0).is_err());
    }

    #[test]
    fn strategy_flags() {
        assert_eq!(Strategy::Cooperate.flag(), 1);
        assert_eq!(Strategy::Compete.flag(), 0);
        assert_eq!(Strategy::Compete.to_string(), "compete");
    }
}
