//! Integration tests for the default two-player day.

mod common;

use mg_game_sim::config::ScenarioConfig;
use mg_game_sim::players::{Preferences, Strategy};
use mg_game_sim::sim::engine::Engine;
use mg_game_sim::sim::summary::DaySummary;
use mg_game_sim::sim::types::{DemandBasis, HOURS_PER_DAY, SimConfig};

#[test]
fn full_run_produces_one_record_per_hour() {
    let mut engine = common::default_engine(common::default_config());
    let results = engine.run().expect("run");

    assert_eq!(results.hours().len(), HOURS_PER_DAY);
    for (i, hour) in results.hours().iter().enumerate() {
        assert_eq!(hour.hour, i);
        assert_eq!(hour.players.len(), 2);
    }
}

#[test]
fn same_seed_is_deterministic() {
    let a = common::default_engine(SimConfig::new(7)).run().expect("run");
    let b = common::default_engine(SimConfig::new(7)).run().expect("run");
    assert_eq!(a, b);
}

#[test]
fn different_seeds_change_strategies() {
    let flags = |seed| {
        let results = common::default_engine(SimConfig::new(seed)).run().expect("run");
        results.player_series(1).expect("player 1").strategy_flags
    };
    // 24 fair draws colliding across three seeds is effectively impossible
    let (a, b, c) = (flags(1), flags(2), flags(3));
    assert!(a != b || b != c);
}

#[test]
fn soc_stays_within_capacity() {
    let results = common::default_engine(common::default_config())
        .run()
        .expect("run");
    for hour in results.hours() {
        assert!((0.0..=100.0).contains(&hour.battery_soc_after_charge_kwh));
        assert!((0.0..=100.0).contains(&hour.battery_soc_kwh));
    }
}

#[test]
fn demand_never_increases_and_savings_are_non_negative() {
    let results = common::default_engine(common::default_config())
        .run()
        .expect("run");
    for hour in results.hours() {
        for p in &hour.players {
            assert!(p.demand_after_kwh >= 0.0);
            assert!(p.demand_after_kwh <= p.demand_before_kwh);
            assert!(p.cost_savings >= 0.0);
            let expected = (p.demand_before_kwh - p.demand_after_kwh) * p.price;
            assert!((p.cost_savings - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn peak_hours_use_peak_price() {
    let results = common::default_engine(common::default_config())
        .run()
        .expect("run");
    let prices = results.player_series(2).expect("player 2").prices;
    for (hour, price) in prices.iter().enumerate() {
        let expected = if (16..=18).contains(&hour) { 0.2 } else { 0.1 };
        assert_eq!(*price, expected, "hour {hour}");
    }
}

#[test]
fn always_competing_day_sheds_twenty_percent_truncated() {
    let competitor = Preferences {
        cooperation_probability: 0.0,
        ..Preferences::default()
    };
    let mut engine = Engine::new(
        common::default_config(),
        vec![
            common::player_with(1, competitor),
            common::player_with(2, competitor),
        ],
        common::default_microgrid(),
    )
    .expect("engine");
    let results = engine.run().expect("run");

    let series = results.player_series(1).expect("player 1");
    assert!(series.strategy_flags.iter().all(|&f| f == 0));
    // hour 0: renewable 12 + soc 10.8 covers demand 20 -> 20 - trunc(4.0) = 16
    assert_eq!(series.demand_after_kwh[0], 16.0);
    assert!(results.hours().iter().all(|h| h
        .players
        .iter()
        .all(|p| p.strategy == Strategy::Compete)));
}

#[test]
fn summary_agrees_with_series() {
    let results = common::default_engine(common::default_config())
        .run()
        .expect("run");
    let summary = DaySummary::from_results(&results);

    for p in &summary.players {
        let series = results.player_series(p.player_id).expect("series");
        let last = *series.cumulative_cost_savings.last().expect("24 hours");
        assert!((p.total_cost_savings - last).abs() < 1e-9);
        assert_eq!(
            p.cooperation_hours,
            series.strategy_flags.iter().filter(|&&f| f == 1).count()
        );
    }
    let grand = *results
        .grand_total_cumulative_savings()
        .last()
        .expect("24 hours");
    assert!((summary.grand_total_cost_savings - grand).abs() < 1e-9);
}

#[test]
fn hourly_basis_drains_battery_less_than_daily() {
    let daily = common::default_engine(SimConfig::new(5)).run().expect("run");
    let hourly = common::default_engine(SimConfig::new(5).with_demand_basis(DemandBasis::Hourly))
        .run()
        .expect("run");

    // a full-day aggregate exceeds renewable supply every hour
    assert!(daily.hours().iter().all(|h| h.total_demand_kwh > h.renewable_kwh));
    let daily_final = daily.hours().last().expect("hours").battery_soc_kwh;
    let hourly_final = hourly.hours().last().expect("hours").battery_soc_kwh;
    assert!(hourly_final >= daily_final);
}

#[test]
fn baseline_scenario_runs_end_to_end() {
    let scenario = ScenarioConfig::baseline();
    assert!(scenario.validate().is_empty());
    let results = scenario.build().expect("build").run().expect("run");
    let summary = DaySummary::from_results(&results);
    assert_eq!(summary.players.len(), 2);
    assert!(summary.grand_total_cost_savings >= 0.0);
}
