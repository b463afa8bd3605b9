//! Microgrid game simulator entry point: CLI wiring and scenario-driven runs.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use mg_game_sim::config::ScenarioConfig;
use mg_game_sim::io::export::export_csv;
use mg_game_sim::sim::summary::DaySummary;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Scenario TOML file
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Built-in scenario: baseline, cooperative, competitive or hourly
    #[arg(long)]
    preset: Option<String>,

    /// Override the scenario's master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write hourly results to this CSV file
    #[arg(long)]
    telemetry_out: Option<PathBuf>,

    /// Skip the hourly records and print only the summary
    #[arg(long)]
    quiet: bool,

    /// Serve the finished day over HTTP
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#}");
        std::process::exit(1);
    }
}

fn load_scenario(cli: &Cli) -> Result<ScenarioConfig> {
    let mut scenario = if let Some(path) = &cli.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(name) = &cli.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            log::error!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }
    Ok(scenario)
}

fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    log::debug!("{cli:#?}");

    let scenario = load_scenario(&cli)?;
    let mut engine = scenario.build().context("failed to build scenario")?;
    let results = engine.run().context("simulation failed")?;

    if !cli.quiet {
        for hour in results.hours() {
            println!("{hour}");
        }
        println!();
    }
    println!("{}", DaySummary::from_results(&results));

    if let Some(path) = &cli.telemetry_out {
        export_csv(results.hours(), path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        log::info!("telemetry written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(mg_game_sim::api::AppState::new(scenario, results));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(mg_game_sim::api::serve(state, addr))
            .context("API server failed")?;
    }

    Ok(())
}
