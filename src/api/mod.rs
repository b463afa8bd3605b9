//! REST API for a finished day.
//!
//! Provides four GET endpoints:
//! - `/state`: scenario, day summary and latest hour
//! - `/hours`: hourly records with optional range filtering
//! - `/players/{id}/series`: one player's time series
//! - `/grid/series`: solar, wind and battery series

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::ScenarioConfig;
use crate::sim::series::DayResults;
use crate::sim::summary::DaySummary;

pub use types::{ErrorResponse, HoursQuery, StateResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the run completes and wrapped in `Arc`; all data
/// is read-only so no locks are needed.
pub struct AppState {
    /// Scenario the day was simulated from.
    pub scenario: ScenarioConfig,
    pub summary: DaySummary,
    pub results: DayResults,
}

impl AppState {
    pub fn new(scenario: ScenarioConfig, results: DayResults) -> Self {
        Self {
            summary: DaySummary::from_results(&results),
            scenario,
            results,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/hours", get(handlers::get_hours))
        .route("/players/{id}/series", get(handlers::get_player_series))
        .route("/grid/series", get(handlers::get_grid_series))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process ends.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the server
/// fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("API server listening on http://{addr}");
    axum::serve(listener, router(state)).await
}
