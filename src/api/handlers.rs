//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, HoursQuery, StateResponse};
use crate::sim::types::HourResult;

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        scenario: state.scenario.clone(),
        summary: state.summary.clone(),
        latest_hour: state.results.hours().last().cloned(),
    })
}

/// Returns hourly records, optionally filtered by hour range.
///
/// `GET /hours` → 200 + `Vec<HourResult>` JSON
/// `GET /hours?from=N&to=M` → filtered range (inclusive)
/// `GET /hours?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_hours(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HoursQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let hours: Vec<HourResult> = state
        .results
        .hours()
        .iter()
        .filter(|h| h.hour >= from && h.hour <= to)
        .cloned()
        .collect();

    Ok(Json(hours))
}

/// `GET /players/{id}/series` → 200 + `PlayerSeries`, or 404 for an unknown id
pub async fn get_player_series(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> impl IntoResponse {
    state.results.player_series(id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no player with id {id}"),
            }),
        )
    })
}

/// `GET /grid/series` → 200 + `GridSeries`
pub async fn get_grid_series(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.results.grid_series())
}
