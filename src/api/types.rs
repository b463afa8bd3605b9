//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::sim::summary::DaySummary;
use crate::sim::types::HourResult;

/// Combined state response: scenario, summary and latest hourly record.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub scenario: ScenarioConfig,
    pub summary: DaySummary,
    /// Last simulated hour, `null` for an empty run.
    pub latest_hour: Option<HourResult>,
}

/// Optional range query parameters for the hours endpoint.
#[derive(Debug, Deserialize)]
pub struct HoursQuery {
    /// First hour (inclusive).
    pub from: Option<usize>,
    /// Last hour (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
