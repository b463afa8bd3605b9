//! Two-player demand-response game on a shared solar, wind and battery microgrid.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
/// Renewable sources, battery storage and the hourly microgrid step.
pub mod grid;
pub mod io;
/// Players, tariffs, strategies and demand response.
pub mod players;
/// Simulation engine, clock, results and summaries.
pub mod sim;
