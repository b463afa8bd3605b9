/// Hour counter for the simulated day.
pub mod clock;
pub mod engine;
/// Per-player and grid time series.
pub mod series;
pub mod summary;
pub mod types;
