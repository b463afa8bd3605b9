//! Microgrid components: renewable sources, shared storage and the hourly step.

/// Shared battery storage.
pub mod battery;
pub mod microgrid;
/// Diurnal solar generation model.
pub mod solar;
pub mod types;
/// Wind generation drawn once per day.
pub mod wind;

pub use battery::Battery;
pub use microgrid::Microgrid;
pub use solar::SolarPv;
pub use types::Generator;
pub use wind::WindTurbine;
