//! Players of the demand-response game: tariffs, preferences and reduction rules.

/// Cooperative and competitive demand-reduction rules.
pub mod demand_response;
/// Player state, tariff and strategy draw.
pub mod player;

pub use demand_response::DemandResponse;
pub use player::{Player, Preferences, PricingSchedule, Strategy};
