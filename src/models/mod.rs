//! Core data models for cricket records.

mod ids;
mod performance;
mod player;
mod validation;

pub use ids::*;
pub use performance::*;
pub use player::*;
pub use validation::ValidationError;
