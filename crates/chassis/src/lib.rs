//! Chassis-side force models for the drag-race kernel.

pub mod aero;
pub mod tire;
pub mod traction;
pub mod weight;

pub use aero::RoadLoad;
pub use tire::TireState;
pub use traction::{ClampOutcome, clamp_acceleration, limit_jerk};
pub use weight::AxleLoads;
