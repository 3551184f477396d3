//! Engine, driveline, and shift models.
//!
//! Each module is a set of pure functions or a small state machine; the kernel composes them
//! once per integration step.

pub mod delivery;
pub mod driveline;
pub mod engine;
pub mod quarter_jr;
pub mod shift;

pub use driveline::Coupling;
pub use engine::{EngineError, EngineModel};
pub use shift::{ShiftController, ShiftEvent};
