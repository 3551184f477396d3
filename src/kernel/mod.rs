//! Drag-race kernel: the legacy variable-step integration, with a fixed-step alternative.

pub mod integrator;
pub mod launch;
pub mod result;
pub mod rsaclassic;
pub mod state;
pub mod trap;

use dragstrip_learning::{LearningError, StoreError};
use dragstrip_powertrain::EngineError;
use dragstrip_vehicle::VehicleError;
use thiserror::Error;

pub use result::{SimMeta, SimResult, TerminationReason, TimeslipEntry, TraceSample};
pub use rsaclassic::{CancelToken, KernelConfig, SimOptions, StepMode, simulate, simulate_with};

/// Errors raised before or around a run. Numerical trouble inside the loop is reported in
/// [`SimMeta::warnings`] instead.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid vehicle or environment: {0}")]
    Vehicle(#[from] VehicleError),
    #[error("invalid power source: {0}")]
    Engine(#[from] EngineError),
    #[error("model store failed: {0}")]
    Store(#[from] StoreError),
    #[error("learned model rejected input: {0}")]
    Learning(#[from] LearningError),
    #[error("no model registered for {0}")]
    UnknownModel(crate::models::ModelId),
}
