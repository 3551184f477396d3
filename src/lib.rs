//! Drag-race ET and trap-speed prediction.
//!
//! The [`kernel`] integrates a car down the strip with the legacy RSACLASSIC physics. The
//! [`models`] registry puts the kernel alongside a closed-form estimator and a learned
//! correction layer behind one interface, and [`report`] turns results into export rows.

pub mod kernel;
pub mod models;
pub mod report;

pub use kernel::{
    CancelToken, KernelConfig, SimError, SimOptions, SimResult, StepMode, simulate, simulate_with,
};
pub use models::{ModelId, ModelRegistry, PhysicsModel, SimInputs};

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
