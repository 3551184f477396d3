//! Per-vehicle ET correction learned from observed runs.
//!
//! A [`VehicleModel`] is a linear model fitted online with exponentially-weighted recursive
//! least squares. It predicts the residual between the physics ET and the ET the car actually
//! ran; [`features::extract`] defines its inputs.

pub mod features;
pub mod rls;
pub mod store;

pub use features::FEATURE_DIM;
pub use rls::{LearningError, VehicleModel};
pub use store::{JsonDirStore, MemoryStore, ModelStore, StoreError, model_key};
