//! Interchangeable physics models and the registry that serves them.

pub mod blend;
pub mod simple;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dragstrip_learning::ModelStore;
use dragstrip_vehicle::{Environment, RaceLength, Vehicle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::{KernelConfig, SimError, SimOptions, SimResult, simulate_with};

pub use blend::{Blend, observe};
pub use simple::SimpleV1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelId {
    /// Closed-form cube-root estimate.
    #[serde(rename = "SimpleV1")]
    SimpleV1,
    /// Full step-by-step kernel.
    #[serde(rename = "RSACLASSIC")]
    RsaClassic,
    /// Kernel plus the per-vehicle learned ET correction.
    #[serde(rename = "Blend")]
    Blend,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [ModelId::SimpleV1, ModelId::RsaClassic, ModelId::Blend];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::SimpleV1 => "SimpleV1",
            ModelId::RsaClassic => "RSACLASSIC",
            ModelId::Blend => "Blend",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("unknown physics model '{0}' (expected SimpleV1, RSACLASSIC, or Blend)")]
pub struct UnknownModelId(pub String);

impl FromStr for ModelId {
    type Err = UnknownModelId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownModelId(s.to_string()))
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct SimInputs<'a> {
    pub vehicle: &'a Vehicle,
    pub env: &'a Environment,
    pub length: RaceLength,
    pub options: SimOptions,
}

impl<'a> SimInputs<'a> {
    pub fn new(vehicle: &'a Vehicle, env: &'a Environment, length: RaceLength) -> Self {
        Self {
            vehicle,
            env,
            length,
            options: SimOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SimOptions) -> Self {
        self.options = options;
        self
    }
}

/// A way of predicting a run.
pub trait PhysicsModel: Send + Sync {
    fn id(&self) -> ModelId;
    fn simulate(&self, inputs: &SimInputs<'_>) -> Result<SimResult, SimError>;
}

/// The kernel as a registry entry.
#[derive(Debug, Clone, Default)]
pub struct RsaClassic {
    config: KernelConfig,
}

impl RsaClassic {
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

impl PhysicsModel for RsaClassic {
    fn id(&self) -> ModelId {
        ModelId::RsaClassic
    }

    fn simulate(&self, inputs: &SimInputs<'_>) -> Result<SimResult, SimError> {
        simulate_with(
            &self.config,
            &inputs.options,
            inputs.vehicle,
            inputs.env,
            inputs.length,
        )
    }
}

/// Map from model id to implementation, built once and read-only afterwards.
pub struct ModelRegistry {
    models: HashMap<ModelId, Box<dyn PhysicsModel>>,
}

impl ModelRegistry {
    /// Registry with default kernel tuning. `store` backs the Blend model.
    pub fn new(store: Arc<dyn ModelStore>) -> Self {
        Self::with_config(KernelConfig::default(), store)
    }

    pub fn with_config(config: KernelConfig, store: Arc<dyn ModelStore>) -> Self {
        let mut models: HashMap<ModelId, Box<dyn PhysicsModel>> = HashMap::new();
        models.insert(ModelId::SimpleV1, Box::new(SimpleV1));
        models.insert(ModelId::RsaClassic, Box::new(RsaClassic::new(config.clone())));
        models.insert(ModelId::Blend, Box::new(Blend::new(config, store)));
        Self { models }
    }

    pub fn get(&self, id: ModelId) -> Option<&dyn PhysicsModel> {
        self.models.get(&id).map(|model| model.as_ref())
    }

    pub fn simulate(&self, id: ModelId, inputs: &SimInputs<'_>) -> Result<SimResult, SimError> {
        self.get(id)
            .ok_or(SimError::UnknownModel(id))?
            .simulate(inputs)
    }

    /// Registered ids in a stable order.
    pub fn ids(&self) -> Vec<ModelId> {
        let mut ids: Vec<ModelId> = self.models.keys().copied().collect();
        ids.sort();
        ids
    }
}
