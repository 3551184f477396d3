//! Kernel output corrected by a per-vehicle learned ET residual.

use std::sync::Arc;

use dragstrip_core::math::clamp;
use dragstrip_learning::features::extract;
use dragstrip_learning::{FEATURE_DIM, ModelStore, VehicleModel, model_key};
use tracing::debug;

use super::{ModelId, PhysicsModel, RsaClassic, SimInputs};
use crate::kernel::result::{SimResult, warnings};
use crate::kernel::{KernelConfig, SimError};

/// Corrections are held within this fraction of the physics ET.
const MAX_CORRECTION: f64 = 0.2;

pub struct Blend {
    classic: RsaClassic,
    store: Arc<dyn ModelStore>,
}

impl Blend {
    pub fn new(config: KernelConfig, store: Arc<dyn ModelStore>) -> Self {
        Self {
            classic: RsaClassic::new(config),
            store,
        }
    }
}

impl PhysicsModel for Blend {
    fn id(&self) -> ModelId {
        ModelId::Blend
    }

    fn simulate(&self, inputs: &SimInputs<'_>) -> Result<SimResult, SimError> {
        let mut result = self.classic.simulate(inputs)?;
        result.meta.model = ModelId::Blend;
        let key = model_key(&inputs.vehicle.id);
        match self.store.get(&key)? {
            Some(model) => {
                let physics_et = result.et_s;
                let x = extract(inputs.vehicle, inputs.env, physics_et);
                let delta = model.apply(&x)?;
                result.et_s = clamp(
                    physics_et + delta,
                    physics_et * (1.0 - MAX_CORRECTION),
                    physics_et * (1.0 + MAX_CORRECTION),
                );
                debug!(%key, physics_et, delta, et_s = result.et_s, "applied learned correction");
            }
            None => result.meta.warnings.push(warnings::NO_LEARNED_MODEL.to_string()),
        }
        Ok(result)
    }
}

/// Fold one observed run into the vehicle's learned model and persist it.
///
/// The target is the residual between `actual_et_s` and the kernel's prediction for the same
/// inputs. Returns the updated model.
pub fn observe(
    store: &dyn ModelStore,
    config: &KernelConfig,
    inputs: &SimInputs<'_>,
    actual_et_s: f64,
) -> Result<VehicleModel, SimError> {
    let predicted = RsaClassic::new(config.clone()).simulate(inputs)?;
    let key = model_key(&inputs.vehicle.id);
    let mut model = store
        .get(&key)?
        .unwrap_or_else(|| VehicleModel::new(FEATURE_DIM));
    let x = extract(inputs.vehicle, inputs.env, predicted.et_s);
    model.update(&x, actual_et_s - predicted.et_s)?;
    store.set(&key, &model)?;
    debug!(%key, n = model.n, confidence = model.confidence, "updated learned model");
    Ok(model)
}
