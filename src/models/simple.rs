//! Closed-form ET and trap-speed estimate from power-to-weight.

use dragstrip_atmosphere::hp_correction_simple;
use dragstrip_core::math::cbrt_safe;
use dragstrip_powertrain::EngineError;
use dragstrip_vehicle::{Environment, RaceLength, Vehicle, VehicleError};

use super::{ModelId, PhysicsModel, SimInputs};
use crate::kernel::result::{SimMeta, SimResult, Termination, TerminationReason, TimeslipEntry};
use crate::kernel::SimError;

const ET_COEFF: f64 = 5.825;
const MPH_COEFF: f64 = 234.0;
const EIGHTH_ET_SCALE: f64 = 0.64;
const EIGHTH_MPH_SCALE: f64 = 0.80;
/// Fraction of quarter-mile ET elapsed at each checkpoint.
const SPLIT_FRACTIONS: [(f64, f64); 5] = [
    (60.0, 0.16),
    (330.0, 0.44),
    (660.0, 0.79),
    (1000.0, 0.93),
    (1320.0, 1.0),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleV1;

impl PhysicsModel for SimpleV1 {
    fn id(&self) -> ModelId {
        ModelId::SimpleV1
    }

    fn simulate(&self, inputs: &SimInputs<'_>) -> Result<SimResult, SimError> {
        estimate(inputs.vehicle, inputs.env, inputs.length)
    }
}

/// Cube-root estimate on weather-corrected rated power.
pub fn estimate(
    vehicle: &Vehicle,
    env: &Environment,
    length: RaceLength,
) -> Result<SimResult, SimError> {
    if !(vehicle.weight_lb > 0.0) {
        return Err(VehicleError::NonPositiveWeight(vehicle.weight_lb).into());
    }
    let hp = vehicle.rated_hp() * hp_correction_simple(env);
    if !(hp > 0.0) {
        return Err(EngineError::ZeroRating(hp).into());
    }
    let ratio = vehicle.weight_lb / hp;
    let (et_scale, mph_scale) = match length {
        RaceLength::Eighth => (EIGHTH_ET_SCALE, EIGHTH_MPH_SCALE),
        RaceLength::Quarter => (1.0, 1.0),
    };
    let et_s = ET_COEFF * cbrt_safe(ratio) * et_scale;
    let mph = MPH_COEFF * cbrt_safe(1.0 / ratio) * mph_scale;

    let finish_ft = length.length_ft();
    let finish_frac = split_fraction(finish_ft);
    let timeslip = length
        .checkpoints()
        .iter()
        .map(|&d_ft| TimeslipEntry {
            d_ft,
            t_s: et_s * split_fraction(d_ft) / finish_frac,
            v_mph: mph * d_ft / finish_ft,
        })
        .collect::<Vec<_>>();

    let mut meta = SimMeta::bare(ModelId::SimpleV1, timeslip.len() as u64);
    meta.finish_mph = Some(mph);
    meta.termination = Some(Termination {
        reason: TerminationReason::Distance,
        steps: 0,
        t_s: et_s,
        target_ft: finish_ft,
    });
    Ok(SimResult {
        et_s,
        mph,
        timeslip,
        traces: None,
        meta,
    })
}

fn split_fraction(d_ft: f64) -> f64 {
    SPLIT_FRACTIONS
        .iter()
        .find(|(d, _)| (*d - d_ft).abs() < 1e-9)
        .map(|&(_, frac)| frac)
        .unwrap_or(d_ft / 1320.0)
}
