//! Launch-device coupling between the crank and the driveshaft.
//!
//! "Lock RPM" is the engine speed the driveline would impose with no slip in the launch device.
//! The clutch and converter models pin the engine at or above their slip/stall speed and report
//! a coupling factor: the fraction of crank power that reaches the gearbox.

use dragstrip_vehicle::LaunchDevice;

/// Slip ratio above which a converter's effective stall speed starts to rise.
const STALL_FLASH_SR: f64 = 0.6;
/// Lockup converters run this much above lock RPM once engaged.
const LOCKUP_OVERRUN: f64 = 1.005;

/// Engine speed and coupling for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    pub engine_rpm: f64,
    /// Fraction of crank power transmitted, in `[0, 1]`.
    pub factor: f64,
    /// Converter speed ratio; `None` for a clutch or a locked converter.
    pub slip_ratio: Option<f64>,
    /// Converter stall speed after flash; `None` for a clutch.
    pub effective_stall: Option<f64>,
}

/// Driveshaft-to-tire speed factor: tires slip more on poor prep and hot rubber, and the
/// excess fades out over the quarter mile.
pub fn tire_slip_factor(traction_index: f64, track_temp_effect: f64, distance_ft: f64) -> f64 {
    let fade = 1.0 - (distance_ft / 1320.0).powi(2);
    1.02 + (0.005 * (traction_index - 1.0) + 3.0 * (track_temp_effect - 1.0)) * fade
}

/// Driveshaft RPM for road speed `v_fps` on a tire of circumference `circumference_ft`.
pub fn driveshaft_rpm(v_fps: f64, circumference_ft: f64, tire_slip: f64) -> f64 {
    if circumference_ft <= 0.0 {
        return 0.0;
    }
    tire_slip * v_fps * 60.0 / circumference_ft
}

/// Engine RPM with no slip in the launch device.
#[inline]
pub fn lock_rpm(driveshaft_rpm: f64, final_drive: f64, gear_ratio: f64) -> f64 {
    driveshaft_rpm * final_drive * gear_ratio
}

/// Resolve engine speed and coupling. `gear` is zero-based; `step` is the 1-based number of the
/// step being taken, and the converter flash starts on the third.
pub fn couple(device: &LaunchDevice, lock_rpm: f64, gear: usize, step: u64) -> Coupling {
    let coupling = match *device {
        LaunchDevice::Clutch {
            slip_rpm,
            slippage,
            lockup,
            ..
        } => {
            let mut engine_rpm = slippage * lock_rpm;
            if engine_rpm < slip_rpm && (gear == 0 || !lockup) {
                engine_rpm = slip_rpm;
            }
            Coupling {
                engine_rpm,
                factor: ratio(lock_rpm, engine_rpm),
                slip_ratio: None,
                effective_stall: None,
            }
        }
        LaunchDevice::Converter { lockup, .. } if lockup && gear > 0 => {
            let engine_rpm = LOCKUP_OVERRUN * lock_rpm;
            Coupling {
                engine_rpm,
                factor: ratio(lock_rpm, engine_rpm),
                slip_ratio: None,
                effective_stall: None,
            }
        }
        LaunchDevice::Converter {
            stall_rpm,
            slippage,
            torque_mult,
            ..
        } => {
            let mut stall = stall_rpm;
            let mut sr = slippage * lock_rpm / stall;
            if step > 2 && sr > STALL_FLASH_SR {
                stall *= 1.0 + (slippage - 1.0) * (sr - STALL_FLASH_SR) / (1.0 / slippage - STALL_FLASH_SR);
                sr = slippage * lock_rpm / stall;
            }
            let mut engine_rpm = slippage * lock_rpm;
            let mut factor = 1.0 / slippage;
            if engine_rpm < stall {
                engine_rpm = stall;
                factor = (torque_mult - (torque_mult - 1.0) * sr) * lock_rpm / stall;
            }
            Coupling {
                engine_rpm,
                factor,
                slip_ratio: Some(sr),
                effective_stall: Some(stall),
            }
        }
    };
    Coupling {
        factor: coupling.factor.clamp(0.0, 1.0),
        ..coupling
    }
}

fn ratio(lock_rpm: f64, engine_rpm: f64) -> f64 {
    if engine_rpm > 0.0 { lock_rpm / engine_rpm } else { 0.0 }
}
