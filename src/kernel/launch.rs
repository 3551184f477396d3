//! Launch: the state at the hit and the step-size schedule that follows it.
//!
//! The initial acceleration comes straight from crank torque at the launch RPM pushed through
//! first gear, bounded by the static traction limit. The legacy step then grows the step while
//! acceleration is high and shrinks it as acceleration falls off, in proportion to
//! `(a_launch / a)⁴`.
//!
//! The fixed-step mode instead runs a short bootstrap: until the driveshaft turns, the
//! acceleration is recomputed from torque at the pinned RPM every step.

use dragstrip_chassis::aero::dynamic_pressure;
use dragstrip_chassis::traction::{max_acceleration_g, tractive_capacity_lb};
use dragstrip_core::PhysicsConstants;
use dragstrip_core::constants::{HP_TORQUE_LEGACY, Z5};
use dragstrip_core::math::clamp;
use dragstrip_powertrain::EngineModel;
use dragstrip_vehicle::{Environment, Vehicle};

/// Last step number (1-based) eligible for the fixed-step bootstrap.
pub const BOOTSTRAP_MAX_STEPS: u64 = 6;
/// Lock RPM below which the driveline is treated as not yet turning.
pub const BOOTSTRAP_LOCK_RPM: f64 = 5.0;

/// Speed at the hit (ft/s). Nonzero so the first power-to-acceleration division is defined.
pub const LAUNCH_SPEED_FPS: f64 = 0.001;
/// Bounds on the legacy step (s).
pub const MIN_STEP_S: f64 = 0.005;
pub const MAX_STEP_S: f64 = 0.1;
/// Upper bound on the step once it has been limited by the shift-point cap.
pub const MAX_CAPPED_STEP_S: f64 = 0.05;
/// Bound on `a_launch / a` in the step schedule.
const STEP_GROWTH_LIMIT: f64 = 10.0;

#[inline]
pub fn in_bootstrap(step_no: u64, lock_rpm: f64) -> bool {
    step_no <= BOOTSTRAP_MAX_STEPS && lock_rpm < BOOTSTRAP_LOCK_RPM
}

/// Crank torque at `rpm` from either the double-precision or the legacy single-precision table.
#[inline]
pub fn crank_torque(engine: &EngineModel, rpm: f64, legacy_lookup: bool) -> f64 {
    if legacy_lookup {
        engine.torque_at_legacy(rpm)
    } else {
        engine.torque_at(rpm)
    }
}

/// Crank horsepower at `rpm`, with the same precision choice as [`crank_torque`]. With
/// `extend_sheet` the HP column runs on along its end segments past the sheet, as the legacy
/// table reads it.
#[inline]
pub fn crank_power(
    engine: &EngineModel,
    rpm: f64,
    legacy_lookup: bool,
    extend_sheet: bool,
) -> f64 {
    if extend_sheet {
        engine.power_hp_extended(rpm, legacy_lookup)
    } else if legacy_lookup {
        engine.power_hp_legacy(rpm)
    } else {
        engine.power_hp(rpm)
    }
}

/// Engine speed the car leaves on: the clutch launch RPM, or stall for a converter.
pub fn launch_rpm(vehicle: &Vehicle) -> f64 {
    if vehicle.launch.is_converter() {
        vehicle.launch.pinned_rpm()
    } else {
        vehicle.launch.launch_rpm()
    }
}

/// Resistance at rest (lbf): rolling resistance on the static weight plus drag from any wind.
pub fn launch_drag_lb(
    vehicle: &Vehicle,
    env: &Environment,
    rho_lbm_ft3: f64,
    constants: &PhysicsConstants,
) -> f64 {
    let q = dynamic_pressure(rho_lbm_ft3, env.wind_mph / Z5, constants.gc);
    constants.rolling_cmu * vehicle.weight_lb + vehicle.aero.cd * vehicle.aero.frontal_area_ft2 * q
}

/// Torque-derived launch acceleration (g) in `gear` with crank torque `torque_lbft`.
pub fn launch_acceleration_g(
    vehicle: &Vehicle,
    torque_lbft: f64,
    gear: usize,
    tire_slip: f64,
    drag_lb: f64,
    constants: &PhysicsConstants,
) -> f64 {
    let dt = &vehicle.drivetrain;
    let torque = torque_lbft
        * vehicle.launch.torque_mult()
        * dt.gear_ratio(gear)
        * dt.gear_efficiency(gear, constants.gear_eff_min)
        * dt.final_drive
        * dt.transmission_efficiency;
    let lever_ft = tire_slip * vehicle.tire_diameter_in() / 24.0;
    if lever_ft <= 0.0 || vehicle.weight_lb <= 0.0 {
        return 0.0;
    }
    let force = torque / lever_ft - drag_lb;
    let k = if vehicle.launch.is_converter() {
        constants.launch_k_converter
    } else {
        constants.launch_k_clutch
    };
    k * force / vehicle.weight_lb
}

/// Crank torque (lb-ft) behind `hp` at `rpm`, as the launch estimate converts it.
#[inline]
pub fn launch_torque(hp: f64, rpm: f64) -> f64 {
    if rpm > 0.0 { HP_TORQUE_LEGACY * hp / rpm } else { 0.0 }
}

/// Traction limit (g) with the car at rest on its static rear load.
pub fn static_max_acceleration_g(
    vehicle: &Vehicle,
    env: &Environment,
    track_temp_effect: f64,
    drag_lb: f64,
    constants: &PhysicsConstants,
) -> f64 {
    let front = vehicle.static_front_weight_lb(constants.default_front_weight_frac);
    let mut rear = vehicle.weight_lb - front;
    if rear < 0.0 {
        rear = vehicle.weight_lb;
    }
    let capacity =
        tractive_capacity_lb(vehicle, env.traction_index, track_temp_effect, rear, constants);
    max_acceleration_g(capacity, 1.0, drag_lb, vehicle.weight_lb)
}

/// Base step (s) from the power-to-weight ratio at launch. `raw_launch_hp` is the sheet value
/// before any correction.
pub fn base_step_s(raw_launch_hp: f64, torque_mult: f64, weight_lb: f64) -> f64 {
    let ratio = raw_launch_hp * torque_mult / weight_lb;
    if !(ratio > 0.0) {
        return MIN_STEP_S;
    }
    (60.0 * 0.11 * ratio.powf(-1.0 / 3.0) / 15.0).max(MIN_STEP_S)
}

/// Nominal legacy step (s) for step number `step_no` (1-based) with current acceleration
/// `ags_g`. The step grows as the car's acceleration falls below the launch value.
pub fn scheduled_step_s(base_s: f64, launch_ags_g: f64, ags_g: f64, step_no: u64) -> f64 {
    let step = if ags_g > 0.0 && step_no > 1 {
        base_s * (launch_ags_g / ags_g).min(STEP_GROWTH_LIMIT).powi(4)
    } else {
        base_s
    };
    step.min(MAX_STEP_S)
}

/// Clamp a nominal step into the band used between shifts.
#[inline]
pub fn cruise_step_s(step_s: f64) -> f64 {
    clamp(step_s, MIN_STEP_S, MAX_CAPPED_STEP_S)
}

/// Clock offset for the clutch slipping up from the launch RPM to its slip RPM before the car
/// moves.
pub fn slip_delay_s(engine_inertia: f64, launch_rpm: f64, pinned_rpm: f64) -> f64 {
    if launch_rpm < pinned_rpm {
        engine_inertia * (pinned_rpm - launch_rpm) / 250_000.0
    } else {
        0.0
    }
}
