//! The RSACLASSIC run loop.
//!
//! One call owns its [`SimState`] for the whole run. In the default [`StepMode::Legacy`] each
//! step fixes the speed the car will reach, resolves tire geometry, driveline coupling, engine
//! power, road load, and the traction band at that speed, and then iterates on the time the step
//! takes until the rotating-inertia losses and the time agree. [`StepMode::Fixed`] instead
//! integrates with semi-implicit Euler at a constant step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dragstrip_atmosphere::{air_density, hp_correction_divisor, track_temp_effect};
use dragstrip_chassis::aero::road_load;
use dragstrip_chassis::traction::{max_acceleration_g, tractive_capacity_lb};
use dragstrip_chassis::weight::transfer;
use dragstrip_chassis::{ClampOutcome, RoadLoad, TireState, clamp_acceleration, limit_jerk};
use dragstrip_core::PhysicsConstants;
use dragstrip_core::constants::{FT_LB_PER_HP, PI_LEGACY, Z5};
use dragstrip_powertrain::delivery::{fuel_factor, rev_limiter_factor, throttle_factor};
use dragstrip_powertrain::driveline::{couple, driveshaft_rpm, lock_rpm, tire_slip_factor};
use dragstrip_powertrain::quarter_jr;
use dragstrip_powertrain::{Coupling, EngineModel, ShiftController};
use dragstrip_vehicle::{Environment, LaunchDevice, RaceLength, ShiftPolicy, Vehicle};
use tracing::{debug, warn};

use super::SimError;
use super::integrator::{KinematicState, advance, advance_at_power, time_to_speed};
use super::launch::{
    LAUNCH_SPEED_FPS, base_step_s, crank_power, crank_torque, cruise_step_s, in_bootstrap,
    launch_acceleration_g, launch_drag_lb, launch_rpm, launch_torque, scheduled_step_s,
    slip_delay_s, static_max_acceleration_g,
};
use super::result::{
    ClutchDiagnostics, ConverterDiagnostics, FuelDiagnostics, RolloutDiagnostics, SimMeta,
    SimResult, Termination, TerminationReason, TraceSample, warnings,
};
use super::state::SimState;
use super::trap::{CourseTimer, Staging, TrackPoint};
use crate::models::ModelId;

/// Iterations allowed for the step time to settle.
const MAX_TIME_ITERATIONS: usize = 12;
/// Relative change (%) in step time at which the iteration stops.
const TIME_TOLERANCE_PCT: f64 = 0.01;
/// A step may not lose more than this share of speed once the car is past 100 ft/s.
const MAX_SPEED_LOSS: f64 = 0.9;
const SPEED_LOSS_GUARD_FPS: f64 = 100.0;
/// Margin over the shift point the step-end speed may reach before it is cut back.
const SHIFT_OVERRUN_RPM: f64 = 5.0;

/// How the kernel advances time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StepMode {
    /// Variable step sized from the car's acceleration, with the step time iterated against
    /// the rotating-inertia losses.
    #[default]
    Legacy,
    /// Semi-implicit Euler at a constant step (s).
    Fixed { dt_s: f64 },
}

impl StepMode {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy)
    }
}

/// Kernel tuning. The defaults reproduce the legacy calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelConfig {
    pub constants: PhysicsConstants,
    pub step: StepMode,
    pub max_time_s: f64,
    pub max_steps: u64,
    /// Distance run past the finish line before the loop stops (ft).
    pub overrun_ft: f64,
    /// Steps between polls of the cancel token.
    pub cancel_check_interval: u64,
    /// Evaluate the engine table in single precision.
    pub legacy_f32_lookup: bool,
    /// Apply the methanol and nitro delivery ramps.
    pub fuel_ramps: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            constants: PhysicsConstants::default(),
            step: StepMode::Legacy,
            max_time_s: 30.0,
            max_steps: 5000,
            overrun_ft: 50.0,
            cancel_check_interval: 256,
            legacy_f32_lookup: false,
            fuel_ramps: false,
        }
    }
}

impl KernelConfig {
    /// Configuration for a fixed-step run at `dt_s`.
    pub fn fixed(dt_s: f64) -> Self {
        Self {
            step: StepMode::Fixed { dt_s },
            ..Self::default()
        }
    }

    /// Hard step ceiling. A fixed step gets enough steps to reach `max_time_s`.
    pub fn step_limit(&self) -> u64 {
        match self.step {
            StepMode::Legacy => self.max_steps,
            StepMode::Fixed { dt_s } if dt_s > 0.0 => {
                self.max_steps.max((self.max_time_s / dt_s).ceil() as u64)
            }
            StepMode::Fixed { .. } => 0,
        }
    }
}

/// Cooperative cancellation flag shared between a caller and a running simulation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    /// Record one [`TraceSample`] per step.
    pub record_traces: bool,
    pub cancel: Option<CancelToken>,
}

impl SimOptions {
    pub fn with_traces() -> Self {
        Self {
            record_traces: true,
            cancel: None,
        }
    }
}

/// Run the kernel with default tuning and no traces.
pub fn simulate(
    vehicle: &Vehicle,
    env: &Environment,
    length: RaceLength,
) -> Result<SimResult, SimError> {
    simulate_with(&KernelConfig::default(), &SimOptions::default(), vehicle, env, length)
}

#[derive(Debug, Default)]
struct Diagnostics {
    converter_steps: u64,
    sum_torque_ratio: f64,
    sum_slip_ratio: f64,
    peak_stall: f64,
    min_coupling: f64,
    lockup_at_ft: Option<f64>,
    min_fuel: f64,
    max_fuel: f64,
}

impl Diagnostics {
    fn new() -> Self {
        Self {
            min_coupling: 1.0,
            min_fuel: 1.0,
            max_fuel: 1.0,
            ..Self::default()
        }
    }

    fn record(&mut self, device: &LaunchDevice, coupling: &Coupling, s_ft: f64) {
        match *device {
            LaunchDevice::Converter { torque_mult, .. } => {
                if let (Some(sr), Some(stall)) = (coupling.slip_ratio, coupling.effective_stall) {
                    self.converter_steps += 1;
                    self.sum_slip_ratio += sr;
                    self.sum_torque_ratio += (torque_mult - (torque_mult - 1.0) * sr).max(1.0);
                    self.peak_stall = self.peak_stall.max(stall);
                }
            }
            LaunchDevice::Clutch { slip_rpm, .. } => {
                self.min_coupling = self.min_coupling.min(coupling.factor);
                if self.lockup_at_ft.is_none() && coupling.engine_rpm > slip_rpm {
                    self.lockup_at_ft = Some(s_ft);
                }
            }
        }
    }
}

/// Everything about the run that stays fixed from launch to finish.
struct Run<'a> {
    vehicle: &'a Vehicle,
    env: &'a Environment,
    config: &'a KernelConfig,
    engine: EngineModel,
    rho_lbm_ft3: f64,
    tte: f64,
    launch_rpm: f64,
    pinned_rpm: f64,
    /// Launch acceleration (g), the reference for the step schedule.
    launch_ags_g: f64,
    base_step_s: f64,
    shift_step_s: f64,
    kp: f64,
}

/// Outcome of one step, before it is committed to the state.
struct Step {
    kin: KinematicState,
    start_t_s: f64,
    clamped: ClampOutcome,
    coupling: Coupling,
    driveshaft_rpm: f64,
    a_max_g: f64,
}

impl Run<'_> {
    fn c(&self) -> &PhysicsConstants {
        &self.config.constants
    }

    /// Engine power after the delivery multipliers at `t_s` on the launch clock.
    fn delivered_hp(&self, rpm: f64, t_s: f64, timer: &CourseTimer, diag: &mut Diagnostics) -> f64 {
        let vehicle = self.vehicle;
        let fuel = if self.config.fuel_ramps {
            fuel_factor(vehicle.fuel, t_s, self.env.track_temp_f)
        } else {
            1.0
        };
        diag.min_fuel = diag.min_fuel.min(fuel);
        diag.max_fuel = diag.max_fuel.max(fuel);
        let throttle = match timer.rollout_time() {
            Some(t_roll) => throttle_factor(vehicle.throttle_stop.as_ref(), t_s - t_roll),
            None => 1.0,
        };
        let extend = self.config.step.is_legacy();
        crank_power(&self.engine, rpm, self.config.legacy_f32_lookup, extend)
            * fuel
            * throttle
            * rev_limiter_factor(vehicle.drivetrain.rev_limiter_rpm, rpm, self.c().rev_limiter_cut)
    }

    /// Traction limit (g) with the load shifted by the acceleration `a_g` the step started at.
    fn traction_limit_g(&self, tire: &TireState, load: &RoadLoad, a_g: f64) -> f64 {
        let c = self.c();
        let vehicle = self.vehicle;
        let axle = transfer(
            vehicle,
            tire,
            a_g,
            load.drag_lb,
            load.downforce_lb,
            vehicle.drivetrain.transmission_efficiency,
            c,
        );
        let capacity =
            tractive_capacity_lb(vehicle, self.env.traction_index, self.tte, axle.rear_lb, c);
        max_acceleration_g(capacity, tire.growth, load.drag_lb, vehicle.weight_lb)
    }

    /// Rotating inertia reflected to the driveshaft in `gear` (lb·ft²).
    fn chassis_inertia(&self, gear: usize) -> f64 {
        let inertia = &self.vehicle.inertia;
        let dt = &self.vehicle.drivetrain;
        inertia.tires + inertia.transmission * dt.final_drive.powi(2) * dt.gear_ratio(gear).powi(2)
    }

    /// Engine inertia load `pe·N·ΔN`, reduced while the engine is slowing down.
    fn engine_inertia_load(&self, rpm: f64, rpm_prev: f64) -> f64 {
        let load = self.vehicle.inertia.engine * rpm * (rpm - rpm_prev);
        if load < 0.0 { load * self.kp } else { load }
    }

    /// One legacy step: pick the speed at the end of the step, then solve for its duration.
    fn legacy_step(
        &self,
        state: &SimState,
        step_no: u64,
        timer: &CourseTimer,
        diag: &mut Diagnostics,
    ) -> Step {
        let c = self.c();
        let gc = c.gc;
        let vehicle = self.vehicle;
        let drivetrain = &vehicle.drivetrain;
        let gear = state.gear;

        let nominal_s = if state.shifted {
            self.shift_step_s
        } else {
            scheduled_step_s(self.base_step_s, self.launch_ags_g, state.start_ags_g, step_no)
        };
        let jerk = state.jerk_g_s(c.jerk_min_g_s, c.jerk_max_g_s);

        let v0 = state.kin.v_fps;
        let a0 = state.ags_g;
        let s0 = state.kin.s_ft;
        let mut t0 = state.kin.t_s;
        let mut rpm0 = state.rpm;
        if step_no == 1 {
            rpm0 = self.pinned_rpm;
            t0 += slip_delay_s(vehicle.inertia.engine, self.launch_rpm, self.pinned_rpm);
        }

        let tire = TireState::evaluate(vehicle, v0, a0);
        let tire_slip = tire_slip_factor(self.env.traction_index, self.tte, s0);
        let reach = |dt: f64| v0 + a0 * gc * dt + jerk * gc * dt * dt / 2.0;

        let mut v1 = reach(nominal_s);
        if v1 < MAX_SPEED_LOSS * v0 && v0 > SPEED_LOSS_GUARD_FPS {
            v1 = v0;
        }
        v1 = v1.max(0.0);
        if !state.shifted {
            v1 = reach(cruise_step_s(nominal_s));
            // stop at the shift point so the next gear starts on time
            let shift_rpm = match &drivetrain.shift {
                ShiftPolicy::Rpm(points) => points.get(gear).copied(),
                ShiftPolicy::Time(_) => None,
            };
            if let Some(shift_rpm) = shift_rpm {
                if v0 > 0.0 && rpm0 > self.pinned_rpm && gear + 1 < drivetrain.gear_count() {
                    v1 = v1.min(v0 * (shift_rpm + SHIFT_OVERRUN_RPM) / rpm0);
                }
            }
        }

        let ds_rpm = driveshaft_rpm(v1, tire.circumference_ft, tire_slip);
        let lock = lock_rpm(ds_rpm, drivetrain.final_drive, drivetrain.gear_ratio(gear));
        let coupling = couple(&vehicle.launch, lock, gear, step_no);
        let rpm = coupling.engine_rpm;
        let hp_engine = self.delivered_hp(rpm, t0, timer, diag);

        let load = road_load(vehicle, self.env, &tire, self.rho_lbm_ft3, v1, s0, c);
        let a_max = self.traction_limit_g(&tire, &load, a0);
        let v_eff = v1.max(LAUNCH_SPEED_FPS);
        let efficiency =
            drivetrain.gear_efficiency(gear, c.gear_eff_min) * drivetrain.transmission_efficiency;
        let net_hp = |inertia_hp: f64, chassis_hp: f64| {
            ((hp_engine - inertia_hp) * coupling.factor * efficiency - chassis_hp) / tire_slip
                - load.drag_hp
        };
        let specific = |hp: f64| FT_LB_PER_HP * gc * hp / vehicle.weight_lb;

        let mut hp = net_hp(0.0, 0.0);
        let mut clamped = {
            let pqwt = specific(hp);
            clamp_acceleration(pqwt / (v_eff * gc), pqwt, a_max, v_eff, c)
        };
        let mut t1 = t0 + time_to_speed(clamped.pqwt, v0, v1);

        let engine_load = self.engine_inertia_load(rpm, rpm0);
        let chassis_load = (self.chassis_inertia(gear) * ds_rpm * (ds_rpm - state.driveshaft_rpm))
            .max(0.0);
        for k in 1..=MAX_TIME_ITERATIONS {
            let d1 = t1 - t0;
            if d1 <= 0.0 {
                break;
            }
            let work = (2.0 * PI_LEGACY / 60.0).powi(2) / (12.0 * FT_LB_PER_HP * d1);
            hp = net_hp(engine_load * work, chassis_load * work);
            let pqwt = specific(hp);
            let (ags, pqwt) = limit_jerk(pqwt / (v_eff * gc), pqwt, a0, d1, v_eff, c);
            clamped = clamp_acceleration(ags, pqwt, a_max, v_eff, c);
            let d2 = time_to_speed(clamped.pqwt, v0, v1);
            if k == MAX_TIME_ITERATIONS || (100.0 * (d2 - d1) / d2).abs() <= TIME_TOLERANCE_PCT {
                t1 = t0 + d2;
                break;
            }
            let relax = if hp_engine > 0.0 {
                (hp / hp_engine).clamp(c.relax_min, c.relax_max)
            } else {
                1.0
            };
            t1 = t0 + d1 + relax * (d2 - d1);
        }

        let mut kin = KinematicState {
            t_s: t0,
            v_fps: v0,
            s_ft: s0,
        };
        advance_at_power(&mut kin, clamped.pqwt, v1, t1 - t0);
        Step {
            kin,
            start_t_s: t0,
            clamped,
            coupling,
            driveshaft_rpm: ds_rpm,
            a_max_g: a_max,
        }
    }

    /// One fixed step of `dt` with semi-implicit Euler.
    fn fixed_step(
        &self,
        state: &SimState,
        step_no: u64,
        dt: f64,
        timer: &CourseTimer,
        diag: &mut Diagnostics,
    ) -> Step {
        let c = self.c();
        let gc = c.gc;
        let vehicle = self.vehicle;
        let drivetrain = &vehicle.drivetrain;
        let gear = state.gear;
        let kin = state.kin;
        let rpm_prev = if step_no == 1 { self.pinned_rpm } else { state.rpm };

        let tire = TireState::evaluate(vehicle, kin.v_fps, state.ags_g);
        let tire_slip = tire_slip_factor(self.env.traction_index, self.tte, kin.s_ft);
        let ds_rpm = driveshaft_rpm(kin.v_fps, tire.circumference_ft, tire_slip);
        let lock = lock_rpm(ds_rpm, drivetrain.final_drive, drivetrain.gear_ratio(gear));
        let coupling = couple(&vehicle.launch, lock, gear, step_no);
        let rpm = coupling.engine_rpm;

        let load = road_load(vehicle, self.env, &tire, self.rho_lbm_ft3, kin.v_fps, kin.s_ft, c);
        let a_max = self.traction_limit_g(&tire, &load, state.ags_g);
        let v_eff = kin.v_fps.max(Z5);

        let (ags, pqwt) = if in_bootstrap(step_no, lock) {
            let torque = crank_torque(&self.engine, self.pinned_rpm, self.config.legacy_f32_lookup);
            let ags = launch_acceleration_g(vehicle, torque, gear, tire_slip, load.drag_lb, c);
            (ags, ags * gc * v_eff)
        } else {
            let hp_engine = self.delivered_hp(rpm, kin.t_s, timer, diag);
            let work = (2.0 * PI_LEGACY / 60.0).powi(2) / (12.0 * FT_LB_PER_HP * dt);
            let engine_load = self.engine_inertia_load(rpm, rpm_prev);
            let chassis_load =
                (self.chassis_inertia(gear) * ds_rpm * (ds_rpm - state.driveshaft_rpm)).max(0.0);
            let efficiency = drivetrain.gear_efficiency(gear, c.gear_eff_min)
                * drivetrain.transmission_efficiency;
            let hp = ((hp_engine - engine_load * work) * coupling.factor * efficiency
                - chassis_load * work)
                / tire_slip
                - load.drag_hp;
            let pqwt = FT_LB_PER_HP * gc * hp / vehicle.weight_lb;
            limit_jerk(pqwt / (v_eff * gc), pqwt, state.ags_g, dt, v_eff, c)
        };
        let clamped = clamp_acceleration(ags, pqwt, a_max, v_eff, c);

        let mut next = kin;
        advance(dt, &mut next, clamped.ags_g * gc);
        Step {
            kin: next,
            start_t_s: kin.t_s,
            clamped,
            coupling,
            driveshaft_rpm: ds_rpm,
            a_max_g: a_max,
        }
    }
}

pub fn simulate_with(
    config: &KernelConfig,
    options: &SimOptions,
    vehicle: &Vehicle,
    env: &Environment,
    length: RaceLength,
) -> Result<SimResult, SimError> {
    vehicle.validate()?;
    env.validate()?;
    let c = &config.constants;

    let air = air_density(env);
    let hp_divisor = hp_correction_divisor(env, vehicle.fuel_system());
    let expanded = quarter_jr::expand(vehicle, hp_divisor);
    let vehicle = &expanded;
    let engine = EngineModel::new(&vehicle.power, vehicle.hp_torque_mult, 1.0 / hp_divisor)?;
    let sheet = EngineModel::new(&vehicle.power, 1.0, 1.0)?;
    let tte = track_temp_effect(env.track_temp_f);
    let converter = vehicle.launch.is_converter();

    let rollout_in = vehicle.rollout_in.unwrap_or(c.default_rollout_in);
    let overhang_in = vehicle
        .chassis
        .overhang_in
        .unwrap_or_else(|| vehicle.chassis.body_style.aero().overhang_in);
    let mut timer = CourseTimer::new(length, Staging::new(rollout_in, overhang_in));
    let mut shifter = ShiftController::new(&vehicle.drivetrain);
    let step_limit = config.step_limit();

    let leave_rpm = launch_rpm(vehicle);
    let launch_ags_g = {
        let drag_lb = launch_drag_lb(vehicle, env, air.rho_lbm_ft3, c);
        let slip = tire_slip_factor(env.traction_index, tte, 0.0);
        let hp = crank_power(&engine, leave_rpm, config.legacy_f32_lookup, config.step.is_legacy());
        let torque = launch_torque(hp, leave_rpm);
        let ags = launch_acceleration_g(vehicle, torque, 0, slip, drag_lb, c);
        let a_max = static_max_acceleration_g(vehicle, env, tte, drag_lb, c);
        ags.min(a_max).max(c.a_min_g)
    };
    let run = Run {
        vehicle,
        env,
        config,
        rho_lbm_ft3: air.rho_lbm_ft3,
        tte,
        launch_rpm: leave_rpm,
        pinned_rpm: vehicle.launch.pinned_rpm(),
        launch_ags_g,
        base_step_s: base_step_s(
            sheet.power_hp_extended(leave_rpm, false),
            vehicle.launch.torque_mult(),
            vehicle.weight_lb,
        ),
        shift_step_s: if converter {
            c.shift_step_converter_s
        } else {
            c.shift_step_clutch_s
        },
        kp: if converter { c.kp_converter } else { c.kp_clutch },
        engine,
    };

    let mut state = match config.step {
        StepMode::Legacy => SimState::launch(leave_rpm, LAUNCH_SPEED_FPS, launch_ags_g),
        StepMode::Fixed { .. } => SimState::launch(leave_rpm, 0.0, launch_ags_g),
    };
    debug!(
        vehicle = %vehicle.id,
        %length,
        hp_divisor,
        ags0_g = launch_ags_g,
        base_step_s = run.base_step_s,
        step = ?config.step,
        "starting run"
    );

    let mut diag = Diagnostics::new();
    let mut traces = options.record_traces.then(Vec::new);
    let stop_ft = length.length_ft() + config.overrun_ft;

    let reason = loop {
        if timer.last().d_ft >= stop_ft {
            break TerminationReason::Distance;
        }
        if config.cancel_check_interval > 0 && state.step % config.cancel_check_interval == 0 {
            if let Some(token) = &options.cancel {
                if token.is_cancelled() {
                    warn!(vehicle = %vehicle.id, step = state.step, "run cancelled");
                    state.warn(warnings::CANCELLED);
                    break TerminationReason::Cancelled;
                }
            }
        }
        if state.kin.t_s >= config.max_time_s {
            if timer.finished() {
                break TerminationReason::Distance;
            }
            warn!(vehicle = %vehicle.id, s_ft = state.kin.s_ft, "run exceeded the time limit");
            state.warn(warnings::MAX_TIME_EXCEEDED);
            break TerminationReason::Timeout;
        }
        if state.step >= step_limit {
            if timer.finished() {
                break TerminationReason::Distance;
            }
            warn!(vehicle = %vehicle.id, s_ft = state.kin.s_ft, "run exceeded the step limit");
            state.warn(warnings::MAX_STEPS_EXCEEDED);
            break TerminationReason::Timeout;
        }

        let step_no = state.step + 1;
        let step = match config.step {
            StepMode::Legacy => run.legacy_step(&state, step_no, &timer, &mut diag),
            StepMode::Fixed { dt_s } => run.fixed_step(&state, step_no, dt_s, &timer, &mut diag),
        };

        if step.clamped.slipped && !state.tire_slip {
            state.tire_slip = true;
            state.warn(warnings::TIRE_SLIP);
            debug!(
                t_s = step.kin.t_s,
                s_ft = step.kin.s_ft,
                a_max_g = step.a_max_g,
                "tires broke loose"
            );
        }
        diag.record(&vehicle.launch, &step.coupling, step.kin.s_ft);

        state.kin = step.kin;
        state.start_t_s = step.start_t_s;
        state.start_ags_g = state.ags_g;
        state.ags_g = step.clamped.ags_g;
        state.rpm = step.coupling.engine_rpm;
        state.driveshaft_rpm = step.driveshaft_rpm;
        state.shifted = false;
        state.step = step_no;
        let point = timer.observe(&state.kin);

        if let Some(samples) = traces.as_mut() {
            samples.push(trace_sample(&point, &state));
        }

        if let Some(event) = shifter.update(state.kin.t_s, state.rpm) {
            state.gear = event.to;
            state.shifted = true;
            state.last_shift_s = event.t_s;
            debug!(
                from = event.from + 1,
                to = event.to + 1,
                t_s = event.t_s,
                rpm = event.rpm,
                "shift"
            );
        }
    };

    let times = timer.finish();
    let et_s = times.et_s.unwrap_or(state.kin.t_s - times.t_roll_s);
    let mph = times.trap_mph(length).unwrap_or(state.kin.v_fps * Z5);
    debug!(vehicle = %vehicle.id, et_s, mph, steps = state.step, ?reason, "run complete");

    let converter = match vehicle.launch {
        LaunchDevice::Converter { .. } if diag.converter_steps > 0 => {
            let n = diag.converter_steps as f64;
            Some(ConverterDiagnostics {
                avg_torque_ratio: diag.sum_torque_ratio / n,
                avg_slip_ratio: diag.sum_slip_ratio / n,
                peak_effective_stall_rpm: diag.peak_stall,
            })
        }
        _ => None,
    };
    let clutch = match vehicle.launch {
        LaunchDevice::Clutch { .. } => Some(ClutchDiagnostics {
            min_coupling: diag.min_coupling,
            lockup_at_ft: diag.lockup_at_ft,
        }),
        LaunchDevice::Converter { .. } => None,
    };

    Ok(SimResult {
        et_s,
        mph,
        timeslip: times.timeslip.clone(),
        traces,
        meta: SimMeta {
            model: ModelId::RsaClassic,
            steps: state.step,
            warnings: state.warnings,
            window_mph: times.window_mph,
            finish_mph: times.finish_mph,
            converter,
            clutch,
            rollout: Some(RolloutDiagnostics {
                rollout_in,
                t_roll_s: times.t_roll_s,
            }),
            fuel: Some(FuelDiagnostics {
                fuel: vehicle.fuel,
                min_scale: diag.min_fuel,
                max_scale: diag.max_fuel,
            }),
            termination: Some(Termination {
                reason,
                steps: state.step,
                t_s: state.kin.t_s,
                target_ft: length.length_ft(),
            }),
        },
    })
}

fn trace_sample(point: &TrackPoint, state: &SimState) -> TraceSample {
    TraceSample {
        t_s: point.t_s,
        v_mph: point.v_fps * Z5,
        a_g: state.ags_g,
        s_ft: point.d_ft,
        rpm: state.rpm,
        gear: state.gear + 1,
    }
}
