//! Tunable constants consumed by the kernel.
//!
//! Values default to the legacy calculator's calibration. Callers inject an instance rather than
//! relying on module-level statics, so a run can be repeated with alternate calibrations.

use serde::{Deserialize, Serialize};

/// Calibration constants for the drag-race kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConstants {
    /// Gravitational constant (ft/s²).
    pub gc: f64,
    /// Minimum allowed acceleration (g).
    pub a_min_g: f64,
    /// Most negative allowed jerk (g/s).
    pub jerk_min_g_s: f64,
    /// Most positive allowed jerk (g/s).
    pub jerk_max_g_s: f64,
    /// Traction coefficient scale.
    pub traction_ax: f64,
    /// Traction load-sensitivity base term.
    pub traction_k6: f64,
    /// Traction load-sensitivity slope term.
    pub traction_k61: f64,
    /// Reference rear-axle load for traction scaling (lbf).
    pub traction_ref_load_lb: f64,
    /// Exponent on the rear-load ratio.
    pub traction_load_exp: f64,
    /// Rolling-resistance coefficient at the starting line.
    pub rolling_cmu: f64,
    /// Reduction of the rolling coefficient over a quarter mile.
    pub rolling_cmuk: f64,
    /// Speed-proportional rolling term (per mph).
    pub rolling_speed_coef: f64,
    /// Axle torque reaction factor in the weight-transfer model.
    pub weight_transfer_frct: f64,
    /// Engine inertia recovery factor on a clutch car.
    pub kp_clutch: f64,
    /// Engine inertia recovery factor on a converter car.
    pub kp_converter: f64,
    /// Length of the step that engages a new gear with a clutch (s).
    pub shift_step_clutch_s: f64,
    /// Length of the step that engages a new gear with a converter (s).
    pub shift_step_converter_s: f64,
    /// Bounds on the relaxation factor of the step-time iteration.
    pub relax_min: f64,
    pub relax_max: f64,
    /// Lower bound applied to per-gear efficiency.
    pub gear_eff_min: f64,
    /// Power multiplier applied at or above the rev limiter.
    pub rev_limiter_cut: f64,
    /// Launch torque scale on a converter car.
    pub launch_k_converter: f64,
    /// Launch torque scale on a clutch car.
    pub launch_k_clutch: f64,
    /// Rollout distance assumed when a vehicle omits it (in).
    pub default_rollout_in: f64,
    /// Static front weight fraction assumed when a vehicle omits it.
    pub default_front_weight_frac: f64,
    /// CG height above the tire radius assumed when a vehicle omits it (in).
    pub default_cg_above_axle_in: f64,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            gc: crate::constants::GC,
            a_min_g: 0.004,
            jerk_min_g_s: -4.0,
            jerk_max_g_s: 2.0,
            traction_ax: 10.8,
            traction_k6: 0.92,
            traction_k61: 0.08,
            traction_ref_load_lb: 1900.0,
            traction_load_exp: 2.15,
            rolling_cmu: 0.025,
            rolling_cmuk: 0.01,
            rolling_speed_coef: 0.0001,
            weight_transfer_frct: 1.03,
            kp_clutch: 0.15,
            kp_converter: 0.25,
            shift_step_clutch_s: 0.2,
            shift_step_converter_s: 0.25,
            relax_min: 0.92,
            relax_max: 1.08,
            gear_eff_min: 0.9,
            rev_limiter_cut: 0.05,
            launch_k_converter: 0.96,
            launch_k_clutch: 0.88,
            default_rollout_in: 12.0,
            default_front_weight_frac: 0.38,
            default_cg_above_axle_in: 3.75,
        }
    }
}
