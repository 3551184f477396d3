//! Traction limit, jerk limiter, and the acceleration clamp.
//!
//! Accelerations are in g. `pqwt` is the specific power term `550·gc·HP/W`; it stays consistent
//! with acceleration through `ags = pqwt / (v·gc)`.

use dragstrip_core::PhysicsConstants;
use dragstrip_vehicle::Vehicle;

/// Base traction coefficient for track prep and temperature.
#[inline]
pub fn traction_coefficient(traction_index: f64, track_temp_effect: f64) -> f64 {
    (1.0 - (traction_index - 1.0) * 0.01) / track_temp_effect.powf(0.25)
}

/// Tractive force the rear tires can carry at rear load `rear_lb` (lbf).
pub fn tractive_capacity_lb(
    vehicle: &Vehicle,
    traction_index: f64,
    track_temp_effect: f64,
    rear_lb: f64,
    constants: &PhysicsConstants,
) -> f64 {
    let caxi = traction_coefficient(traction_index, track_temp_effect);
    let load = (rear_lb / constants.traction_ref_load_lb).max(0.0);
    let capacity = caxi
        * constants.traction_ax
        * vehicle.tire_diameter_in()
        * (vehicle.tires.width_in + 1.0)
        * (constants.traction_k6 + constants.traction_k61 * load.powf(constants.traction_load_exp));
    if vehicle.is_motorcycle() {
        0.5 * capacity
    } else {
        capacity
    }
}

/// Maximum acceleration (g) before the tires break loose.
#[inline]
pub fn max_acceleration_g(capacity_lb: f64, tire_growth: f64, drag_lb: f64, weight_lb: f64) -> f64 {
    (capacity_lb / tire_growth - drag_lb) / weight_lb
}

/// Bound the change in acceleration to `[jerk_min, jerk_max]` g/s. Returns the limited
/// `(ags, pqwt)` pair; `v_fps` is the (floored) speed used to keep `pqwt` consistent.
pub fn limit_jerk(
    ags_g: f64,
    pqwt: f64,
    ags_prev_g: f64,
    dt: f64,
    v_fps: f64,
    constants: &PhysicsConstants,
) -> (f64, f64) {
    if dt <= 0.0 {
        return (ags_g, pqwt);
    }
    let jerk = (ags_g - ags_prev_g) / dt;
    let bound = if jerk < constants.jerk_min_g_s {
        constants.jerk_min_g_s
    } else if jerk > constants.jerk_max_g_s {
        constants.jerk_max_g_s
    } else {
        return (ags_g, pqwt);
    };
    let ags = ags_prev_g + bound * dt;
    (ags, ags * constants.gc * v_fps)
}

/// Result of the traction clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampOutcome {
    pub ags_g: f64,
    pub pqwt: f64,
    /// The proposal exceeded the traction limit.
    pub slipped: bool,
}

/// Clamp a proposed acceleration into `[a_min, a_max]`.
///
/// Excess over `a_max` is reflected back below it (`2·a_max − ags`) rather than saturated,
/// reproducing the legacy tire-shake penalty; a reflection that lands under `a_min` is raised
/// to `a_min`. A proposal already inside the band is returned untouched.
pub fn clamp_acceleration(
    ags_g: f64,
    pqwt: f64,
    a_max_g: f64,
    v_fps: f64,
    constants: &PhysicsConstants,
) -> ClampOutcome {
    let mut ags = ags_g;
    let mut pqwt = pqwt;
    let mut slipped = false;
    if ags > a_max_g {
        slipped = true;
        let reflected = a_max_g - (ags - a_max_g);
        if ags != 0.0 {
            pqwt *= reflected / ags;
        }
        ags = reflected;
    }
    if ags < constants.a_min_g {
        ags = constants.a_min_g;
        pqwt = constants.a_min_g * constants.gc * v_fps;
    }
    ClampOutcome {
        ags_g: ags,
        pqwt,
        slipped,
    }
}
