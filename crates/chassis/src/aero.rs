//! Aerodynamic drag, downforce, and rolling resistance.

use dragstrip_core::PhysicsConstants;
use dragstrip_core::constants::{FT_LB_PER_HP, QUARTER_MILE_FT, Z5};
use dragstrip_vehicle::{Environment, Vehicle};

use crate::tire::TireState;

/// Resisting loads at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadLoad {
    /// Airspeed including the wind vector (ft/s).
    pub airspeed_fps: f64,
    /// Dynamic pressure (lbf/ft²).
    pub q_psf: f64,
    /// Vertical load on the tires: weight plus aerodynamic downforce (lbf).
    pub downforce_lb: f64,
    pub rolling_lb: f64,
    pub aero_drag_lb: f64,
    /// Total resisting force (lbf).
    pub drag_lb: f64,
    pub drag_hp: f64,
}

/// Airspeed for ground speed `v_fps` with wind at `angle_deg` (0° = headwind).
pub fn airspeed_fps(v_fps: f64, wind_mph: f64, angle_deg: f64) -> f64 {
    let w = wind_mph / Z5;
    let cos = angle_deg.to_radians().cos();
    (v_fps * v_fps + 2.0 * v_fps * w * cos + w * w).max(0.0).sqrt()
}

/// Dynamic pressure for density `rho_lbm_ft3` (lbf/ft²).
#[inline]
pub fn dynamic_pressure(rho_lbm_ft3: f64, airspeed_fps: f64, gc: f64) -> f64 {
    rho_lbm_ft3 * airspeed_fps * airspeed_fps / (2.0 * gc)
}

/// Rolling coefficient, falling linearly as the tires warm over the course.
#[inline]
pub fn rolling_coefficient(distance_ft: f64, constants: &PhysicsConstants) -> f64 {
    constants.rolling_cmu - distance_ft / QUARTER_MILE_FT * constants.rolling_cmuk
}

pub fn road_load(
    vehicle: &Vehicle,
    env: &Environment,
    tire: &TireState,
    rho_lbm_ft3: f64,
    v_fps: f64,
    distance_ft: f64,
    constants: &PhysicsConstants,
) -> RoadLoad {
    let airspeed = airspeed_fps(v_fps, env.wind_mph, env.wind_angle_deg);
    let q = dynamic_pressure(rho_lbm_ft3, airspeed, constants.gc);
    let area = tire.frontal_area_ft2;
    let downforce = vehicle.weight_lb + vehicle.aero.cl * area * q;
    let rolling = rolling_coefficient(distance_ft, constants) * downforce
        + constants.rolling_speed_coef * downforce * (Z5 * v_fps);
    let aero_drag = vehicle.aero.cd * area * q;
    let drag = rolling + aero_drag;
    RoadLoad {
        airspeed_fps: airspeed,
        q_psf: q,
        downforce_lb: downforce,
        rolling_lb: rolling,
        aero_drag_lb: aero_drag,
        drag_lb: drag,
        drag_hp: drag * v_fps / FT_LB_PER_HP,
    }
}
