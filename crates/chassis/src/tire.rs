//! Tire growth and squat.
//!
//! Slicks grow with speed and squat under load. The effective rolling circumference sets the
//! driveline speed ratio; the grown section adds frontal area.

use dragstrip_core::constants::PI_LEGACY;
use dragstrip_vehicle::Vehicle;

/// Speed-dependent tire geometry for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TireState {
    /// Diameter growth factor (>= 1).
    pub growth: f64,
    /// Growth less squat under acceleration.
    pub squat: f64,
    /// Effective rolling circumference (ft).
    pub circumference_ft: f64,
    /// Frontal area including tire growth (ft²).
    pub frontal_area_ft2: f64,
}

/// Growth compliance of a slick; wide, tall-sidewall tires grow more.
pub fn growth_coefficient(width_in: f64, diameter_in: f64) -> f64 {
    (width_in.powf(1.4) + diameter_in - 16.0) / (0.171 * diameter_in.powf(1.7))
}

/// Diameter growth factor at `v_fps`: the smaller of a power-law and a linear fit.
pub fn growth(width_in: f64, diameter_in: f64, v_fps: f64) -> f64 {
    let k = growth_coefficient(width_in, diameter_in);
    let v = v_fps.max(0.0);
    let power_law = 1.0 + k * 1.35e-5 * v.powf(1.6);
    let linear = 1.0 + k * 0.00035 * v;
    power_law.min(linear).max(1.0)
}

impl TireState {
    /// Evaluate at speed `v_fps` with the previous step's acceleration `a_g`.
    pub fn evaluate(vehicle: &Vehicle, v_fps: f64, a_g: f64) -> Self {
        let dia = vehicle.tire_diameter_in();
        let growth = growth(vehicle.tires.width_in, dia, v_fps);
        let squat = growth - 0.035 * a_g.abs();
        let circumference_ft = squat * dia * PI_LEGACY / 12.0;
        let tire_faces = if vehicle.is_motorcycle() { 1.0 } else { 2.0 };
        let added_area =
            (growth - 1.0) * dia / 2.0 * tire_faces * vehicle.tires.width_in / 144.0;
        Self {
            growth,
            squat,
            circumference_ft,
            frontal_area_ft2: vehicle.aero.frontal_area_ft2 + added_area,
        }
    }

    /// Rolling radius (in).
    pub fn radius_in(&self) -> f64 {
        12.0 * self.circumference_ft / (2.0 * PI_LEGACY)
    }
}
