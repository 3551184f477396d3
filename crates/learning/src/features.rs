//! Feature vector for the ET residual model.

use dragstrip_atmosphere::density_altitude_ft;
use dragstrip_vehicle::{Environment, Vehicle};

pub const FEATURE_DIM: usize = 5;

/// `[DA/1000, weight/3000, tire diameter/30, final drive/4, (ET − 10)/5]`, each scaled to be
/// of order one for typical cars.
pub fn extract(vehicle: &Vehicle, env: &Environment, physics_et_s: f64) -> [f64; FEATURE_DIM] {
    [
        density_altitude_ft(env) / 1000.0,
        vehicle.weight_lb / 3000.0,
        vehicle.tire_diameter_in() / 30.0,
        vehicle.drivetrain.final_drive / 4.0,
        (physics_et_s - 10.0) / 5.0,
    ]
}
