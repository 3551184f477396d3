//! Longitudinal weight transfer.

use dragstrip_core::PhysicsConstants;
use dragstrip_vehicle::Vehicle;

use crate::tire::TireState;

/// Dynamic axle loads (lbf).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxleLoads {
    pub front_lb: f64,
    pub rear_lb: f64,
    /// Load carried by the wheelie bar once the front end is light.
    pub wheelie_bar_lb: f64,
}

/// Shift load rearward under acceleration `a_g` and drag `drag_lb`. `downforce_lb` is the total
/// vertical load; `efficiency` is the overall driveline efficiency used in the axle-torque term.
pub fn transfer(
    vehicle: &Vehicle,
    tire: &TireState,
    a_g: f64,
    drag_lb: f64,
    downforce_lb: f64,
    efficiency: f64,
    constants: &PhysicsConstants,
) -> AxleLoads {
    let wheelbase = vehicle.chassis.wheelbase_in;
    let cg = vehicle.cg_height_in(constants.default_cg_above_axle_in);
    let r = tire.radius_in();
    let eff = if efficiency > 0.0 { efficiency } else { 1.0 };
    let moment = a_g * vehicle.weight_lb * ((cg - r) + constants.weight_transfer_frct / eff * r)
        + drag_lb * cg;
    let static_front = vehicle.static_front_weight_lb(constants.default_front_weight_frac);
    let mut front = static_front - moment / wheelbase;
    let mut wheelie_bar = 0.0;
    if front < 0.0 {
        wheelie_bar = -front * wheelbase / 64.0;
        front = 0.0;
    }
    let mut rear = downforce_lb - front - wheelie_bar;
    if rear < 0.0 {
        rear = vehicle.weight_lb;
    }
    AxleLoads {
        front_lb: front,
        rear_lb: rear,
        wheelie_bar_lb: wheelie_bar,
    }
}
