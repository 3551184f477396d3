use approx::assert_relative_eq;
use dragstrip_chassis::aero::{airspeed_fps, road_load, rolling_coefficient};
use dragstrip_chassis::traction::{max_acceleration_g, tractive_capacity_lb, traction_coefficient};
use dragstrip_chassis::{TireState, clamp_acceleration, limit_jerk, tire, weight};
use dragstrip_core::PhysicsConstants;
use dragstrip_core::constants::PI_LEGACY;
use dragstrip_vehicle::*;

fn super_gas() -> Vehicle {
    Vehicle {
        id: "supergas".into(),
        name: "Super Gas".into(),
        weight_lb: 2300.0,
        chassis: Chassis {
            wheelbase_in: 103.0,
            ..Chassis::default()
        },
        tires: Tires {
            diameter_in: 32.4,
            width_in: 14.4,
            rollout_in: None,
        },
        aero: Aero {
            cd: 0.4,
            cl: 0.25,
            frontal_area_ft2: 22.1,
        },
        drivetrain: Drivetrain {
            final_drive: 5.14,
            gear_ratios: vec![1.76, 1.0],
            gear_efficiencies: vec![0.97, 0.99],
            transmission_efficiency: 0.97,
            shift: ShiftPolicy::Rpm(vec![7600.0]),
            rev_limiter_rpm: None,
        },
        launch: LaunchDevice::Converter {
            launch_rpm: 5000.0,
            stall_rpm: 5500.0,
            slippage: 1.06,
            torque_mult: 1.7,
            lockup: false,
            diameter_in: Some(10.0),
        },
        power: PowerSource::Flat { hp: 700.0 },
        hp_torque_mult: 1.0,
        inertia: Inertia::default(),
        fuel: FuelType::Gas,
        induction: Induction::Carbureted,
        rollout_in: None,
        throttle_stop: None,
    }
}

#[test]
fn tires_grow_with_speed_and_squat_under_load() {
    let v = super_gas();
    assert_eq!(tire::growth(14.4, 32.4, 0.0), 1.0);
    let slow = tire::growth(14.4, 32.4, 50.0);
    let fast = tire::growth(14.4, 32.4, 200.0);
    assert!(fast > slow && slow > 1.0);
    assert!(fast < 1.1, "growth stays modest: {fast}");

    let at_rest = TireState::evaluate(&v, 0.0, 0.0);
    assert_relative_eq!(at_rest.circumference_ft, 32.4 * PI_LEGACY / 12.0, epsilon = 1e-12);
    assert_eq!(at_rest.frontal_area_ft2, 22.1);
    let loaded = TireState::evaluate(&v, 0.0, 1.0);
    assert!(loaded.circumference_ft < at_rest.circumference_ft);
    let grown = TireState::evaluate(&v, 200.0, 0.0);
    assert!(grown.frontal_area_ft2 > 22.1);
}

#[test]
fn wind_adds_or_removes_airspeed() {
    assert_relative_eq!(airspeed_fps(100.0, 0.0, 0.0), 100.0, epsilon = 1e-12);
    let head = airspeed_fps(100.0, 15.0, 0.0);
    let tail = airspeed_fps(100.0, 15.0, 180.0);
    assert_relative_eq!(head, 100.0 + 22.0, epsilon = 1e-9);
    assert_relative_eq!(tail, 100.0 - 22.0, epsilon = 1e-9);
}

#[test]
fn road_load_grows_with_speed() {
    let v = super_gas();
    let env = Environment::default();
    let c = PhysicsConstants::default();
    let tire = TireState::evaluate(&v, 0.0, 0.0);
    let rest = road_load(&v, &env, &tire, 0.0765, 0.0, 0.0, &c);
    assert_relative_eq!(rest.drag_lb, 0.025 * 2300.0, epsilon = 1e-9);
    assert_eq!(rest.drag_hp, 0.0);
    let fast = road_load(&v, &env, &tire, 0.0765, 180.0, 1000.0, &c);
    assert!(fast.aero_drag_lb > 200.0);
    assert!(fast.downforce_lb > 2300.0);
    assert!(fast.drag_hp > 0.0);
    assert!(rolling_coefficient(1320.0, &c) < rolling_coefficient(0.0, &c));
}

#[test]
fn acceleration_shifts_load_rearward() {
    let v = super_gas();
    let c = PhysicsConstants::default();
    let tire = TireState::evaluate(&v, 0.0, 0.0);
    let still = weight::transfer(&v, &tire, 0.0, 0.0, 2300.0, 0.97, &c);
    assert_relative_eq!(still.front_lb, 0.38 * 2300.0, epsilon = 1e-9);
    assert_relative_eq!(still.rear_lb, 0.62 * 2300.0, epsilon = 1e-9);
    let launch = weight::transfer(&v, &tire, 1.2, 60.0, 2300.0, 0.97, &c);
    assert!(launch.rear_lb > still.rear_lb);
    let wheelie = weight::transfer(&v, &tire, 4.0, 60.0, 2300.0, 0.97, &c);
    assert_eq!(wheelie.front_lb, 0.0);
    assert!(wheelie.wheelie_bar_lb > 0.0);
}

#[test]
fn traction_limit_rewards_prep_and_load() {
    let v = super_gas();
    let c = PhysicsConstants::default();
    assert_eq!(traction_coefficient(1.0, 1.0), 1.0);
    assert!(traction_coefficient(5.0, 1.0) < 1.0);
    let light = tractive_capacity_lb(&v, 3.0, 1.0, 1200.0, &c);
    let heavy = tractive_capacity_lb(&v, 3.0, 1.0, 1900.0, &c);
    assert!(heavy > light);
    let mut bike = v.clone();
    bike.chassis.body_style = BodyStyle::Motorcycle;
    assert_relative_eq!(tractive_capacity_lb(&bike, 3.0, 1.0, 1900.0, &c), heavy / 2.0, epsilon = 1e-9);
    let a_max = max_acceleration_g(heavy, 1.0, 50.0, 2300.0);
    assert!(a_max > 1.0 && a_max < 4.0, "a_max {a_max}");
}

#[test]
fn clamp_is_idempotent_inside_band() {
    let c = PhysicsConstants::default();
    let out = clamp_acceleration(1.2, 1234.5, 2.0, 50.0, &c);
    assert_eq!((out.ags_g, out.pqwt, out.slipped), (1.2, 1234.5, false));
    let again = clamp_acceleration(out.ags_g, out.pqwt, 2.0, 50.0, &c);
    assert_eq!(again, out);
}

#[test]
fn clamp_reflects_excess_and_floors_at_minimum() {
    let c = PhysicsConstants::default();
    let out = clamp_acceleration(2.5, 250.0, 2.0, 50.0, &c);
    assert!(out.slipped);
    assert_relative_eq!(out.ags_g, 1.5, epsilon = 1e-12);
    assert_relative_eq!(out.pqwt, 150.0, epsilon = 1e-9);

    let floored = clamp_acceleration(5.0, 500.0, 2.0, 50.0, &c);
    assert_eq!(floored.ags_g, c.a_min_g);
    assert_relative_eq!(floored.pqwt, c.a_min_g * c.gc * 50.0, epsilon = 1e-12);
}

#[test]
fn jerk_limiter_bounds_the_change() {
    let c = PhysicsConstants::default();
    let (ags, pqwt) = limit_jerk(1.0, 99.0, 0.99, 0.002, 10.0, &c);
    assert_relative_eq!(ags, 0.994, epsilon = 1e-12);
    assert_relative_eq!(pqwt, 0.994 * c.gc * 10.0, epsilon = 1e-9);
    let (ags, _) = limit_jerk(0.0, 0.0, 1.0, 0.002, 10.0, &c);
    assert_relative_eq!(ags, 0.992, epsilon = 1e-12);
    assert_eq!(limit_jerk(1.001, 7.0, 1.0, 0.002, 10.0, &c), (1.001, 7.0));
}
