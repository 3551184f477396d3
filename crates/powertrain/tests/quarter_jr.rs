use approx::assert_relative_eq;
use dragstrip_powertrain::quarter_jr::{
    RPM_FRACTIONS, clutch_slippage, converter_fit, expand, gear_efficiencies, inertia,
    power_curve, specific_output,
};
use dragstrip_vehicle::*;

fn et_racer() -> Vehicle {
    Vehicle {
        id: "etracer".into(),
        name: "ET Racer".into(),
        weight_lb: 3600.0,
        chassis: Chassis {
            wheelbase_in: 108.0,
            body_style: BodyStyle::Sedan,
            ..Chassis::default()
        },
        tires: Tires {
            diameter_in: 28.0,
            width_in: 10.0,
            rollout_in: None,
        },
        aero: Aero {
            cd: 0.0,
            cl: 0.0,
            frontal_area_ft2: 26.1,
        },
        drivetrain: Drivetrain {
            final_drive: 4.11,
            gear_ratios: vec![2.48, 1.48, 1.0],
            gear_efficiencies: Vec::new(),
            transmission_efficiency: 0.97,
            shift: ShiftPolicy::Rpm(vec![6000.0]),
            rev_limiter_rpm: None,
        },
        launch: LaunchDevice::Converter {
            launch_rpm: 3000.0,
            stall_rpm: 3000.0,
            slippage: 1.0,
            torque_mult: 1.0,
            lockup: false,
            diameter_in: None,
        },
        power: PowerSource::QuarterJr(QuarterJrRating {
            peak_hp: 325.0,
            peak_rpm: 5800.0,
            displacement_cid: 350.0,
        }),
        hp_torque_mult: 1.0,
        inertia: Inertia::default(),
        fuel: FuelType::Gas,
        induction: Induction::Carbureted,
        rollout_in: Some(14.0),
        throttle_stop: None,
    }
}

fn rating(peak_hp: f64, peak_rpm: f64, displacement_cid: f64) -> QuarterJrRating {
    QuarterJrRating {
        peak_hp,
        peak_rpm,
        displacement_cid,
    }
}

#[test]
fn synthesized_curve_peaks_at_the_rating() {
    let curve = power_curve(&rating(325.0, 5800.0, 350.0), FuelSystem::default());
    assert_eq!(curve.len(), RPM_FRACTIONS.len());
    let peak = &curve[10];
    assert_eq!(peak.rpm, 5800.0);
    assert_relative_eq!(peak.hp.unwrap_or(0.0), 325.0, epsilon = 1e-9);
    assert_relative_eq!(curve[0].rpm, 1450.0, epsilon = 1e-9);
    // 0.93 hp/cid sits between the two mildest families
    assert_relative_eq!(curve[0].hp.unwrap_or(0.0), 36.933929, epsilon = 1e-5);
}

#[test]
fn specific_output_is_normalized_and_clamped() {
    let gas = FuelSystem::new(FuelType::Gas, Induction::Carbureted);
    let blown = FuelSystem::new(FuelType::Gas, Induction::Supercharged);
    assert_relative_eq!(specific_output(&rating(760.0, 6500.0, 500.0), gas), 1.52);
    assert_eq!(specific_output(&rating(100.0, 6500.0, 500.0), gas), 0.7);
    assert_eq!(specific_output(&rating(100.0, 6500.0, 500.0), blown), 1.2);
    assert_eq!(specific_output(&rating(5000.0, 6500.0, 500.0), gas), 3.4);
}

#[test]
fn blown_nitro_uses_its_own_shape() {
    let system = FuelSystem::new(FuelType::Nitro, Induction::Supercharged);
    let curve = power_curve(&rating(6000.0, 8000.0, 500.0), system);
    assert_eq!(curve[0].hp, Some(0.0));
    assert_relative_eq!(curve[1].hp.unwrap_or(0.0), 0.5 * 0.61 * 6000.0, epsilon = 1e-9);
}

#[test]
fn lower_gears_lose_more() {
    let clutch = gear_efficiencies(4, false);
    for (eff, expected) in clutch.iter().zip([0.975, 0.98, 0.985, 0.99]) {
        assert_relative_eq!(*eff, expected, epsilon = 1e-12);
    }
    let conv = gear_efficiencies(3, true);
    assert_relative_eq!(conv[0], 0.965, epsilon = 1e-12);
    assert_relative_eq!(conv[2], 0.985, epsilon = 1e-12);
    assert_relative_eq!(gear_efficiencies(2, true)[0], 0.98, epsilon = 1e-12);
}

#[test]
fn converter_multiplication_is_bounded() {
    let loose = converter_fit(3000.0, 200.0, 10.0, 1.0);
    assert!(loose.torque_mult >= 1.0 && loose.torque_mult <= 2.0);
    let tight = converter_fit(1500.0, 400.0, 12.0, 1.0);
    assert_eq!(tight.torque_mult, 2.0);
    assert_relative_eq!(clutch_slippage(6000.0), 1.0085, epsilon = 1e-12);
}

#[test]
fn inertia_scales_with_displacement_and_tires() {
    let gas = FuelSystem::default();
    let car = inertia(&rating(325.0, 5800.0, 350.0), gas, 3, true, 28.0, 10.0, false);
    assert_relative_eq!(car.engine, 350.0 / 120.0, epsilon = 1e-12);
    assert_relative_eq!(car.transmission, 2.0 * 350.0 / 120.0 / 10.0, epsilon = 1e-12);
    assert_relative_eq!(car.tires, 20.928332, epsilon = 1e-5);

    let bike = inertia(&rating(81.0, 7350.0, 80.0), gas, 4, false, 28.0, 5.0, true);
    assert_relative_eq!(bike.engine, 80.0 / 240.0, epsilon = 1e-12);
    assert_relative_eq!(bike.transmission, 4.0 * (80.0 / 120.0) / 50.0 / 2.0, epsilon = 1e-12);
    assert_relative_eq!(bike.tires, 5.232083, epsilon = 1e-5);
}

#[test]
fn expansion_fills_in_the_full_sheet() {
    // weather divisor for 86 F, 60 % humidity at 680 ft
    let full = expand(&et_racer(), 1.1083683);
    full.validate().expect("expanded vehicle is valid");
    assert!(matches!(full.power, PowerSource::Curve(ref rows) if rows.len() == 16));
    match full.launch {
        LaunchDevice::Converter {
            launch_rpm,
            slippage,
            torque_mult,
            ..
        } => {
            assert_eq!(launch_rpm, 3000.0);
            assert_relative_eq!(torque_mult, 1.69569, epsilon = 1e-4);
            assert_relative_eq!(slippage, 1.05144, epsilon = 1e-4);
        }
        LaunchDevice::Clutch { .. } => panic!("launch device changed kind"),
    }
    let aero = BodyStyle::Sedan.aero();
    assert_eq!((full.aero.cd, full.aero.cl), (aero.cd, aero.cl));
    assert_eq!(full.chassis.overhang_in, Some(24.0));
    assert_eq!(full.drivetrain.shift, ShiftPolicy::Rpm(vec![6000.0, 6000.0]));
    assert_eq!(full.drivetrain.transmission_efficiency, 0.97);
    assert!(full.inertia.engine > 0.0);
}

#[test]
fn full_sheets_pass_through_untouched() {
    let mut car = et_racer();
    car.power = PowerSource::Flat { hp: 325.0 };
    assert_eq!(expand(&car, 1.1), car);
}
