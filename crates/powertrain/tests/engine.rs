use approx::assert_relative_eq;
use dragstrip_powertrain::{EngineError, EngineModel};
use dragstrip_vehicle::{PowerSource, QuarterJrRating, TorqueSample};

fn sheet() -> PowerSource {
    PowerSource::Curve(vec![
        TorqueSample::from_torque(3000.0, 400.0),
        TorqueSample::from_torque(5000.0, 500.0),
        TorqueSample::from_torque(7000.0, 450.0),
    ])
}

#[test]
fn torque_lookup_clamps_at_both_ends() {
    let engine = EngineModel::new(&sheet(), 1.0, 1.0).expect("engine");
    assert_eq!(engine.torque_at(1000.0), 400.0);
    assert_eq!(engine.torque_at(2999.0), 400.0);
    assert_eq!(engine.torque_at(9000.0), 450.0);
}

#[test]
fn torque_lookup_is_exact_at_samples_and_linear_between() {
    let engine = EngineModel::new(&sheet(), 1.0, 1.0).expect("engine");
    assert_eq!(engine.torque_at(3000.0), 400.0);
    assert_eq!(engine.torque_at(5000.0), 500.0);
    assert_eq!(engine.torque_at(7000.0), 450.0);
    assert_relative_eq!(engine.torque_at(4000.0), 450.0, epsilon = 1e-12);
    assert_relative_eq!(engine.torque_at(6000.0), 475.0, epsilon = 1e-12);
    assert_relative_eq!(engine.torque_at_legacy(6000.0), 475.0, epsilon = 1e-3);
}

#[test]
fn hp_rows_convert_to_torque() {
    let power = PowerSource::Curve(vec![
        TorqueSample::from_hp(5252.0, 500.0),
        TorqueSample::from_hp(7000.0, 600.0),
    ]);
    let engine = EngineModel::new(&power, 1.0, 1.0).expect("engine");
    assert_relative_eq!(engine.torque_at(5252.0), 500.0, epsilon = 1e-9);
    assert_relative_eq!(engine.power_hp(7000.0), 600.0, epsilon = 1e-9);
    let (rpm, hp) = engine.peak_power();
    assert_eq!(rpm, 7000.0);
    assert_relative_eq!(hp, 600.0, epsilon = 1e-9);
}

#[test]
fn zero_rpm_hp_row_is_an_error() {
    let power = PowerSource::Curve(vec![
        TorqueSample::from_hp(0.0, 10.0),
        TorqueSample::from_hp(7000.0, 600.0),
    ]);
    assert_eq!(
        EngineModel::new(&power, 1.0, 1.0).unwrap_err(),
        EngineError::NonPositiveRpm(0.0)
    );
}

#[test]
fn flat_rating_uses_rpm_floor_and_scales() {
    assert_eq!(
        EngineModel::new(&PowerSource::Flat { hp: 0.0 }, 1.0, 1.0).unwrap_err(),
        EngineError::ZeroRating(0.0)
    );
    let engine = EngineModel::new(&PowerSource::Flat { hp: 400.0 }, 1.0, 0.9).expect("engine");
    assert_relative_eq!(engine.torque_at(500.0), 5252.0 * 400.0 / 1000.0 * 0.9, epsilon = 1e-9);
    assert_relative_eq!(engine.power_hp(6000.0), 360.0, epsilon = 1e-9);
}

#[test]
fn multiplier_and_correction_scale_the_sheet() {
    let engine = EngineModel::new(&sheet(), 1.1, 0.95).expect("engine");
    assert_relative_eq!(engine.torque_at(5000.0), 500.0 * 1.1 * 0.95, epsilon = 1e-9);
    assert_eq!(engine.correction(), 0.95);
    assert_eq!(engine.peak_torque().0, 5000.0);
}

#[test]
fn hp_sheets_interpolate_in_hp_and_hold_end_torque() {
    let power = PowerSource::Curve(vec![
        TorqueSample::from_hp(6000.0, 400.0),
        TorqueSample::from_hp(8000.0, 600.0),
    ]);
    let engine = EngineModel::new(&power, 1.0, 1.0).expect("engine");
    assert_relative_eq!(engine.power_hp(7000.0), 500.0, epsilon = 1e-9);
    assert_relative_eq!(engine.torque_at(7000.0), 500.0 * 5252.0 / 7000.0, epsilon = 1e-9);

    let end_torque = 600.0 * 5252.0 / 8000.0;
    assert_relative_eq!(engine.torque_at(9000.0), end_torque, epsilon = 1e-9);
    assert_relative_eq!(engine.power_hp(9000.0), end_torque * 9000.0 / 5252.0, epsilon = 1e-9);
    assert_relative_eq!(engine.power_hp(3000.0), 200.0, epsilon = 1e-9);
    assert_relative_eq!(engine.power_hp_legacy(7000.0), 500.0, epsilon = 1e-3);
}

#[test]
fn extended_power_follows_the_end_segments() {
    let power = PowerSource::Curve(vec![
        TorqueSample::from_hp(6000.0, 400.0),
        TorqueSample::from_hp(8000.0, 600.0),
        TorqueSample::from_hp(9000.0, 620.0),
    ]);
    let engine = EngineModel::new(&power, 1.0, 0.5).expect("engine");
    assert_relative_eq!(engine.power_hp_extended(8500.0, false), engine.power_hp(8500.0));
    // slope of the last segment is 0.02 hp/rpm
    assert_relative_eq!(engine.power_hp_extended(10_000.0, false), 640.0 * 0.5, epsilon = 1e-9);
    assert_relative_eq!(engine.power_hp_extended(10_000.0, true), 320.0, epsilon = 1e-3);
    assert!(engine.power_hp_extended(10_000.0, false) < engine.power_hp(10_000.0));
    // and the first segment's 0.1 hp/rpm below the sheet
    assert_relative_eq!(engine.power_hp_extended(5500.0, false), 350.0 * 0.5, epsilon = 1e-9);
    assert_eq!(engine.power_hp_extended(1000.0, false), 0.0);
    // torque itself still clamps
    assert_relative_eq!(engine.torque_at(10_000.0), 620.0 * 5252.0 / 9000.0 * 0.5, epsilon = 1e-9);
}

#[test]
fn correction_divides_out_the_weather() {
    let engine = EngineModel::new(&sheet(), 1.0, 1.0 / 1.0745).expect("engine");
    assert_relative_eq!(engine.torque_at(5000.0) * 1.0745, 500.0, epsilon = 1e-9);
}

#[test]
fn quarter_jr_rating_needs_expansion_first() {
    let power = PowerSource::QuarterJr(QuarterJrRating {
        peak_hp: 325.0,
        peak_rpm: 5800.0,
        displacement_cid: 350.0,
    });
    assert_eq!(
        EngineModel::new(&power, 1.0, 1.0).unwrap_err(),
        EngineError::UnexpandedRating
    );
}
