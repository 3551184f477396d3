use approx::assert_relative_eq;
use dragstrip_powertrain::driveline::*;
use dragstrip_vehicle::LaunchDevice;

fn clutch(lockup: bool) -> LaunchDevice {
    LaunchDevice::Clutch {
        launch_rpm: 7200.0,
        slip_rpm: 7600.0,
        slippage: 1.004,
        lockup,
    }
}

fn converter(lockup: bool) -> LaunchDevice {
    LaunchDevice::Converter {
        launch_rpm: 5000.0,
        stall_rpm: 5500.0,
        slippage: 1.06,
        torque_mult: 1.7,
        lockup,
        diameter_in: Some(10.0),
    }
}

#[test]
fn tire_slip_fades_over_the_quarter() {
    assert_relative_eq!(tire_slip_factor(1.0, 1.0, 0.0), 1.02, epsilon = 1e-12);
    assert_relative_eq!(tire_slip_factor(5.0, 1.0, 0.0), 1.04, epsilon = 1e-12);
    assert_relative_eq!(tire_slip_factor(5.0, 1.0, 1320.0), 1.02, epsilon = 1e-12);
    assert!(tire_slip_factor(3.0, 1.01, 100.0) > tire_slip_factor(3.0, 1.0, 100.0));
}

#[test]
fn lock_rpm_scales_with_gearing() {
    let ds = driveshaft_rpm(100.0, 8.5, 1.0);
    assert_relative_eq!(ds, 100.0 * 60.0 / 8.5, epsilon = 1e-9);
    assert_relative_eq!(lock_rpm(ds, 4.0, 2.0), ds * 8.0, epsilon = 1e-9);
    assert_eq!(driveshaft_rpm(100.0, 0.0, 1.0), 0.0);
}

#[test]
fn clutch_pins_engine_at_slip_rpm() {
    let c = couple(&clutch(false), 3800.0, 0, 10);
    assert_eq!(c.engine_rpm, 7600.0);
    assert_relative_eq!(c.factor, 0.5, epsilon = 1e-12);

    let hooked = couple(&clutch(false), 9000.0, 2, 10);
    assert_relative_eq!(hooked.engine_rpm, 9036.0, epsilon = 1e-9);
    assert_relative_eq!(hooked.factor, 1.0 / 1.004, epsilon = 1e-12);
}

#[test]
fn locked_clutch_follows_driveline_above_first_gear() {
    let c = couple(&clutch(true), 5000.0, 1, 10);
    assert_relative_eq!(c.engine_rpm, 5020.0, epsilon = 1e-9);
    let first = couple(&clutch(true), 5000.0, 0, 10);
    assert_eq!(first.engine_rpm, 7600.0);
}

#[test]
fn converter_multiplies_torque_below_stall() {
    let c = couple(&converter(false), 0.0, 0, 0);
    assert_eq!(c.engine_rpm, 5500.0);
    assert_eq!(c.factor, 0.0);
    assert_eq!(c.slip_ratio, Some(0.0));

    let c = couple(&converter(false), 2000.0, 0, 1);
    let sr = 1.06 * 2000.0 / 5500.0;
    assert_relative_eq!(c.factor, (1.7 - 0.7 * sr) * 2000.0 / 5500.0, epsilon = 1e-12);
    assert!(c.factor <= 1.0);
}

#[test]
fn converter_stall_flashes_after_launch() {
    let early = couple(&converter(false), 4000.0, 0, 1);
    let later = couple(&converter(false), 4000.0, 0, 5);
    assert_eq!(early.effective_stall, Some(5500.0));
    assert!(later.effective_stall.unwrap_or(0.0) > 5500.0);
    assert!(later.slip_ratio.unwrap_or(1.0) < early.slip_ratio.unwrap_or(0.0));
}

#[test]
fn converter_above_stall_slips_at_fixed_ratio() {
    let c = couple(&converter(false), 7000.0, 1, 100);
    assert_relative_eq!(c.engine_rpm, 7420.0, epsilon = 1e-9);
    assert_relative_eq!(c.factor, 1.0 / 1.06, epsilon = 1e-12);

    let locked = couple(&converter(true), 7000.0, 1, 100);
    assert_relative_eq!(locked.engine_rpm, 7035.0, epsilon = 1e-9);
    assert_eq!(locked.slip_ratio, None);
}
