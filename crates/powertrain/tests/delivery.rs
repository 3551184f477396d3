use approx::assert_relative_eq;
use dragstrip_powertrain::delivery::*;
use dragstrip_vehicle::{FuelType, ThrottleStop};

#[test]
fn gasoline_is_flat() {
    assert_eq!(fuel_factor(FuelType::Gas, 0.1, Some(60.0)), 1.0);
}

#[test]
fn methanol_richens_only_on_cold_tracks() {
    assert_relative_eq!(fuel_factor(FuelType::Methanol, 0.0, Some(70.0)), 1.025);
    assert_relative_eq!(fuel_factor(FuelType::Methanol, 0.4, Some(70.0)), 1.0125, epsilon = 1e-12);
    assert_eq!(fuel_factor(FuelType::Methanol, 0.9, Some(70.0)), 1.0);
    assert_eq!(fuel_factor(FuelType::Methanol, 0.1, Some(110.0)), 1.0);
    assert_eq!(fuel_factor(FuelType::Methanol, 0.1, None), 1.0);
}

#[test]
fn nitro_ramps_to_full_power() {
    assert_eq!(fuel_factor(FuelType::Nitro, 0.2, None), 0.9);
    assert_relative_eq!(fuel_factor(FuelType::Nitro, 0.7, None), 0.95, epsilon = 1e-12);
    assert_eq!(fuel_factor(FuelType::Nitro, 1.2, None), 1.0);
}

#[test]
fn throttle_stop_window_with_ramps() {
    let stop = ThrottleStop {
        activate_s: 1.0,
        duration_s: 2.0,
        throttle_pct: 40.0,
        ramp_s: 0.5,
    };
    assert_eq!(throttle_factor(None, 1.5), 1.0);
    assert_eq!(throttle_factor(Some(&stop), 0.9), 1.0);
    assert_relative_eq!(throttle_factor(Some(&stop), 1.25), 0.7, epsilon = 1e-12);
    assert_relative_eq!(throttle_factor(Some(&stop), 2.0), 0.4, epsilon = 1e-12);
    assert_relative_eq!(throttle_factor(Some(&stop), 2.75), 0.7, epsilon = 1e-12);
    assert_eq!(throttle_factor(Some(&stop), 3.0), 1.0);
}

#[test]
fn rev_limiter_cuts_at_limit() {
    assert_eq!(rev_limiter_factor(Some(9000.0), 8999.0, 0.05), 1.0);
    assert_eq!(rev_limiter_factor(Some(9000.0), 9000.0, 0.05), 0.05);
    assert_eq!(rev_limiter_factor(None, 20000.0, 0.05), 1.0);
}
