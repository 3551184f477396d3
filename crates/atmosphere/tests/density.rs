use approx::assert_relative_eq;
use dragstrip_atmosphere::*;
use dragstrip_vehicle::{Environment, FuelSystem, FuelType, Induction};

fn gas() -> FuelSystem {
    FuelSystem::new(FuelType::Gas, Induction::Carbureted)
}

fn standard() -> Environment {
    Environment {
        elevation_ft: 0.0,
        temperature_f: 59.0,
        barometer_inhg: 29.92,
        humidity_pct: 0.0,
        ..Environment::default()
    }
}

#[test]
fn standard_day_matches_reference_density() {
    let air = air_density(&standard());
    assert_relative_eq!(air.pressure_psi, 14.696, epsilon = 1e-9);
    assert_relative_eq!(air.rho_lbm_ft3, 0.0765, epsilon = 2e-4);
    assert_relative_eq!(air.rho_slug_ft3, 0.002377, epsilon = 5e-6);
    assert!(density_altitude_ft(&standard()).abs() < 1.0);
}

#[test]
fn saturation_pressure_tracks_steam_tables() {
    assert_relative_eq!(saturation_pressure_psi(60.0), 0.256, epsilon = 0.003);
    assert_relative_eq!(saturation_pressure_psi(100.0), 0.949, epsilon = 0.01);
}

#[test]
fn heat_altitude_and_humidity_all_thin_the_air() {
    let base = hp_correction(&standard(), gas());
    let hot = Environment { temperature_f: 95.0, ..standard() };
    let high = Environment { elevation_ft: 5000.0, ..standard() };
    let wet = Environment { humidity_pct: 90.0, temperature_f: 59.0, ..standard() };
    assert!(hp_correction(&hot, gas()) < base);
    assert!(hp_correction(&high, gas()) < base);
    assert!(hp_correction(&wet, gas()) < base);
    assert!(density_altitude_ft(&high) > 5000.0 && density_altitude_ft(&high) < 7500.0);
    assert!(density_altitude_ft(&hot) > 1500.0);
}

#[test]
fn simple_correction_is_clamped() {
    let thin = Environment {
        barometer_inhg: 15.0,
        temperature_f: 120.0,
        ..standard()
    };
    assert_eq!(hp_correction_simple(&thin), 0.7);
    assert_relative_eq!(hp_correction_simple(&standard()), 1.0, epsilon = 1e-12);
    let grains = grains_of_water(&Environment {
        humidity_pct: 50.0,
        temperature_f: 80.0,
        ..standard()
    });
    assert!(grains > 0.0 && grains < 500.0);
    assert_eq!(grains_of_water(&standard()), 0.0);
}

#[test]
fn track_temperature_penalty() {
    assert_eq!(track_temp_effect(None), 1.0);
    assert_eq!(track_temp_effect(Some(100.0)), 1.0);
    let hot = track_temp_effect(Some(120.0));
    let cold = track_temp_effect(Some(80.0));
    assert_relative_eq!(hot, 1.0 + 2.5e-6 * 20f64.powf(2.5), epsilon = 1e-12);
    assert_relative_eq!(cold, 1.0 + 2.0e-6 * 20f64.powf(2.5), epsilon = 1e-12);
    assert_eq!(track_temp_effect(Some(200.0)), 1.04);
}

#[test]
fn correction_is_unity_on_the_sixty_degree_reference_day() {
    let reference = Environment {
        temperature_f: 60.0,
        ..standard()
    };
    for (fuel, induction) in [
        (FuelType::Gas, Induction::Carbureted),
        (FuelType::Methanol, Induction::Injected),
        (FuelType::Nitro, Induction::Supercharged),
    ] {
        let system = FuelSystem::new(fuel, induction);
        assert_relative_eq!(hp_correction_divisor(&reference, system), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn correction_divisor_matches_printout_weather() {
    let super_gas = Environment {
        elevation_ft: 850.0,
        temperature_f: 77.0,
        humidity_pct: 30.0,
        ..standard()
    };
    assert_relative_eq!(hp_correction_divisor(&super_gas, gas()), 1.074508, epsilon = 1e-5);
    assert_relative_eq!(air_density(&super_gas).rho_lbm_ft3, 0.0714158, epsilon = 1e-6);

    let funny_car = Environment {
        elevation_ft: 300.0,
        temperature_f: 76.0,
        humidity_pct: 50.0,
        ..standard()
    };
    let nitro = FuelSystem::new(FuelType::Nitro, Induction::Carbureted);
    let blown = FuelSystem::new(FuelType::Nitro, Induction::Supercharged);
    assert_relative_eq!(hp_correction_divisor(&funny_car, nitro), 1.045805, epsilon = 1e-5);
    assert_relative_eq!(hp_correction_divisor(&funny_car, blown), 1.053584, epsilon = 1e-5);
    assert_relative_eq!(
        hp_correction(&funny_car, nitro),
        1.0 / hp_correction_divisor(&funny_car, nitro),
        epsilon = 1e-15
    );
}

#[test]
fn electric_motors_ignore_the_weather() {
    let hot = Environment {
        temperature_f: 105.0,
        elevation_ft: 6000.0,
        ..standard()
    };
    let electric = FuelSystem::new(FuelType::Gas, Induction::Electric);
    assert_eq!(hp_correction_divisor(&hot, electric), 1.0);
    assert!(hp_correction_divisor(&hot, gas()) > 1.1);
}
