//! Moist-air density and power correction for drag-race weather.
//!
//! Density follows the legacy calculator: a polynomial saturation-pressure fit, an
//! elevation-corrected ambient pressure, and a moist-air gas constant. The power correction is
//! the legacy per-fuel-system formula. All functions are pure.

use dragstrip_core::constants::{GC, INHG_STD, PSI_STD, RANKINE_OFFSET};
use dragstrip_vehicle::{Environment, FuelSystem, FuelType, Induction};

/// Saturation vapor pressure polynomial in °F (psi).
const PSAT_COEFFS: [f64; 6] = [0.0205558, 0.00118163, 1.54988e-5, 4.0245e-7, 4.34856e-10, 2.096e-11];
const MW_AIR: f64 = 28.9669;
const MW_WATER: f64 = 18.016;
const R_UNIVERSAL: f64 = 1545.32;
/// Standard-atmosphere lapse coefficient on absolute temperature (°R per ft).
const LAPSE_R_PER_FT: f64 = 0.00356616;
const T_STD_R: f64 = 519.67;
const PRESSURE_EXP: f64 = 5.25588;

/// Thermodynamic state of the air for one set of conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirState {
    /// Ambient pressure after elevation correction (psi).
    pub pressure_psi: f64,
    /// Partial pressure of water vapor (psi).
    pub vapor_psi: f64,
    /// Pounds of water vapor per pound of dry air.
    pub humidity_ratio: f64,
    /// Moist-air gas constant (ft·lbf/(lbm·°R)).
    pub gas_constant: f64,
    pub rho_lbm_ft3: f64,
    pub rho_slug_ft3: f64,
}

/// Saturation vapor pressure of water at `temp_f` (psi).
pub fn saturation_pressure_psi(temp_f: f64) -> f64 {
    PSAT_COEFFS
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * temp_f + c)
}

/// Ambient pressure at elevation for a station barometer reading (psi).
pub fn ambient_pressure_psi(barometer_inhg: f64, elevation_ft: f64) -> f64 {
    let lapse = ((T_STD_R - LAPSE_R_PER_FT * elevation_ft) / T_STD_R).max(0.0);
    PSI_STD * barometer_inhg / INHG_STD * lapse.powf(PRESSURE_EXP)
}

/// Density of moist air for the given conditions.
pub fn air_density(env: &Environment) -> AirState {
    let humidity = env.humidity_pct.clamp(0.0, 100.0);
    let pressure_psi = ambient_pressure_psi(env.barometer_inhg, env.elevation_ft);
    let vapor_psi = (humidity / 100.0 * saturation_pressure_psi(env.temperature_f)).min(pressure_psi * 0.99);
    let dry_psi = pressure_psi - vapor_psi;
    let war = vapor_psi * MW_WATER / (dry_psi * MW_AIR);
    let gas_constant = R_UNIVERSAL * (1.0 / MW_AIR + war / MW_WATER) / (1.0 + war);
    let rho_lbm_ft3 = 144.0 * pressure_psi / (gas_constant * (env.temperature_f + RANKINE_OFFSET));
    AirState {
        pressure_psi,
        vapor_psi,
        humidity_ratio: war,
        gas_constant,
        rho_lbm_ft3,
        rho_slug_ft3: rho_lbm_ft3 / GC,
    }
}

/// Air density on the reference day: sea level, 59 °F, 29.92 inHg, dry.
pub fn standard_density() -> AirState {
    air_density(&Environment {
        elevation_ft: 0.0,
        temperature_f: 59.0,
        barometer_inhg: INHG_STD,
        humidity_pct: 0.0,
        ..Environment::default()
    })
}

/// Density relative to the reference day.
pub fn density_ratio(env: &Environment) -> f64 {
    air_density(env).rho_slug_ft3 / standard_density().rho_slug_ft3
}

/// Divisor applied to sheet horsepower for the conditions; above 1 means lost power.
///
/// Pressure and temperature exponents and the mechanical-loss share depend on the fuel, and a
/// supercharger shifts weight from pressure to temperature. Humid air is penalized beyond its
/// effect on density. Electric motors are not corrected.
pub fn hp_correction_divisor(env: &Environment, system: FuelSystem) -> f64 {
    if system.induction == Induction::Electric {
        return 1.0;
    }
    let air = air_density(env);
    let delta = (air.pressure_psi - air.vapor_psi) / PSI_STD;
    let theta = (env.temperature_f + RANKINE_OFFSET) / T_STD_R;
    let gas_ratio = air.gas_constant / (R_UNIVERSAL / MW_AIR);
    let humidity = 1.0 + 2.48 * air.humidity_ratio.max(0.0).powf(1.5);

    let (mut px, mut tx, mut mech) = match system.fuel {
        FuelType::Gas => (1.0, 0.6, 0.15),
        FuelType::Methanol => (1.0, 0.3, 0.13),
        FuelType::Nitro => (0.85, 0.5, 0.055),
    };
    let code = system.code();
    if matches!(code, 2 | 4 | 5) {
        mech -= 0.005;
    }
    if system.induction == Induction::Supercharged {
        let dtx = (1.35 - 1.0) / 1.35 / 0.85;
        px = 0.95 - dtx * tx;
        tx += dtx;
        mech *= 0.6;
    }
    let ratio = delta.powf(px) / (gas_ratio.sqrt() * theta.powf(tx));
    (1.0 + mech) * humidity / ratio - mech
}

/// Engine power multiplier for the conditions; below 1 means lost power.
#[inline]
pub fn hp_correction(env: &Environment, system: FuelSystem) -> f64 {
    1.0 / hp_correction_divisor(env, system)
}

/// Standard-atmosphere altitude with the same air density (ft).
pub fn density_altitude_ft(env: &Environment) -> f64 {
    let ratio = density_ratio(env).max(1e-6);
    (1.0 - ratio.powf(1.0 / 4.2561)) / 6.8756e-6
}

/// Grains of water per pound of dry air, from a Tetens saturation estimate. Capped at 500.
pub fn grains_of_water(env: &Environment) -> f64 {
    let temp_c = (env.temperature_f - 32.0) / 1.8;
    let sat = 0.0061 * ((17.27 * temp_c) / (237.3 + temp_c)).exp();
    let vapor = sat * env.humidity_pct / 100.0;
    let grains = 7000.0 * 0.622 * (vapor / (env.barometer_inhg - vapor));
    grains.clamp(0.0, 500.0)
}

/// Coarse correction used by the closed-form estimator: pressure and temperature ratios with a
/// humidity penalty, clamped to `[0.7, 1.15]`.
pub fn hp_correction_simple(env: &Environment) -> f64 {
    let pressure_ratio = env.barometer_inhg / INHG_STD;
    let temp_ratio = (59.0 + RANKINE_OFFSET) / (env.temperature_f + RANKINE_OFFSET);
    let humidity = 1.0 - grains_of_water(env) / 5000.0;
    (pressure_ratio * temp_ratio * humidity).clamp(0.7, 1.15)
}

/// Grip penalty factor (>= 1) for track surface temperature, centred on 100 °F and capped
/// at 1.04. Returns 1 when the temperature is unknown.
pub fn track_temp_effect(track_temp_f: Option<f64>) -> f64 {
    let Some(t) = track_temp_f else {
        return 1.0;
    };
    let k = if t > 100.0 { 2.5e-6 } else { 2.0e-6 };
    (1.0 + k * (100.0 - t).abs().powf(2.5)).min(1.04)
}
