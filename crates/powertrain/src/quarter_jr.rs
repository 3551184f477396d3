//! QuarterJr sheets: a car described by a peak HP rating instead of a dyno sheet.
//!
//! The rating is placed on a family of normalized power curves by its specific output. The
//! driveline losses, converter characteristics and rotating inertia the full sheet would ask
//! for are then estimated from the gearing, tires and displacement.

use dragstrip_core::constants::HP_TORQUE_LEGACY;
use dragstrip_core::math::{clamp, inverse_lerp, lerp};
use dragstrip_vehicle::{
    BodyStyle, FuelSystem, Inertia, LaunchDevice, PowerSource, QuarterJrRating, ShiftPolicy,
    TorqueSample, Vehicle,
};

/// RPM of each synthesized row as a fraction of peak-power RPM.
pub const RPM_FRACTIONS: [f64; 16] = [
    0.25, 0.5, 0.6, 0.65, 0.7, 0.75, 0.8, 0.85, 0.9, 0.95, 1.0, 1.05, 1.1, 1.15, 1.2, 1.25,
];

/// Specific output (HP per cubic inch, normalized by fuel) of each curve family.
const FAMILY_OUTPUT: [f64; 5] = [0.7, 1.2, 1.7, 2.5, 3.4];

/// Torque relative to peak-power torque, one row per family.
const FAMILY_TORQUE: [[f64; 16]; 5] = [
    [
        0.53, 0.975, 1.098, 1.13, 1.152, 1.16, 1.153, 1.122, 1.086, 1.045, 1.0, 0.938, 0.865, 0.795,
        0.72, 0.63,
    ],
    [
        0.365, 0.87, 1.018, 1.066, 1.11, 1.129, 1.132, 1.11, 1.079, 1.042, 1.0, 0.935, 0.855, 0.762,
        0.66, 0.54,
    ],
    [
        0.24, 0.79, 0.96, 1.023, 1.08, 1.106, 1.117, 1.102, 1.074, 1.04, 1.0, 0.932, 0.845, 0.736,
        0.612, 0.474,
    ],
    [
        0.1, 0.7, 0.894, 0.972, 1.04, 1.08, 1.096, 1.09, 1.069, 1.037, 1.0, 0.928, 0.83, 0.698,
        0.55, 0.39,
    ],
    [
        0.0, 0.63, 0.84, 0.924, 1.0, 1.055, 1.079, 1.082, 1.064, 1.035, 1.0, 0.923, 0.815, 0.662,
        0.49, 0.31,
    ],
];

/// Blown nitro engines use their own shape regardless of output.
const BLOWN_NITRO_TORQUE: [f64; 16] = [
    0.0, 0.61, 0.8, 0.9, 0.98, 1.035, 1.055, 1.06, 1.05, 1.03, 1.0, 0.93, 0.85, 0.765, 0.67, 0.58,
];

const DEFAULT_CONVERTER_DIAMETER_IN: f64 = 10.0;

/// Converter fit for a stall speed and the engine's corrected output there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConverterFit {
    pub slippage: f64,
    pub torque_mult: f64,
}

/// Specific output used to pick the curve family.
pub fn specific_output(rating: &QuarterJrRating, system: FuelSystem) -> f64 {
    let raw = rating.peak_hp / rating.displacement_cid / system.work_factor();
    let floor = if system.is_naturally_aspirated() { 0.7 } else { 1.2 };
    clamp(raw, floor, 3.4)
}

/// Sixteen HP rows from a quarter of peak RPM to a quarter beyond it.
pub fn power_curve(rating: &QuarterJrRating, system: FuelSystem) -> Vec<TorqueSample> {
    let output = specific_output(rating, system);
    let upper = FAMILY_OUTPUT
        .partition_point(|&x| x < output)
        .clamp(1, FAMILY_OUTPUT.len() - 1);
    let t = inverse_lerp(FAMILY_OUTPUT[upper - 1], FAMILY_OUTPUT[upper], output);
    let blown_nitro = system.code() == 8;

    RPM_FRACTIONS
        .iter()
        .enumerate()
        .map(|(n, &frac)| {
            let torque_ratio = if blown_nitro {
                BLOWN_NITRO_TORQUE[n]
            } else {
                lerp(FAMILY_TORQUE[upper - 1][n], FAMILY_TORQUE[upper][n], t)
            };
            TorqueSample::from_hp(frac * rating.peak_rpm, frac * torque_ratio * rating.peak_hp)
        })
        .collect()
}

/// Per-gear efficiencies: each gear below top loses a little more.
pub fn gear_efficiencies(gear_count: usize, converter: bool) -> Vec<f64> {
    let (top, step) = match (converter, gear_count >= 3) {
        (false, _) => (0.99, 0.005),
        (true, true) => (0.985, 0.01),
        (true, false) => (0.99, 0.01),
    };
    (1..=gear_count)
        .map(|gear| top - (gear_count - gear) as f64 * step)
        .collect()
}

/// Converter slippage and stall torque multiplication. `stall_hp` is the uncorrected sheet HP at
/// the stall speed and `hp_divisor` the weather correction divisor.
pub fn converter_fit(
    stall_rpm: f64,
    stall_hp: f64,
    diameter_in: f64,
    hp_divisor: f64,
) -> ConverterFit {
    let stall_torque = stall_hp * (HP_TORQUE_LEGACY / stall_rpm) / hp_divisor;
    let work = (stall_rpm / 1000.0) * (stall_rpm / stall_torque);
    let load = work / (200.0 * (7.0 / diameter_in).powi(4));
    ConverterFit {
        slippage: 1.01 + load / 20.0 + work / 8000.0,
        torque_mult: clamp(2.633 - load.powf(0.3) - work / 1500.0, 1.0, 2.0),
    }
}

/// Clutch slippage grows slightly with the slip speed.
#[inline]
pub fn clutch_slippage(slip_rpm: f64) -> f64 {
    1.0025 + slip_rpm / 1e6
}

/// Rotating inertia (lb·ft²) estimated from displacement, gearing and tire size.
pub fn inertia(
    rating: &QuarterJrRating,
    system: FuelSystem,
    gear_count: usize,
    converter: bool,
    tire_diameter_in: f64,
    tire_width_in: f64,
    motorcycle: bool,
) -> Inertia {
    let cid = rating.displacement_cid;
    let mut engine = if system.is_naturally_aspirated() {
        cid / 120.0
    } else {
        cid / 90.0
    };
    let n = gear_count as f64;
    let mut transmission = if converter {
        (n - 1.0) * engine / 10.0
    } else {
        n * engine / 50.0
    };
    let tire_weight = 1.15 * 0.8 * (0.08 * tire_diameter_in * tire_width_in);
    let mut tires = 2.0 * (tire_weight * (tire_diameter_in / 2.0).powi(2) / 386.0);
    if motorcycle {
        engine = cid / 240.0;
        transmission /= 2.0;
        tires /= 2.0;
    }
    Inertia {
        engine,
        transmission,
        tires,
    }
}

/// Replace a QuarterJr rating with the full description the kernel runs on. Any other vehicle
/// is returned unchanged. `hp_divisor` is the weather correction divisor for the run.
pub fn expand(vehicle: &Vehicle, hp_divisor: f64) -> Vehicle {
    let PowerSource::QuarterJr(rating) = &vehicle.power else {
        return vehicle.clone();
    };
    let system = vehicle.fuel_system();
    let curve = power_curve(rating, system);
    let gear_count = vehicle.drivetrain.gear_count();
    let converter = vehicle.launch.is_converter();
    let motorcycle = vehicle.chassis.body_style == BodyStyle::Motorcycle;
    let body = vehicle.chassis.body_style.aero();

    let launch = match vehicle.launch {
        LaunchDevice::Clutch { slip_rpm, .. } => LaunchDevice::Clutch {
            launch_rpm: slip_rpm,
            slip_rpm,
            slippage: clutch_slippage(slip_rpm),
            lockup: false,
        },
        LaunchDevice::Converter {
            stall_rpm,
            diameter_in,
            ..
        } => {
            let stall_hp = sheet_hp(&curve, stall_rpm);
            let fit = converter_fit(
                stall_rpm,
                stall_hp,
                diameter_in.unwrap_or(DEFAULT_CONVERTER_DIAMETER_IN),
                hp_divisor,
            );
            LaunchDevice::Converter {
                launch_rpm: stall_rpm,
                stall_rpm,
                slippage: fit.slippage,
                torque_mult: fit.torque_mult,
                lockup: false,
                diameter_in,
            }
        }
    };

    let shift = match &vehicle.drivetrain.shift {
        ShiftPolicy::Rpm(points) => {
            let fill = points.last().copied().unwrap_or(rating.peak_rpm);
            let mut points = points.clone();
            points.resize(gear_count.saturating_sub(1).max(points.len()), fill);
            ShiftPolicy::Rpm(points)
        }
        other => other.clone(),
    };

    let mut out = vehicle.clone();
    out.power = PowerSource::Curve(curve);
    out.launch = launch;
    out.aero.cd = body.cd;
    out.aero.cl = body.cl;
    out.chassis.overhang_in = Some(body.overhang_in);
    out.drivetrain.gear_efficiencies = gear_efficiencies(gear_count, converter);
    out.drivetrain.transmission_efficiency = if motorcycle { 0.985 } else { 0.97 };
    out.drivetrain.shift = shift;
    out.inertia = inertia(
        rating,
        system,
        gear_count,
        converter,
        vehicle.tire_diameter_in(),
        vehicle.tires.width_in,
        motorcycle,
    );
    out
}

/// Linear HP interpolation over synthesized rows, extended along the end segments.
fn sheet_hp(curve: &[TorqueSample], rpm: f64) -> f64 {
    let rows: Vec<(f64, f64)> = curve
        .iter()
        .filter_map(|s| s.hp.map(|hp| (s.rpm, hp)))
        .collect();
    if rows.len() < 2 {
        return rows.first().map(|r| r.1).unwrap_or(0.0);
    }
    let upper = rows
        .partition_point(|&(x, _)| x < rpm)
        .clamp(1, rows.len() - 1);
    let (x0, y0) = rows[upper - 1];
    let (x1, y1) = rows[upper];
    lerp(y0, y1, inverse_lerp(x0, x1, rpm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_interpolation_hits_the_rows() {
        let rating = QuarterJrRating {
            peak_hp: 120.0,
            peak_rpm: 6000.0,
            displacement_cid: 100.0,
        };
        let curve = power_curve(&rating, FuelSystem::default());
        assert!((curve[0].hp.unwrap_or(0.0) - 0.25 * 0.365 * 120.0).abs() < 1e-9);
    }

    #[test]
    fn stall_lookup_extends_end_segments() {
        let curve = vec![
            TorqueSample::from_hp(1000.0, 10.0),
            TorqueSample::from_hp(2000.0, 30.0),
        ];
        assert!((sheet_hp(&curve, 1500.0) - 20.0).abs() < 1e-12);
        assert!((sheet_hp(&curve, 2500.0) - 40.0).abs() < 1e-12);
    }
}
