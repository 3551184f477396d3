//! Time- and RPM-dependent power multipliers: fuel delivery, throttle stop, rev limiter.

use dragstrip_vehicle::{FuelType, ThrottleStop};

/// Methanol runs rich off a cold track and leans out over the first 0.8 s; nitro cars are
/// pedalled to 90% power for the first 0.4 s and ramp to full by 1 s.
pub fn fuel_factor(fuel: FuelType, t_s: f64, track_temp_f: Option<f64>) -> f64 {
    match fuel {
        FuelType::Gas => 1.0,
        FuelType::Methanol => match track_temp_f {
            Some(track) if track < 80.0 && t_s < 0.8 => 1.025 - 0.025 * t_s / 0.8,
            _ => 1.0,
        },
        FuelType::Nitro => {
            if t_s < 0.4 {
                0.90
            } else if t_s < 1.0 {
                0.90 + 0.10 * (t_s - 0.4) / 0.6
            } else {
                1.0
            }
        }
    }
}

/// Power multiplier for a throttle stop, with `t_s` measured from the start of the ET clock.
pub fn throttle_factor(stop: Option<&ThrottleStop>, t_s: f64) -> f64 {
    let Some(stop) = stop else {
        return 1.0;
    };
    let off_s = stop.activate_s + stop.duration_s;
    if t_s < stop.activate_s || t_s >= off_s {
        return 1.0;
    }
    let target = (stop.throttle_pct / 100.0).clamp(0.0, 1.0);
    if stop.ramp_s > 0.0 && t_s < stop.activate_s + stop.ramp_s {
        let progress = (t_s - stop.activate_s) / stop.ramp_s;
        return 1.0 - (1.0 - target) * progress;
    }
    if stop.ramp_s > 0.0 && t_s > off_s - stop.ramp_s {
        let progress = (off_s - t_s) / stop.ramp_s;
        return 1.0 - (1.0 - target) * progress;
    }
    target
}

/// Hard cut to `cut` at or above the limiter RPM.
#[inline]
pub fn rev_limiter_factor(limit_rpm: Option<f64>, rpm: f64, cut: f64) -> f64 {
    match limit_rpm {
        Some(limit) if limit > 0.0 && rpm >= limit => cut,
        _ => 1.0,
    }
}
