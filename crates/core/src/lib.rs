//! Core units, constants, and shared primitives for the dragstrip workspace.

pub mod exact;
pub mod params;

pub use params::PhysicsConstants;

/// Physical constants expressed in US customary units (unless stated otherwise).
pub mod constants {
    /// Standard gravity (ft/s²).
    pub const GC: f64 = 32.174;
    /// Value of pi used throughout the legacy printouts.
    pub const PI_LEGACY: f64 = 3.141593;
    /// Conversion factor from ft/s to mph (3600/5280).
    pub const Z5: f64 = 3600.0 / 5280.0;
    /// Torque/HP conversion constant (lb-ft · rpm / hp).
    pub const HP_TORQUE: f64 = 5252.0;
    /// The same conversion built from `PI_LEGACY`, as the launch torque uses it.
    pub const HP_TORQUE_LEGACY: f64 = 60.0 / (2.0 * PI_LEGACY) * FT_LB_PER_HP;
    /// Foot-pounds per second in one horsepower.
    pub const FT_LB_PER_HP: f64 = 550.0;
    /// Quarter-mile length in feet.
    pub const QUARTER_MILE_FT: f64 = 1320.0;
    /// Eighth-mile length in feet.
    pub const EIGHTH_MILE_FT: f64 = 660.0;
    /// Psi per inch of mercury.
    pub const PSI_PER_INHG: f64 = 0.491154;
    /// Sea-level standard pressure (psi).
    pub const PSI_STD: f64 = 14.696;
    /// Sea-level standard barometer (inHg).
    pub const INHG_STD: f64 = 29.92;
    /// Rankine offset for °F.
    pub const RANKINE_OFFSET: f64 = 459.67;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{GC, PSI_PER_INHG, Z5};

    /// Convert feet per second to miles per hour.
    #[inline]
    pub fn fps_to_mph(v: f64) -> f64 {
        v * Z5
    }

    /// Convert miles per hour to feet per second.
    #[inline]
    pub fn mph_to_fps(v: f64) -> f64 {
        v / Z5
    }

    /// Convert revolutions per minute to radians per second.
    #[inline]
    pub fn rpm_to_rad_s(rpm: f64) -> f64 {
        rpm * std::f64::consts::PI / 30.0
    }

    /// Convert radians per second to revolutions per minute.
    #[inline]
    pub fn rad_s_to_rpm(w: f64) -> f64 {
        w * 30.0 / std::f64::consts::PI
    }

    /// Convert a weight in pounds-force to mass in slugs.
    #[inline]
    pub fn lb_to_slug(lb: f64) -> f64 {
        lb / GC
    }

    /// Convert a mass in slugs to weight in pounds-force.
    #[inline]
    pub fn slug_to_lb(slug: f64) -> f64 {
        slug * GC
    }

    /// Convert inches of mercury to psi.
    #[inline]
    pub fn inhg_to_psi(v: f64) -> f64 {
        v * PSI_PER_INHG
    }

    /// Convert psi to inches of mercury.
    #[inline]
    pub fn psi_to_inhg(v: f64) -> f64 {
        v / PSI_PER_INHG
    }

    /// Convert inches to feet.
    #[inline]
    pub fn in_to_ft(v: f64) -> f64 {
        v / 12.0
    }

    /// Convert °F to °R.
    #[inline]
    pub fn fahrenheit_to_rankine(t: f64) -> f64 {
        t + super::constants::RANKINE_OFFSET
    }
}

/// Scalar helpers shared by the physics crates.
pub mod math {
    /// Clamp `v` into `[lo, hi]`. NaN passes through unchanged.
    #[inline]
    pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
        if v < lo {
            lo
        } else if v > hi {
            hi
        } else {
            v
        }
    }

    /// Linear interpolation between `a` and `b` at parameter `t`.
    #[inline]
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t
    }

    /// Cube root that keeps the sign of negative inputs and maps non-finite input to zero.
    #[inline]
    pub fn cbrt_safe(v: f64) -> f64 {
        if v.is_finite() { v.cbrt() } else { 0.0 }
    }

    /// Fraction of the way `x` sits between `x0` and `x1`; zero when the span is degenerate.
    #[inline]
    pub fn inverse_lerp(x0: f64, x1: f64, x: f64) -> f64 {
        let span = x1 - x0;
        if span.abs() < f64::EPSILON {
            0.0
        } else {
            (x - x0) / span
        }
    }
}
