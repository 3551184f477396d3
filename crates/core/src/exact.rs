//! Single-precision helpers for parity with legacy printouts.
//!
//! Every helper truncates its inputs and outputs to `f32`, so chained calls reproduce the
//! intermediate rounding of the legacy calculator. Results are widened back to `f64` so callers
//! can mix them freely with the rest of the kernel.

/// Truncate to single precision.
#[inline]
pub fn f32r(x: f64) -> f64 {
    x as f32 as f64
}

/// Single-precision addition.
#[inline]
pub fn add(a: f64, b: f64) -> f64 {
    (a as f32 + b as f32) as f64
}

/// Single-precision subtraction.
#[inline]
pub fn sub(a: f64, b: f64) -> f64 {
    (a as f32 - b as f32) as f64
}

/// Single-precision multiplication.
#[inline]
pub fn mul(a: f64, b: f64) -> f64 {
    (a as f32 * b as f32) as f64
}

/// Single-precision division.
#[inline]
pub fn div(a: f64, b: f64) -> f64 {
    (a as f32 / b as f32) as f64
}

/// Single-precision square root.
#[inline]
pub fn sqrt(x: f64) -> f64 {
    (x as f32).sqrt() as f64
}

/// Single-precision power.
#[inline]
pub fn pow(x: f64, y: f64) -> f64 {
    (x as f32).powf(y as f32) as f64
}

/// Round half-to-even at `places` decimals, evaluated on the single-precision scaled value.
pub fn vb6_round(x: f64, places: i32) -> f64 {
    let p = 10f64.powi(places);
    let v = f32r(x * p);
    let f = v.floor();
    let frac = v - f;
    if frac > 0.5 {
        (f + 1.0) / p
    } else if frac < 0.5 {
        f / p
    } else if f % 2.0 == 0.0 {
        f / p
    } else {
        (f + 1.0) / p
    }
}

/// Legacy `Int()`: truncate toward negative infinity.
#[inline]
pub fn vb6_int(x: f64) -> f64 {
    f32r(x).floor()
}

/// Legacy `Fix()`: truncate toward zero.
#[inline]
pub fn vb6_fix(x: f64) -> f64 {
    f32r(x).trunc()
}

/// Interpolate `y` at `x` between `(x0, y0)` and `(x1, y1)` in single precision.
pub fn lerp_f32(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let (xf, x0f, x1f) = (x as f32, x0 as f32, x1 as f32);
    let (y0f, y1f) = (y0 as f32, y1 as f32);
    if x1f == x0f {
        return y0f as f64;
    }
    let t = (xf - x0f) / (x1f - x0f);
    (y0f + t * (y1f - y0f)) as f64
}

/// Piecewise-linear lookup over `(x, y)` pairs sorted by ascending `x`, clamped at both ends.
pub fn table_lookup_f32(x: f64, table: &[(f64, f64)]) -> f64 {
    let (first, last) = match (table.first(), table.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    let xf = x as f32;
    if table.len() == 1 || xf <= first.0 as f32 {
        return f32r(first.1);
    }
    if xf >= last.0 as f32 {
        return f32r(last.1);
    }
    for pair in table.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if xf >= x0 as f32 && xf <= x1 as f32 {
            return lerp_f32(x, x0, x1, y0, y1);
        }
    }
    f32r(last.1)
}
