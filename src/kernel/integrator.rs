//! Kinematic updates.
//!
//! The legacy step fixes the speed at the end of the step and solves for the time it takes to
//! get there at constant specific power; position then follows from the constant-power
//! closed form. The fixed-step mode uses semi-implicit Euler instead.

/// Position, speed, and clock of the car.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicState {
    pub t_s: f64,
    pub v_fps: f64,
    pub s_ft: f64,
}

/// Specific power below which the closed form is replaced by the average-speed distance
/// (ft²/s³).
pub const MIN_SPECIFIC_POWER: f64 = 0.1;

/// Time (s) to go from `v0` to `v1` at constant specific power `pqwt` (ft²/s³, that is
/// `550·gc·hp/W`).
#[inline]
pub fn time_to_speed(pqwt: f64, v0_fps: f64, v1_fps: f64) -> f64 {
    (v1_fps * v1_fps - v0_fps * v0_fps).max(0.0) / (2.0 * pqwt)
}

/// Distance (ft) covered in `dt` starting at `v0` under constant specific power `pqwt`.
/// Falls back to the average of `v0` and `v1` when power is negligible or the closed form has
/// no real solution.
pub fn constant_power_distance(pqwt: f64, dt: f64, v0_fps: f64, v1_fps: f64) -> f64 {
    let average = |dt: f64| ((v0_fps + v1_fps) / 2.0 * dt).max(0.0);
    if pqwt < MIN_SPECIFIC_POWER || dt <= 0.0 {
        return average(dt.abs());
    }
    let term = 2.0 * pqwt * dt + v0_fps * v0_fps;
    if term < 0.0 {
        return average(dt);
    }
    (term.powf(1.5) - v0_fps.powi(3)) / (3.0 * pqwt)
}

/// Move the state to speed `v1` over `dt` at constant specific power `pqwt`.
pub fn advance_at_power(state: &mut KinematicState, pqwt: f64, v1_fps: f64, dt: f64) {
    state.s_ft += constant_power_distance(pqwt, dt, state.v_fps, v1_fps);
    state.v_fps = v1_fps;
    state.t_s += dt;
}

/// Advance one step at acceleration `a_fps2`. Speed updates first and position uses the new
/// speed.
#[inline]
pub fn advance(dt: f64, state: &mut KinematicState, a_fps2: f64) {
    state.v_fps += a_fps2 * dt;
    state.s_ft += state.v_fps * dt;
    state.t_s += dt;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_acceleration_matches_closed_form() {
        let mut state = KinematicState::default();
        let dt = 0.001;
        for _ in 0..1000 {
            advance(dt, &mut state, 10.0);
        }
        assert!((state.t_s - 1.0).abs() < 1e-9);
        assert!((state.v_fps - 10.0).abs() < 1e-9);
        // semi-implicit Euler overshoots by a·t·dt/2
        assert!((state.s_ft - 5.0).abs() < 0.01);
    }

    #[test]
    fn zero_net_force_coasts_at_constant_speed() {
        let mut euler = KinematicState {
            t_s: 0.0,
            v_fps: 80.0,
            s_ft: 100.0,
        };
        for _ in 0..50 {
            advance(0.01, &mut euler, 0.0);
        }
        assert_eq!(euler.v_fps, 80.0);
        assert!((euler.s_ft - 140.0).abs() < 1e-9);

        let mut legacy = KinematicState {
            t_s: 0.0,
            v_fps: 80.0,
            s_ft: 100.0,
        };
        advance_at_power(&mut legacy, 0.0, 80.0, 0.5);
        assert_eq!(legacy.v_fps, 80.0);
        assert!((legacy.s_ft - 140.0).abs() < 1e-9);
        assert!((legacy.t_s - 0.5).abs() < 1e-12);
    }

    #[test]
    fn constant_power_distance_agrees_with_time_to_speed() {
        // v² grows linearly under constant power, so s = ((v0² + 2P·t)^1.5 − v0³)/(3P)
        let (pqwt, v0, v1) = (2000.0, 50.0, 70.0);
        let dt = time_to_speed(pqwt, v0, v1);
        assert!((dt - (4900.0 - 2500.0) / 4000.0).abs() < 1e-12);
        let s = constant_power_distance(pqwt, dt, v0, v1);
        assert!((s - (70f64.powi(3) - 50f64.powi(3)) / 6000.0).abs() < 1e-9);
        assert!(s > v0 * dt && s < v1 * dt);
    }
}
