//! Per-run mutable state. Owned by one call to the kernel and dropped when it returns.

use super::integrator::KinematicState;

#[derive(Debug, Clone)]
pub struct SimState {
    /// Clock, speed, and distance since launch.
    pub kin: KinematicState,
    /// Acceleration at the end of the last step (g).
    pub ags_g: f64,
    pub rpm: f64,
    pub driveshaft_rpm: f64,
    /// Clock and acceleration at the start of the last step, for the jerk estimate and the
    /// step schedule.
    pub start_t_s: f64,
    pub start_ags_g: f64,
    /// Zero-based gear.
    pub gear: usize,
    /// The last step engaged a new gear.
    pub shifted: bool,
    pub last_shift_s: f64,
    pub step: u64,
    pub tire_slip: bool,
    pub warnings: Vec<String>,
}

impl SimState {
    /// State at the instant of launch: creeping in first gear at `launch_rpm` with the launch
    /// acceleration `ags_g`.
    pub fn launch(launch_rpm: f64, v_fps: f64, ags_g: f64) -> Self {
        Self {
            kin: KinematicState {
                t_s: 0.0,
                v_fps,
                s_ft: 0.0,
            },
            ags_g,
            rpm: launch_rpm,
            driveshaft_rpm: 0.0,
            start_t_s: 0.0,
            start_ags_g: ags_g,
            gear: 0,
            shifted: false,
            last_shift_s: 0.0,
            step: 0,
            tire_slip: false,
            warnings: Vec::new(),
        }
    }

    /// Clamped jerk (g/s) over the last step.
    pub fn jerk_g_s(&self, jerk_min: f64, jerk_max: f64) -> f64 {
        let elapsed = self.kin.t_s - self.start_t_s;
        let jerk = if elapsed > 0.0 {
            (self.ags_g - self.start_ags_g) / elapsed
        } else {
            0.0
        };
        jerk.clamp(jerk_min, jerk_max)
    }

    /// Record a warning tag once.
    pub fn warn(&mut self, tag: &str) {
        if !self.warnings.iter().any(|w| w == tag) {
            self.warnings.push(tag.to_string());
        }
    }
}
