//! Beam crossings, timeslip checkpoints, and trap speed.
//!
//! Positions are reported in the track frame: the ET clock starts when the car has rolled out of
//! the staging beam, and distances are measured from the starting line with the staged car's
//! front overhang already past it. Each beam is crossed between two consecutive steps; crossing
//! times are interpolated linearly in distance.

use dragstrip_core::constants::Z5;
use dragstrip_core::math::{inverse_lerp, lerp};
use dragstrip_vehicle::RaceLength;

use super::integrator::KinematicState;
use super::result::{TimeslipEntry, TraceSample, WindowMph};

/// Length of the speed trap ending at each finish line (ft).
pub const TRAP_WINDOW_FT: f64 = 66.0;
const EIGHTH_TRAP_START_FT: f64 = 594.0;
const QUARTER_TRAP_START_FT: f64 = 1254.0;

/// Where the car sits relative to the beams when staged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Staging {
    /// Distance the car rolls before the ET clock starts (ft).
    pub rollout_ft: f64,
    /// Track distance already covered at the moment the clock starts (ft).
    pub beam_offset_ft: f64,
}

impl Staging {
    /// Staging for a car with `rollout_in` of rollout and `overhang_in` from the front tire
    /// contact patch to the nose.
    pub fn new(rollout_in: f64, overhang_in: f64) -> Self {
        let footprint_in = (2.0 * rollout_in).max(24.0);
        let beam_offset_ft =
            ((overhang_in + 0.25 * footprint_in) / 12.0).max(0.5 * footprint_in / 12.0);
        Self {
            rollout_ft: rollout_in / 12.0,
            beam_offset_ft,
        }
    }

    /// Track distance for a car that has travelled `s_ft` since launch.
    #[inline]
    pub fn track_ft(&self, s_ft: f64) -> f64 {
        s_ft - self.rollout_ft + self.beam_offset_ft
    }
}

/// One observed position in the track frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackPoint {
    /// Time on the ET clock; zero until the car leaves the beam.
    pub t_s: f64,
    pub d_ft: f64,
    pub v_fps: f64,
}

/// Time and speed at which the car passes `d_ft` on the way from `prev` to `next`. When `prev`
/// is already at or beyond the beam the crossing is reported at `next`.
pub fn crossing(d_ft: f64, prev: &TrackPoint, next: &TrackPoint) -> (f64, f64) {
    if prev.d_ft < d_ft && next.d_ft > prev.d_ft {
        let frac = inverse_lerp(prev.d_ft, next.d_ft, d_ft);
        (lerp(prev.t_s, next.t_s, frac), lerp(prev.v_fps, next.v_fps, frac))
    } else {
        (next.t_s, next.v_fps)
    }
}

/// Average speed over `window_ft` covered in `t_end − t_start` (mph).
pub fn window_mph(window_ft: f64, t_start: f64, t_end: f64) -> Option<f64> {
    let dt = t_end - t_start;
    (dt > 0.0).then(|| Z5 * window_ft / dt)
}

/// Trap speed over `[start_ft, end_ft]` recovered from trace samples.
pub fn trap_speed_from_trace(samples: &[TraceSample], start_ft: f64, end_ft: f64) -> Option<f64> {
    let time_at = |d: f64| {
        samples.windows(2).find_map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            (a.s_ft < d && b.s_ft >= d)
                .then(|| lerp(a.t_s, b.t_s, inverse_lerp(a.s_ft, b.s_ft, d)))
        })
    };
    window_mph(end_ft - start_ft, time_at(start_ft)?, time_at(end_ft)?)
}

/// Crossing times gathered over a run.
#[derive(Debug, Clone)]
pub struct CourseTimer {
    staging: Staging,
    checkpoints: &'static [f64],
    next_checkpoint: usize,
    t_start: Option<f64>,
    last: TrackPoint,
    splits: Vec<TimeslipEntry>,
    /// Crossing times of the 594 and 1254 ft beams.
    trap_start: [Option<f64>; 2],
    window: WindowMph,
    finish_mph: Option<f64>,
}

/// Reported course times.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseTimes {
    /// Time from launch to leaving the beam.
    pub t_roll_s: f64,
    pub timeslip: Vec<TimeslipEntry>,
    pub et_s: Option<f64>,
    pub finish_mph: Option<f64>,
    pub window_mph: WindowMph,
}

impl CourseTimer {
    pub fn new(length: RaceLength, staging: Staging) -> Self {
        Self {
            staging,
            checkpoints: length.checkpoints(),
            next_checkpoint: 0,
            t_start: None,
            last: TrackPoint::default(),
            splits: Vec::new(),
            trap_start: [None; 2],
            window: WindowMph::default(),
            finish_mph: None,
        }
    }

    pub fn staging(&self) -> &Staging {
        &self.staging
    }

    /// Launch-clock time at which the car left the beam, if it has.
    pub fn rollout_time(&self) -> Option<f64> {
        self.t_start
    }

    /// Most recent track position.
    pub fn last(&self) -> &TrackPoint {
        &self.last
    }

    /// Record the car's state at the end of a step and return it in the track frame.
    pub fn observe(&mut self, kin: &KinematicState) -> TrackPoint {
        let rollout_ft = self.staging.rollout_ft;
        if self.t_start.is_none() && kin.s_ft >= rollout_ft {
            let overshoot_s = if kin.v_fps > 0.0 {
                (kin.s_ft - rollout_ft) / kin.v_fps
            } else {
                0.0
            };
            self.t_start = Some(kin.t_s - overshoot_s);
        }
        let point = TrackPoint {
            t_s: self.t_start.map_or(0.0, |t0| kin.t_s - t0),
            d_ft: self.staging.track_ft(kin.s_ft).max(0.0),
            v_fps: kin.v_fps,
        };
        let prev = self.last;

        for (slot, beam) in self
            .trap_start
            .iter_mut()
            .zip([EIGHTH_TRAP_START_FT, QUARTER_TRAP_START_FT])
        {
            if slot.is_none() && point.d_ft >= beam {
                *slot = Some(crossing(beam, &prev, &point).0);
            }
        }

        while let Some(&d_ft) = self.checkpoints.get(self.next_checkpoint) {
            if point.d_ft < d_ft {
                break;
            }
            let (t_s, v_fps) = crossing(d_ft, &prev, &point);
            let trap = |start: Option<f64>| start.and_then(|t0| window_mph(TRAP_WINDOW_FT, t0, t_s));
            let v_mph = if d_ft == EIGHTH_TRAP_START_FT + TRAP_WINDOW_FT {
                self.window.e660_mph = trap(self.trap_start[0]);
                self.window.e660_mph
            } else if d_ft == QUARTER_TRAP_START_FT + TRAP_WINDOW_FT {
                self.window.q1320_mph = trap(self.trap_start[1]);
                self.window.q1320_mph
            } else {
                None
            };
            self.splits.push(TimeslipEntry {
                d_ft,
                t_s,
                v_mph: v_mph.unwrap_or(v_fps * Z5),
            });
            self.next_checkpoint += 1;
            if self.next_checkpoint == self.checkpoints.len() {
                self.finish_mph = Some(v_fps * Z5);
            }
        }

        self.last = point;
        point
    }

    /// The finish line has been crossed.
    pub fn finished(&self) -> bool {
        self.next_checkpoint >= self.checkpoints.len()
    }

    pub fn finish(self) -> CourseTimes {
        let et_s = self
            .finished()
            .then(|| self.splits.last().map(|e| e.t_s))
            .flatten();
        CourseTimes {
            t_roll_s: self.t_start.unwrap_or(0.0),
            et_s,
            finish_mph: self.finish_mph,
            window_mph: self.window,
            timeslip: self.splits,
        }
    }
}

impl CourseTimes {
    /// Trap speed for `length`, if its window was completed.
    pub fn trap_mph(&self, length: RaceLength) -> Option<f64> {
        match length {
            RaceLength::Eighth => self.window_mph.e660_mph,
            RaceLength::Quarter => self.window_mph.q1320_mph,
        }
    }
}
