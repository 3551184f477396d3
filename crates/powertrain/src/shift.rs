//! Upshift state machine.
//!
//! A shift takes three steps: the step whose end RPM crosses the shift point raises the request,
//! the next step still runs in the old gear and engages the new one when it ends, and the step
//! after that runs in the new gear and holds off any further request.

use dragstrip_vehicle::{Drivetrain, ShiftPolicy};

/// A completed gear change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftEvent {
    /// Zero-based gear before the shift.
    pub from: usize,
    pub to: usize,
    pub t_s: f64,
    /// Engine speed when the shift was requested.
    pub rpm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Requested { rpm: f64 },
    Engaged,
}

/// Tracks the current gear. Downshifts are not modeled; the top gear is terminal.
#[derive(Debug, Clone)]
pub struct ShiftController {
    policy: ShiftPolicy,
    gear_count: usize,
    gear: usize,
    phase: Phase,
    last_shift_s: f64,
}

impl ShiftController {
    pub fn new(drivetrain: &Drivetrain) -> Self {
        Self {
            policy: drivetrain.shift.clone(),
            gear_count: drivetrain.gear_count(),
            gear: 0,
            phase: Phase::Idle,
            last_shift_s: 0.0,
        }
    }

    /// Zero-based current gear.
    pub fn gear(&self) -> usize {
        self.gear
    }

    pub fn last_shift_s(&self) -> f64 {
        self.last_shift_s
    }

    pub fn in_top_gear(&self) -> bool {
        self.gear + 1 >= self.gear_count
    }

    /// A shift has been requested but not yet engaged.
    pub fn pending(&self) -> bool {
        matches!(self.phase, Phase::Requested { .. })
    }

    /// Advance the state machine at the end of a step that finished at `t_s` with the engine at
    /// `rpm`. Returns the event on the step that engages the next gear.
    pub fn update(&mut self, t_s: f64, rpm: f64) -> Option<ShiftEvent> {
        match self.phase {
            Phase::Requested { rpm: requested_at } => {
                let event = ShiftEvent {
                    from: self.gear,
                    to: self.gear + 1,
                    t_s,
                    rpm: requested_at,
                };
                self.gear += 1;
                self.last_shift_s = t_s;
                self.phase = Phase::Engaged;
                Some(event)
            }
            Phase::Engaged => {
                self.phase = Phase::Idle;
                None
            }
            Phase::Idle => {
                if !self.in_top_gear() && self.triggered(t_s, rpm) {
                    self.phase = Phase::Requested { rpm };
                }
                None
            }
        }
    }

    fn triggered(&self, t_s: f64, rpm: f64) -> bool {
        match &self.policy {
            ShiftPolicy::Rpm(points) => points.get(self.gear).is_some_and(|&limit| rpm >= limit),
            ShiftPolicy::Time(points) => points.get(self.gear).is_some_and(|&at| t_s >= at),
        }
    }
}
