//! Run outputs. Everything here serializes to the JSON written by the CLI.

use dragstrip_vehicle::FuelType;
use serde::{Deserialize, Serialize};

use crate::models::ModelId;

/// Warning tags surfaced in [`SimMeta::warnings`].
pub mod warnings {
    pub const MAX_TIME_EXCEEDED: &str = "max_time_exceeded";
    pub const MAX_STEPS_EXCEEDED: &str = "max_steps_exceeded";
    pub const TIRE_SLIP: &str = "tire_slip";
    pub const CANCELLED: &str = "cancelled";
    pub const NO_LEARNED_MODEL: &str = "no_learned_model";
}

/// One timeslip checkpoint. Times are measured from the end of rollout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeslipEntry {
    pub d_ft: f64,
    pub t_s: f64,
    pub v_mph: f64,
}

/// State at the end of one step. `t_s` is on the ET clock (zero until the car leaves the beam),
/// `s_ft` is track distance, and `gear` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    pub t_s: f64,
    pub v_mph: f64,
    pub a_g: f64,
    pub s_ft: f64,
    pub rpm: f64,
    pub gear: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminationReason {
    Distance,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Termination {
    pub reason: TerminationReason,
    pub steps: u64,
    pub t_s: f64,
    pub target_ft: f64,
}

/// Time-averaged speeds over the 66 ft windows ending at 660 and 1320 ft.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowMph {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e660_mph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q1320_mph: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConverterDiagnostics {
    /// Mean coupling torque ratio while the converter was slipping.
    pub avg_torque_ratio: f64,
    pub avg_slip_ratio: f64,
    pub peak_effective_stall_rpm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClutchDiagnostics {
    pub min_coupling: f64,
    /// Distance at which the clutch stopped slipping, if it did.
    pub lockup_at_ft: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RolloutDiagnostics {
    pub rollout_in: f64,
    /// Time from launch to leaving the beam.
    pub t_roll_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelDiagnostics {
    pub fuel: FuelType,
    pub min_scale: f64,
    pub max_scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimMeta {
    pub model: ModelId,
    pub steps: u64,
    pub warnings: Vec<String>,
    pub window_mph: WindowMph,
    /// Instantaneous speed at the finish line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_mph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converter: Option<ConverterDiagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clutch: Option<ClutchDiagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollout: Option<RolloutDiagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<FuelDiagnostics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<Termination>,
}

impl SimMeta {
    /// Metadata with no diagnostics, as produced by closed-form models.
    pub fn bare(model: ModelId, steps: u64) -> Self {
        Self {
            model,
            steps,
            warnings: Vec::new(),
            window_mph: WindowMph::default(),
            finish_mph: None,
            converter: None,
            clutch: None,
            rollout: None,
            fuel: None,
            termination: None,
        }
    }

    pub fn has_warning(&self, tag: &str) -> bool {
        self.warnings.iter().any(|w| w == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimResult {
    pub et_s: f64,
    /// Trap speed: the time-averaged speed over the final 66 ft.
    pub mph: f64,
    pub timeslip: Vec<TimeslipEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traces: Option<Vec<TraceSample>>,
    pub meta: SimMeta,
}

impl SimResult {
    /// Split at checkpoint `d_ft`, if the run reached it.
    pub fn split(&self, d_ft: f64) -> Option<&TimeslipEntry> {
        self.timeslip.iter().find(|e| (e.d_ft - d_ft).abs() < 1e-9)
    }

    pub fn finished(&self) -> bool {
        self.meta
            .termination
            .map(|t| t.reason == TerminationReason::Distance)
            .unwrap_or(true)
    }
}
