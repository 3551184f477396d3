//! Weather, track, and course descriptors.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::VehicleError;

/// Ambient conditions for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub elevation_ft: f64,
    pub temperature_f: f64,
    pub barometer_inhg: f64,
    pub humidity_pct: f64,
    pub wind_mph: f64,
    /// Wind direction relative to travel; 0° is a headwind.
    pub wind_angle_deg: f64,
    pub track_temp_f: Option<f64>,
    /// Track prep quality, 1 (best) upward.
    pub traction_index: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            elevation_ft: 0.0,
            temperature_f: 59.0,
            barometer_inhg: 29.92,
            humidity_pct: 0.0,
            wind_mph: 0.0,
            wind_angle_deg: 0.0,
            track_temp_f: None,
            traction_index: 3.0,
        }
    }
}

impl Environment {
    pub fn validate(&self) -> Result<(), VehicleError> {
        if !(self.barometer_inhg > 0.0) {
            return Err(VehicleError::InvalidEnvironment {
                field: "barometer_inhg",
                value: self.barometer_inhg,
            });
        }
        if !(0.0..=100.0).contains(&self.humidity_pct) {
            return Err(VehicleError::InvalidEnvironment {
                field: "humidity_pct",
                value: self.humidity_pct,
            });
        }
        if !(self.temperature_f > -459.67) {
            return Err(VehicleError::InvalidEnvironment {
                field: "temperature_f",
                value: self.temperature_f,
            });
        }
        if !(self.traction_index >= 1.0) {
            return Err(VehicleError::InvalidEnvironment {
                field: "traction_index",
                value: self.traction_index,
            });
        }
        Ok(())
    }
}

/// Course length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RaceLength {
    Eighth,
    Quarter,
}

const EIGHTH_CHECKPOINTS: [f64; 3] = [60.0, 330.0, 660.0];
const QUARTER_CHECKPOINTS: [f64; 5] = [60.0, 330.0, 660.0, 1000.0, 1320.0];

impl RaceLength {
    pub fn length_ft(self) -> f64 {
        match self {
            RaceLength::Eighth => 660.0,
            RaceLength::Quarter => 1320.0,
        }
    }

    /// Timeslip checkpoint distances (ft), finish line last.
    pub fn checkpoints(self) -> &'static [f64] {
        match self {
            RaceLength::Eighth => &EIGHTH_CHECKPOINTS,
            RaceLength::Quarter => &QUARTER_CHECKPOINTS,
        }
    }

    /// Upper-case tag used in CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            RaceLength::Eighth => "EIGHTH",
            RaceLength::Quarter => "QUARTER",
        }
    }

    /// 66 ft speed trap ending at the finish line.
    pub fn trap_window(self) -> (f64, f64) {
        let end = self.length_ft();
        (end - 66.0, end)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("unknown race length '{0}' (expected eighth or quarter)")]
pub struct UnknownRaceLength(pub String);

impl FromStr for RaceLength {
    type Err = UnknownRaceLength;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eighth" | "e" | "1/8" | "660" => Ok(RaceLength::Eighth),
            "quarter" | "q" | "1/4" | "1320" => Ok(RaceLength::Quarter),
            _ => Err(UnknownRaceLength(s.to_string())),
        }
    }
}

impl std::fmt::Display for RaceLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaceLength::Eighth => write!(f, "1/8 mile"),
            RaceLength::Quarter => write!(f, "1/4 mile"),
        }
    }
}
