//! Launch-device descriptors, vehicle mass properties, and the race environment.

pub mod environment;

pub use environment::{Environment, RaceLength, UnknownRaceLength};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Launch device coupling the engine to the driveline.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchDevice {
    /// Slipping friction clutch.
    Clutch {
        launch_rpm: f64,
        slip_rpm: f64,
        /// Ratio of engine to driveshaft speed while the clutch slips.
        slippage: f64,
        lockup: bool,
    },
    /// Hydrodynamic torque converter.
    Converter {
        launch_rpm: f64,
        stall_rpm: f64,
        slippage: f64,
        torque_mult: f64,
        lockup: bool,
        diameter_in: Option<f64>,
    },
}

impl LaunchDevice {
    pub fn launch_rpm(&self) -> f64 {
        match self {
            LaunchDevice::Clutch { launch_rpm, .. } | LaunchDevice::Converter { launch_rpm, .. } => {
                *launch_rpm
            }
        }
    }

    /// Clutch slip RPM or converter stall RPM.
    pub fn pinned_rpm(&self) -> f64 {
        match self {
            LaunchDevice::Clutch { slip_rpm, .. } => *slip_rpm,
            LaunchDevice::Converter { stall_rpm, .. } => *stall_rpm,
        }
    }

    pub fn slippage(&self) -> f64 {
        match self {
            LaunchDevice::Clutch { slippage, .. } | LaunchDevice::Converter { slippage, .. } => {
                *slippage
            }
        }
    }

    pub fn lockup(&self) -> bool {
        match self {
            LaunchDevice::Clutch { lockup, .. } | LaunchDevice::Converter { lockup, .. } => *lockup,
        }
    }

    /// Torque multiplication at stall; 1 for a clutch.
    pub fn torque_mult(&self) -> f64 {
        match self {
            LaunchDevice::Clutch { .. } => 1.0,
            LaunchDevice::Converter { torque_mult, .. } => *torque_mult,
        }
    }

    pub fn is_converter(&self) -> bool {
        matches!(self, LaunchDevice::Converter { .. })
    }
}

/// One row of a dyno sheet. Either torque or HP must be present; torque wins when both are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueSample {
    pub rpm: f64,
    pub torque_lbft: Option<f64>,
    pub hp: Option<f64>,
}

impl TorqueSample {
    pub fn from_hp(rpm: f64, hp: f64) -> Self {
        Self {
            rpm,
            torque_lbft: None,
            hp: Some(hp),
        }
    }

    pub fn from_torque(rpm: f64, torque_lbft: f64) -> Self {
        Self {
            rpm,
            torque_lbft: Some(torque_lbft),
            hp: None,
        }
    }
}

/// Where engine output comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerSource {
    /// Dyno curve with at least two rows.
    Curve(Vec<TorqueSample>),
    /// Flat HP rating with no curve.
    Flat { hp: f64 },
    /// Peak rating from which the curve, driveline losses and inertias are synthesized.
    QuarterJr(QuarterJrRating),
}

/// The three numbers a QuarterJr sheet asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterJrRating {
    pub peak_hp: f64,
    pub peak_rpm: f64,
    pub displacement_cid: f64,
}

/// Upshift trigger per gear. Entry `i` applies to the shift out of gear `i`.
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftPolicy {
    Rpm(Vec<f64>),
    /// Elapsed time since launch (s).
    Time(Vec<f64>),
}

impl Default for ShiftPolicy {
    fn default() -> Self {
        ShiftPolicy::Rpm(Vec::new())
    }
}

/// Legacy body styles, numbered 1 to 8 on the printouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyStyle {
    /// Style 1, also the generic "car".
    #[default]
    #[serde(alias = "car")]
    WingedDragster,
    Dragster,
    FunnyCar,
    Roadster,
    Fastback,
    Sedan,
    Wagon,
    Motorcycle,
}

/// Drag and lift coefficients with the front overhang a body style implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyAero {
    pub cd: f64,
    pub cl: f64,
    pub overhang_in: f64,
}

impl BodyStyle {
    pub fn code(self) -> u8 {
        match self {
            BodyStyle::WingedDragster => 1,
            BodyStyle::Dragster => 2,
            BodyStyle::FunnyCar => 3,
            BodyStyle::Roadster => 4,
            BodyStyle::Fastback => 5,
            BodyStyle::Sedan => 6,
            BodyStyle::Wagon => 7,
            BodyStyle::Motorcycle => 8,
        }
    }

    /// Style assumed when a QuarterJr sheet leaves it blank.
    pub fn for_weight(weight_lb: f64) -> Self {
        if weight_lb > 800.0 {
            BodyStyle::WingedDragster
        } else {
            BodyStyle::Motorcycle
        }
    }

    pub fn aero(self) -> BodyAero {
        let (cd, cl, overhang_in) = match self {
            BodyStyle::WingedDragster => (0.66, 0.8, 30.0),
            BodyStyle::Dragster => (0.5, 0.2, 30.0),
            BodyStyle::FunnyCar => (0.52, 0.8, 40.0),
            BodyStyle::Roadster => (0.52, 0.1, 30.0),
            BodyStyle::Fastback => (0.28, 0.1, 30.0),
            BodyStyle::Sedan => (0.4, 0.1, 24.0),
            BodyStyle::Wagon => (0.46, 0.1, 18.0),
            BodyStyle::Motorcycle => (0.54, 0.1, 12.0),
        };
        BodyAero { cd, cl, overhang_in }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FuelType {
    #[default]
    Gas,
    Methanol,
    Nitro,
}

/// How the fuel reaches the cylinders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Induction {
    #[default]
    Carbureted,
    Injected,
    Supercharged,
    /// Flat-rate motor; weather does not change its output.
    Electric,
}

/// Fuel and induction together, as the legacy fuel-system codes 1 to 9 enumerate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FuelSystem {
    pub fuel: FuelType,
    pub induction: Induction,
}

impl FuelSystem {
    pub fn new(fuel: FuelType, induction: Induction) -> Self {
        Self { fuel, induction }
    }

    /// Legacy fuel-system code. Nitro is always injected, so a carbureted nitro car maps to 5.
    pub fn code(self) -> u8 {
        match (self.induction, self.fuel) {
            (Induction::Electric, _) => 9,
            (Induction::Carbureted, FuelType::Gas) => 1,
            (Induction::Injected, FuelType::Gas) => 2,
            (Induction::Carbureted, FuelType::Methanol) => 3,
            (Induction::Injected, FuelType::Methanol) => 4,
            (Induction::Carbureted | Induction::Injected, FuelType::Nitro) => 5,
            (Induction::Supercharged, FuelType::Gas) => 6,
            (Induction::Supercharged, FuelType::Methanol) => 7,
            (Induction::Supercharged, FuelType::Nitro) => 8,
        }
    }

    pub fn is_naturally_aspirated(self) -> bool {
        self.code() <= 5
    }

    /// Specific-output normalizer used to place a rating on the QuarterJr curve family.
    pub fn work_factor(self) -> f64 {
        match self.code() {
            1 | 2 => 1.0,
            3 | 4 => 1.08,
            5 => 5.0,
            6 => 2.0,
            8 => 1.5 * 5.5,
            _ => 2.5 * 1.08,
        }
    }
}

/// Final drive, gearbox, and shift schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Drivetrain {
    pub final_drive: f64,
    /// Ratios ordered from first gear (largest) to top gear.
    pub gear_ratios: Vec<f64>,
    /// Optional per-gear efficiencies; missing entries fall back to `transmission_efficiency`.
    pub gear_efficiencies: Vec<f64>,
    pub transmission_efficiency: f64,
    pub shift: ShiftPolicy,
    pub rev_limiter_rpm: Option<f64>,
}

impl Drivetrain {
    pub fn gear_count(&self) -> usize {
        self.gear_ratios.len()
    }

    /// Efficiency of `gear`, clamped to `[min, 1]`.
    pub fn gear_efficiency(&self, gear: usize, min: f64) -> f64 {
        let eff = self
            .gear_efficiencies
            .get(gear)
            .copied()
            .unwrap_or(self.transmission_efficiency);
        eff.clamp(min, 1.0)
    }

    pub fn gear_ratio(&self, gear: usize) -> f64 {
        self.gear_ratios
            .get(gear)
            .or_else(|| self.gear_ratios.last())
            .copied()
            .unwrap_or(1.0)
    }

    /// RPM threshold for leaving `gear`, if one is defined.
    pub fn shift_rpm(&self, gear: usize) -> Option<f64> {
        match &self.shift {
            ShiftPolicy::Rpm(rpms) => rpms.get(gear).copied(),
            ShiftPolicy::Time(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tires {
    pub diameter_in: f64,
    pub width_in: f64,
    /// Measured rollout circumference; overrides `diameter_in` when present.
    pub rollout_in: Option<f64>,
}

impl Tires {
    pub fn effective_diameter_in(&self) -> f64 {
        match self.rollout_in {
            Some(rollout) if rollout > 0.0 => rollout / std::f64::consts::PI,
            _ => self.diameter_in,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aero {
    pub cd: f64,
    /// Lift coefficient; positive values produce downforce.
    pub cl: f64,
    pub frontal_area_ft2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chassis {
    pub wheelbase_in: f64,
    pub overhang_in: Option<f64>,
    pub cg_height_in: Option<f64>,
    pub static_front_weight_lb: Option<f64>,
    pub body_style: BodyStyle,
}

impl Default for Chassis {
    fn default() -> Self {
        Self {
            wheelbase_in: 100.0,
            overhang_in: None,
            cg_height_in: None,
            static_front_weight_lb: None,
            body_style: BodyStyle::default(),
        }
    }
}

/// Polar moments of inertia (lb·ft²). Zero disables the rotating-inertia terms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Inertia {
    pub engine: f64,
    pub transmission: f64,
    pub tires: f64,
}

/// Timed power reduction used by bracket racers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleStop {
    pub activate_s: f64,
    pub duration_s: f64,
    /// Throttle opening while engaged (percent).
    pub throttle_pct: f64,
    /// Time to blend in and out of the stop (s).
    pub ramp_s: f64,
}

/// Complete vehicle description, immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub weight_lb: f64,
    pub chassis: Chassis,
    pub tires: Tires,
    pub aero: Aero,
    pub drivetrain: Drivetrain,
    pub launch: LaunchDevice,
    pub power: PowerSource,
    pub hp_torque_mult: f64,
    pub inertia: Inertia,
    pub fuel: FuelType,
    pub induction: Induction,
    /// Staging rollout before the timers start (in).
    pub rollout_in: Option<f64>,
    pub throttle_stop: Option<ThrottleStop>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VehicleError {
    #[error("vehicle weight must be positive (got {0})")]
    NonPositiveWeight(f64),
    #[error("tire diameter must be positive (got {0})")]
    NonPositiveTireDiameter(f64),
    #[error("final drive ratio must be positive (got {0})")]
    NonPositiveFinalDrive(f64),
    #[error("at least one gear ratio is required")]
    NoGears,
    #[error("gear {gear} ratio must be positive (got {ratio})")]
    NonPositiveGearRatio { gear: usize, ratio: f64 },
    #[error("gear ratios must be ordered from first gear down (gear {gear} is taller than gear {next})")]
    GearOrder { gear: usize, next: usize },
    #[error("power curve needs at least two samples (got {0})")]
    CurveTooShort(usize),
    #[error("power curve sample at {rpm} rpm has neither torque nor HP")]
    MissingCurveValue { rpm: f64 },
    #[error("HP-only curve sample must have positive rpm (got {0})")]
    NonPositiveCurveRpm(f64),
    #[error("flat HP rating must be positive (got {0})")]
    NonPositiveRating(f64),
    #[error("QuarterJr {field} must be positive (got {value})")]
    InvalidRating { field: &'static str, value: f64 },
    #[error("launch device {field} must be positive (got {value})")]
    InvalidLaunch { field: &'static str, value: f64 },
    #[error("transmission efficiency must lie in (0, 1] (got {0})")]
    InvalidEfficiency(f64),
    #[error("wheelbase must be positive (got {0})")]
    NonPositiveWheelbase(f64),
    #[error("environment field {field} is out of range (got {value})")]
    InvalidEnvironment { field: &'static str, value: f64 },
}

impl Vehicle {
    /// Check the structural invariants the kernel relies on.
    pub fn validate(&self) -> Result<(), VehicleError> {
        if !(self.weight_lb > 0.0) {
            return Err(VehicleError::NonPositiveWeight(self.weight_lb));
        }
        let dia = self.tires.effective_diameter_in();
        if !(dia > 0.0) {
            return Err(VehicleError::NonPositiveTireDiameter(dia));
        }
        if !(self.chassis.wheelbase_in > 0.0) {
            return Err(VehicleError::NonPositiveWheelbase(self.chassis.wheelbase_in));
        }
        let dt = &self.drivetrain;
        if !(dt.final_drive > 0.0) {
            return Err(VehicleError::NonPositiveFinalDrive(dt.final_drive));
        }
        if dt.gear_ratios.is_empty() {
            return Err(VehicleError::NoGears);
        }
        for (gear, &ratio) in dt.gear_ratios.iter().enumerate() {
            if !(ratio > 0.0) {
                return Err(VehicleError::NonPositiveGearRatio { gear: gear + 1, ratio });
            }
        }
        for (idx, pair) in dt.gear_ratios.windows(2).enumerate() {
            if pair[1] > pair[0] {
                return Err(VehicleError::GearOrder {
                    gear: idx + 1,
                    next: idx + 2,
                });
            }
        }
        if !(dt.transmission_efficiency > 0.0 && dt.transmission_efficiency <= 1.0) {
            return Err(VehicleError::InvalidEfficiency(dt.transmission_efficiency));
        }

        match &self.power {
            PowerSource::Curve(samples) => {
                if samples.len() < 2 {
                    return Err(VehicleError::CurveTooShort(samples.len()));
                }
                for sample in samples {
                    match (sample.torque_lbft, sample.hp) {
                        (None, None) => {
                            return Err(VehicleError::MissingCurveValue { rpm: sample.rpm });
                        }
                        (None, Some(_)) if !(sample.rpm > 0.0) => {
                            return Err(VehicleError::NonPositiveCurveRpm(sample.rpm));
                        }
                        _ => {}
                    }
                }
            }
            PowerSource::Flat { hp } => {
                if !(*hp > 0.0) {
                    return Err(VehicleError::NonPositiveRating(*hp));
                }
            }
            PowerSource::QuarterJr(rating) => {
                for (field, value) in [
                    ("peak_hp", rating.peak_hp),
                    ("peak_rpm", rating.peak_rpm),
                    ("displacement_cid", rating.displacement_cid),
                ] {
                    if !(value > 0.0) {
                        return Err(VehicleError::InvalidRating { field, value });
                    }
                }
            }
        }

        let launch = &self.launch;
        for (field, value) in [
            ("launch_rpm", launch.launch_rpm()),
            ("slip/stall rpm", launch.pinned_rpm()),
            ("slippage", launch.slippage()),
            ("torque_mult", launch.torque_mult()),
        ] {
            if !(value > 0.0) {
                return Err(VehicleError::InvalidLaunch { field, value });
            }
        }
        Ok(())
    }

    /// Effective tire diameter (in).
    pub fn tire_diameter_in(&self) -> f64 {
        self.tires.effective_diameter_in()
    }

    /// Static front axle load (lbf), defaulting to `default_frac` of total weight.
    pub fn static_front_weight_lb(&self, default_frac: f64) -> f64 {
        self.chassis
            .static_front_weight_lb
            .unwrap_or(default_frac * self.weight_lb)
    }

    /// CG height (in), defaulting to the tire radius plus `above_axle_in`.
    pub fn cg_height_in(&self, above_axle_in: f64) -> f64 {
        self.chassis
            .cg_height_in
            .unwrap_or(self.tire_diameter_in() / 2.0 + above_axle_in)
    }

    pub fn is_motorcycle(&self) -> bool {
        self.chassis.body_style == BodyStyle::Motorcycle
    }

    pub fn fuel_system(&self) -> FuelSystem {
        FuelSystem::new(self.fuel, self.induction)
    }

    /// Flat rating or the highest HP row on the dyno sheet.
    pub fn rated_hp(&self) -> f64 {
        let hp = match &self.power {
            PowerSource::Flat { hp } => *hp,
            PowerSource::QuarterJr(rating) => rating.peak_hp,
            PowerSource::Curve(samples) => samples
                .iter()
                .map(|s| match (s.torque_lbft, s.hp) {
                    (Some(tq), _) => tq * s.rpm / 5252.0,
                    (None, Some(hp)) => hp,
                    (None, None) => 0.0,
                })
                .fold(0.0, f64::max),
        };
        hp * self.hp_torque_mult
    }
}
