//! Configuration models and loaders for vehicles, environments, and benchmark fixtures.

use std::fs::File;
use std::path::{Path, PathBuf};

use dragstrip_vehicle::{
    Aero, BodyStyle, Chassis, Drivetrain, Environment, FuelType, Induction, Inertia,
    LaunchDevice, PowerSource, QuarterJrRating, RaceLength, ShiftPolicy, ThrottleStop, Tires,
    TorqueSample, Vehicle, VehicleError,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Vehicle record as written in TOML/YAML.
#[derive(Debug, Deserialize, Clone)]
pub struct VehicleConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub weight_lb: f64,
    /// Defaults by weight for a QuarterJr sheet, otherwise to a winged dragster.
    #[serde(default)]
    pub body_style: Option<BodyStyle>,
    #[serde(default)]
    pub wheelbase_in: Option<f64>,
    #[serde(default)]
    pub overhang_in: Option<f64>,
    #[serde(default)]
    pub cg_height_in: Option<f64>,
    #[serde(default)]
    pub static_front_weight_lb: Option<f64>,
    /// Staging rollout (in).
    #[serde(default)]
    pub rollout_in: Option<f64>,
    #[serde(default)]
    pub tire_diameter_in: Option<f64>,
    pub tire_width_in: f64,
    /// Measured tire circumference (in).
    #[serde(default)]
    pub tire_rollout_in: Option<f64>,
    #[serde(default)]
    pub frontal_area_ft2: f64,
    #[serde(default)]
    pub cd: f64,
    #[serde(default)]
    pub lift_coeff: f64,
    pub final_drive: f64,
    #[serde(default = "default_transmission_efficiency")]
    pub transmission_efficiency: f64,
    pub gear_ratios: Vec<f64>,
    #[serde(default)]
    pub gear_efficiencies: Vec<f64>,
    #[serde(default)]
    pub shift_rpm: Vec<f64>,
    /// Time-based shift schedule; takes precedence over `shift_rpm` when present.
    #[serde(default)]
    pub shift_times_s: Option<Vec<f64>>,
    #[serde(default)]
    pub rev_limiter_rpm: Option<f64>,
    pub launch: LaunchConfig,
    #[serde(default)]
    pub power_hp: Option<f64>,
    #[serde(default)]
    pub power_curve: Vec<CurveRowConfig>,
    /// Peak rating to synthesize the sheet from when there is no dyno curve.
    #[serde(default)]
    pub quarter_jr: Option<QuarterJrConfig>,
    #[serde(default = "default_hp_torque_mult")]
    pub hp_torque_mult: f64,
    #[serde(default)]
    pub inertia: InertiaConfig,
    #[serde(default)]
    pub fuel: Option<FuelType>,
    #[serde(default)]
    pub induction: Induction,
    #[serde(default)]
    pub throttle_stop: Option<ThrottleStopConfig>,
}

fn default_transmission_efficiency() -> f64 {
    0.97
}

fn default_hp_torque_mult() -> f64 {
    1.0
}

/// Launch device block, tagged by `type`. An omitted `launch_rpm` means the car leaves at its
/// slip or stall speed.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum LaunchConfig {
    #[serde(rename = "clutch")]
    Clutch {
        #[serde(default)]
        launch_rpm: Option<f64>,
        slip_rpm: f64,
        #[serde(default = "default_slippage")]
        slippage: f64,
        #[serde(default)]
        lockup: bool,
    },
    #[serde(rename = "converter")]
    Converter {
        #[serde(default)]
        launch_rpm: Option<f64>,
        stall_rpm: f64,
        #[serde(default = "default_slippage")]
        slippage: f64,
        #[serde(default = "default_torque_mult")]
        torque_mult: f64,
        #[serde(default)]
        lockup: bool,
        #[serde(default)]
        diameter_in: Option<f64>,
    },
    #[serde(other)]
    Unsupported,
}

fn default_slippage() -> f64 {
    1.0
}

fn default_torque_mult() -> f64 {
    1.0
}

/// QuarterJr rating block.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct QuarterJrConfig {
    pub peak_hp: f64,
    pub peak_rpm: f64,
    pub displacement_cid: f64,
}

/// One dyno row; either `hp` or `torque_lbft` must be set.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CurveRowConfig {
    pub rpm: f64,
    #[serde(default)]
    pub hp: Option<f64>,
    #[serde(default)]
    pub torque_lbft: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct InertiaConfig {
    pub engine: f64,
    pub transmission: f64,
    pub tires: f64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ThrottleStopConfig {
    pub activate_s: f64,
    pub duration_s: f64,
    pub throttle_pct: f64,
    #[serde(default)]
    pub ramp_s: f64,
}

/// Weather and track record. Omitted fields take standard-day values.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub elevation_ft: f64,
    pub barometer_inhg: f64,
    pub temperature_f: f64,
    pub humidity_pct: f64,
    pub wind_mph: f64,
    pub wind_angle_deg: f64,
    pub track_temp_f: Option<f64>,
    pub traction_index: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            elevation_ft: env.elevation_ft,
            barometer_inhg: env.barometer_inhg,
            temperature_f: env.temperature_f,
            humidity_pct: env.humidity_pct,
            wind_mph: env.wind_mph,
            wind_angle_deg: env.wind_angle_deg,
            track_temp_f: env.track_temp_f,
            traction_index: env.traction_index,
        }
    }
}

/// Expected printout result for one course length.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RaceTarget {
    pub et_s: f64,
    pub mph: f64,
    pub tol_et_s: f64,
    pub tol_mph: f64,
    #[serde(default)]
    pub t60_s: Option<f64>,
}

impl RaceTarget {
    pub fn et_within(&self, et_s: f64) -> bool {
        (et_s - self.et_s).abs() <= self.tol_et_s
    }

    pub fn mph_within(&self, mph: f64) -> bool {
        (mph - self.mph).abs() <= self.tol_mph
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct TargetsConfig {
    #[serde(default)]
    pub eighth: Option<RaceTarget>,
    #[serde(default)]
    pub quarter: Option<RaceTarget>,
}

impl TargetsConfig {
    pub fn get(&self, length: RaceLength) -> Option<&RaceTarget> {
        match length {
            RaceLength::Eighth => self.eighth.as_ref(),
            RaceLength::Quarter => self.quarter.as_ref(),
        }
    }
}

/// Benchmark fixture: a vehicle, its weather, and the legacy printout it must reproduce.
#[derive(Debug, Deserialize, Clone)]
pub struct BenchmarkConfig {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub fuel: Option<FuelType>,
    #[serde(default)]
    pub env: EnvironmentConfig,
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
}

impl BenchmarkConfig {
    /// Domain vehicle, with the fixture name as its id when the vehicle block has none.
    pub fn vehicle(&self) -> Result<Vehicle, ConfigError> {
        let mut record = self.vehicle.clone();
        if record.id.is_none() {
            record.id = Some(self.name.clone());
        }
        if record.fuel.is_none() {
            record.fuel = self.fuel;
        }
        Vehicle::try_from(&record)
    }

    pub fn environment(&self) -> Result<Environment, ConfigError> {
        Environment::try_from(&self.env)
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] VehicleError),
    #[error("unsupported launch device in vehicle '{0}'")]
    Unsupported(String),
    #[error("no records found in {0}")]
    Empty(PathBuf),
}

impl TryFrom<&VehicleConfig> for Vehicle {
    type Error = ConfigError;

    fn try_from(cfg: &VehicleConfig) -> Result<Self, Self::Error> {
        let name = cfg
            .name
            .clone()
            .or_else(|| cfg.id.clone())
            .unwrap_or_else(|| "vehicle".to_string());
        let id = cfg.id.clone().unwrap_or_else(|| name.clone());

        let launch = match cfg.launch {
            LaunchConfig::Clutch {
                launch_rpm,
                slip_rpm,
                slippage,
                lockup,
            } => LaunchDevice::Clutch {
                launch_rpm: launch_rpm.unwrap_or(slip_rpm),
                slip_rpm,
                slippage,
                lockup,
            },
            LaunchConfig::Converter {
                launch_rpm,
                stall_rpm,
                slippage,
                torque_mult,
                lockup,
                diameter_in,
            } => LaunchDevice::Converter {
                launch_rpm: launch_rpm.unwrap_or(stall_rpm),
                stall_rpm,
                slippage,
                torque_mult,
                lockup,
                diameter_in,
            },
            LaunchConfig::Unsupported => return Err(ConfigError::Unsupported(id)),
        };

        let power = if !cfg.power_curve.is_empty() {
            PowerSource::Curve(
                cfg.power_curve
                    .iter()
                    .map(|row| TorqueSample {
                        rpm: row.rpm,
                        torque_lbft: row.torque_lbft,
                        hp: row.hp,
                    })
                    .collect(),
            )
        } else if let Some(jr) = cfg.quarter_jr {
            PowerSource::QuarterJr(QuarterJrRating {
                peak_hp: jr.peak_hp,
                peak_rpm: jr.peak_rpm,
                displacement_cid: jr.displacement_cid,
            })
        } else if let Some(hp) = cfg.power_hp {
            PowerSource::Flat { hp }
        } else {
            return Err(VehicleError::CurveTooShort(0).into());
        };

        let shift = match &cfg.shift_times_s {
            Some(times) => ShiftPolicy::Time(times.clone()),
            None => ShiftPolicy::Rpm(cfg.shift_rpm.clone()),
        };

        let body_style = cfg.body_style.unwrap_or_else(|| match &power {
            PowerSource::QuarterJr(_) => BodyStyle::for_weight(cfg.weight_lb),
            _ => BodyStyle::default(),
        });

        let defaults = Chassis::default();
        let vehicle = Vehicle {
            id,
            name,
            weight_lb: cfg.weight_lb,
            chassis: Chassis {
                wheelbase_in: cfg.wheelbase_in.unwrap_or(defaults.wheelbase_in),
                overhang_in: cfg.overhang_in,
                cg_height_in: cfg.cg_height_in,
                static_front_weight_lb: cfg.static_front_weight_lb,
                body_style,
            },
            tires: Tires {
                diameter_in: cfg.tire_diameter_in.unwrap_or(0.0),
                width_in: cfg.tire_width_in,
                rollout_in: cfg.tire_rollout_in,
            },
            aero: Aero {
                cd: cfg.cd,
                cl: cfg.lift_coeff,
                frontal_area_ft2: cfg.frontal_area_ft2,
            },
            drivetrain: Drivetrain {
                final_drive: cfg.final_drive,
                gear_ratios: cfg.gear_ratios.clone(),
                gear_efficiencies: cfg.gear_efficiencies.clone(),
                transmission_efficiency: cfg.transmission_efficiency,
                shift,
                rev_limiter_rpm: cfg.rev_limiter_rpm,
            },
            launch,
            power,
            hp_torque_mult: cfg.hp_torque_mult,
            inertia: Inertia {
                engine: cfg.inertia.engine,
                transmission: cfg.inertia.transmission,
                tires: cfg.inertia.tires,
            },
            fuel: cfg.fuel.unwrap_or_default(),
            induction: cfg.induction,
            rollout_in: cfg.rollout_in,
            throttle_stop: cfg.throttle_stop.map(|stop| ThrottleStop {
                activate_s: stop.activate_s,
                duration_s: stop.duration_s,
                throttle_pct: stop.throttle_pct,
                ramp_s: stop.ramp_s,
            }),
        };
        vehicle.validate()?;
        Ok(vehicle)
    }
}

impl TryFrom<&EnvironmentConfig> for Environment {
    type Error = ConfigError;

    fn try_from(cfg: &EnvironmentConfig) -> Result<Self, Self::Error> {
        let env = Environment {
            elevation_ft: cfg.elevation_ft,
            temperature_f: cfg.temperature_f,
            barometer_inhg: cfg.barometer_inhg,
            humidity_pct: cfg.humidity_pct,
            wind_mph: cfg.wind_mph,
            wind_angle_deg: cfg.wind_angle_deg,
            track_temp_f: cfg.track_temp_f,
            traction_index: cfg.traction_index,
        };
        env.validate()?;
        Ok(env)
    }
}

/// Load benchmark fixtures from a directory of TOML files, a single TOML file, or a YAML catalog.
pub fn load_benchmarks<P: AsRef<Path>>(path: P) -> Result<Vec<BenchmarkConfig>, ConfigError> {
    load_records(path)
}

/// Load vehicle records without converting them.
pub fn load_vehicle_configs<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleConfig>, ConfigError> {
    load_records(path)
}

/// Load and validate the first vehicle in `path`.
pub fn load_vehicle<P: AsRef<Path>>(path: P) -> Result<Vehicle, ConfigError> {
    let path = path.as_ref();
    let configs: Vec<VehicleConfig> = load_records(path)?;
    let first = configs
        .first()
        .ok_or_else(|| ConfigError::Empty(path.to_path_buf()))?;
    Vehicle::try_from(first)
}

/// Load and validate the first environment in `path`.
pub fn load_environment<P: AsRef<Path>>(path: P) -> Result<Environment, ConfigError> {
    let path = path.as_ref();
    let configs: Vec<EnvironmentConfig> = load_records(path)?;
    let first = configs
        .first()
        .ok_or_else(|| ConfigError::Empty(path.to_path_buf()))?;
    Environment::try_from(first)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!(path = %path.display(), "loading configuration records");
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
