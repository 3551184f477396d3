//! Pieces shared by the command-line binaries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Args;
use dragstrip_config::{BenchmarkConfig, load_benchmarks, load_environment, load_vehicle};
use dragstrip_learning::{JsonDirStore, MemoryStore, ModelStore};
use dragstrip_vehicle::{Environment, Vehicle};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a compact stderr subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to init logging. {e}");
    }
}

/// Where the vehicle and weather come from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Benchmark fixture (TOML) supplying both vehicle and weather
    #[arg(long, conflicts_with_all = ["vehicle", "env"])]
    pub benchmark: Option<PathBuf>,

    /// Vehicle file (TOML or YAML)
    #[arg(long, requires = "env")]
    pub vehicle: Option<PathBuf>,

    /// Environment file (TOML or YAML)
    #[arg(long)]
    pub env: Option<PathBuf>,
}

/// A resolved vehicle/weather pair plus the benchmark it came from, if any.
pub struct LoadedInputs {
    pub vehicle: Vehicle,
    pub env: Environment,
    pub benchmark: Option<BenchmarkConfig>,
}

impl InputArgs {
    pub fn load(&self) -> anyhow::Result<LoadedInputs> {
        if let Some(path) = &self.benchmark {
            let bench = first_benchmark(path)?;
            return Ok(LoadedInputs {
                vehicle: bench.vehicle()?,
                env: bench.environment()?,
                benchmark: Some(bench),
            });
        }
        match (&self.vehicle, &self.env) {
            (Some(vehicle), Some(env)) => {
                let vehicle = load_vehicle(vehicle)
                    .with_context(|| format!("loading vehicle {}", vehicle.display()))?;
                let env = load_environment(env)
                    .with_context(|| format!("loading environment {}", env.display()))?;
                Ok(LoadedInputs {
                    vehicle,
                    env,
                    benchmark: None,
                })
            }
            _ => Err(anyhow!("pass --benchmark, or both --vehicle and --env")),
        }
    }
}

fn first_benchmark(path: &Path) -> anyhow::Result<BenchmarkConfig> {
    load_benchmarks(path)
        .with_context(|| format!("loading benchmark {}", path.display()))?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no benchmark found in {}", path.display()))
}

/// JSON directory store when a path is given, otherwise an empty in-memory one.
pub fn open_store(path: Option<&Path>) -> anyhow::Result<Arc<dyn ModelStore>> {
    match path {
        Some(root) => {
            let store = JsonDirStore::open(root)
                .with_context(|| format!("opening model store {}", root.display()))?;
            info!(root = %root.display(), "using model store");
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
