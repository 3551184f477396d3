use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use dragstrip::report::Comparison;
use dragstrip::{ModelId, ModelRegistry, SimInputs};
use dragstrip_cli::init_logging;
use dragstrip_config::load_benchmarks;
use dragstrip_export::{benchmark, writer_for_path};
use dragstrip_learning::MemoryStore;
use dragstrip_vehicle::RaceLength;
use tracing::warn;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Run benchmark fixtures and compare against their reference timeslips"
)]
struct Cli {
    /// Fixture directory or single TOML file
    #[arg(long, default_value = "data/benchmarks")]
    dir: PathBuf,

    /// Restrict to one course length (default: every length with a target)
    #[arg(long)]
    length: Option<RaceLength>,

    /// Physics model to run
    #[arg(long, default_value = "RSACLASSIC")]
    model: ModelId,

    /// Write comparison rows as CSV (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Exit with an error if any run misses its tolerance
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let fixtures = load_benchmarks(&cli.dir)?;
    let registry = ModelRegistry::new(Arc::new(MemoryStore::new()));
    let lengths: Vec<RaceLength> = match cli.length {
        Some(length) => vec![length],
        None => vec![RaceLength::Eighth, RaceLength::Quarter],
    };

    let mut writer = match &cli.csv {
        Some(path) => {
            let mut w = writer_for_path(path)?;
            benchmark::write_header(&mut *w)?;
            Some(w)
        }
        None => None,
    };

    let quiet = cli
        .csv
        .as_deref()
        .map(|p| p.as_os_str() == "-")
        .unwrap_or(false);
    if !quiet {
        println!("=== Benchmarks ({}) ===", cli.model);
    }
    let mut runs = 0usize;
    let mut failures = 0usize;
    for fixture in &fixtures {
        let vehicle = fixture.vehicle()?;
        let env = fixture.environment()?;
        for &length in &lengths {
            let Some(target) = fixture.targets.get(length) else {
                continue;
            };
            let inputs = SimInputs::new(&vehicle, &env, length);
            let result = registry.simulate(cli.model, &inputs)?;
            let cmp = Comparison::new(&result, target);
            runs += 1;
            if !cmp.passed() {
                failures += 1;
                warn!(
                    name = %fixture.name,
                    length = length.as_str(),
                    et_s = result.et_s,
                    target_et_s = target.et_s,
                    mph = result.mph,
                    target_mph = target.mph,
                    "outside tolerance"
                );
            }
            if !quiet {
                println!(
                    "{:<20} {:<7} ET {:>7.3} (target {:>6.3})  MPH {:>7.2} (target {:>6.2})  {}",
                    fixture.name,
                    length.as_str(),
                    result.et_s,
                    target.et_s,
                    result.mph,
                    target.mph,
                    if cmp.passed() { "PASS" } else { "FAIL" }
                );
            }
            if let Some(w) = writer.as_mut() {
                cmp.write_row(&mut **w, &fixture.name, length, cli.model.as_str())?;
            }
        }
    }
    if let Some(w) = writer.as_mut() {
        w.flush()?;
    }
    if !quiet {
        println!("{} of {} runs within tolerance", runs - failures, runs);
    }

    if cli.strict && failures > 0 {
        return Err(anyhow!("{failures} benchmark run(s) outside tolerance"));
    }
    Ok(())
}
