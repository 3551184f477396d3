use std::path::PathBuf;

use clap::Parser;
use dragstrip::models::observe;
use dragstrip::{KernelConfig, ModelId, ModelRegistry, SimInputs};
use dragstrip_cli::{InputArgs, init_logging, open_store};
use dragstrip_learning::model_key;
use dragstrip_vehicle::RaceLength;
use tracing::info;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Record an observed ET and update the vehicle's learned correction"
)]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    /// Course length the observed run was made on
    #[arg(long, default_value = "quarter")]
    length: RaceLength,

    /// ET the car actually ran (s)
    #[arg(long)]
    actual_et: Option<f64>,

    /// Directory of learned models
    #[arg(long, default_value = "artifacts/models")]
    store: PathBuf,

    /// Discard the stored model before applying the observation
    #[arg(long, default_value_t = false)]
    reset: bool,

    /// List stored model keys and exit
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    let store = open_store(Some(cli.store.as_path()))?;

    if cli.list {
        for key in store.list()? {
            println!("{key}");
        }
        return Ok(());
    }

    let loaded = cli.input.load()?;
    let key = model_key(&loaded.vehicle.id);
    if cli.reset && store.delete(&key)? {
        info!(%key, "discarded stored model");
    }

    let config = KernelConfig::default();
    let inputs = SimInputs::new(&loaded.vehicle, &loaded.env, cli.length);
    let registry = ModelRegistry::with_config(config.clone(), store.clone());
    let before = registry.simulate(ModelId::Blend, &inputs)?;

    let Some(actual_et) = cli.actual_et else {
        println!("=== {} ({}) ===", loaded.vehicle.name, key);
        println!("Blend ET {:.3} s", before.et_s);
        return Ok(());
    };

    let model = observe(store.as_ref(), &config, &inputs, actual_et)?;
    let after = registry.simulate(ModelId::Blend, &inputs)?;

    println!("=== {} ({}) ===", loaded.vehicle.name, key);
    println!("observations  {}", model.n);
    println!("confidence    {:.3}", model.confidence);
    println!("Blend ET      {:.3} s -> {:.3} s", before.et_s, after.et_s);
    println!("actual ET     {:.3} s", actual_et);
    Ok(())
}
