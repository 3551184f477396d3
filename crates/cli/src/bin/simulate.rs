use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use dragstrip::report::{Comparison, print_timeslip, write_timeslip_rows, write_trace};
use dragstrip::{ModelId, ModelRegistry, SimInputs, SimOptions};
use dragstrip_cli::{InputArgs, init_logging, open_store};
use dragstrip_export::json::write_json;
use dragstrip_export::{timeslip, writer_for_path};
use dragstrip_vehicle::RaceLength;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Simulate one drag-race pass")]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    /// Course length: eighth or quarter
    #[arg(long, default_value = "quarter")]
    length: RaceLength,

    /// Physics model: SimpleV1, RSACLASSIC, or Blend
    #[arg(long, default_value = "RSACLASSIC")]
    model: ModelId,

    /// Write the full result as JSON (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the timeslip as CSV (`-` for stdout)
    #[arg(long)]
    timeslip_csv: Option<PathBuf>,

    /// Record traces and write them as CSV
    #[arg(long)]
    trace_csv: Option<PathBuf>,

    /// Directory of learned models used by Blend
    #[arg(long)]
    store: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let loaded = cli.input.load()?;
    let store = open_store(cli.store.as_deref())?;
    let registry = ModelRegistry::new(store);

    let options = SimOptions {
        record_traces: cli.trace_csv.is_some(),
        cancel: None,
    };
    let inputs = SimInputs::new(&loaded.vehicle, &loaded.env, cli.length).with_options(options);
    let result = registry.simulate(cli.model, &inputs)?;
    info!(model = %cli.model, et_s = result.et_s, mph = result.mph, "simulation finished");

    let to_stdout = |p: &Option<PathBuf>| {
        p.as_deref()
            .map(|p| p.as_os_str() == "-")
            .unwrap_or(false)
    };
    let quiet = to_stdout(&cli.json) || to_stdout(&cli.timeslip_csv) || to_stdout(&cli.trace_csv);
    if !quiet {
        println!(
            "=== {} | {} | {} ===",
            loaded.vehicle.name, cli.length, cli.model
        );
        print_timeslip(&result);
        if let Some(target) = loaded
            .benchmark
            .as_ref()
            .and_then(|b| b.targets.get(cli.length))
        {
            let cmp = Comparison::new(&result, target);
            println!(
                "target {:.3} s / {:.2} mph -> {}",
                target.et_s,
                target.mph,
                if cmp.passed() { "PASS" } else { "FAIL" }
            );
        }
    }

    if let Some(path) = &cli.json {
        write_json(path, &result)?;
    }
    if let Some(path) = &cli.timeslip_csv {
        let mut writer = writer_for_path(path)?;
        timeslip::write_header(&mut *writer)?;
        write_timeslip_rows(&mut *writer, &loaded.vehicle.id, cli.length, &result)?;
        writer.flush()?;
    }
    if let Some(path) = &cli.trace_csv {
        let mut writer = writer_for_path(path)?;
        write_trace(&mut *writer, &result)?;
        writer.flush()?;
    }
    Ok(())
}
