use std::{path::PathBuf, time::Instant};

use eyre::WrapErr;
use tracing::info;
use tract_aggregate::{DataPaths, load_dataset, write_csv};
use tract_geom::PlanarOracle;
use tract_sched::{SchedulerConfig, schedule};

const USAGE: &str = "Usage: tract-aggregate data_dir [mode threads]
data_dir = The data set to load from $TRACT_DATA_ROOT/tests/<data_dir>/.
mode     = sequential (s), static-partition (pb) or work-stealing (ps). Default: sequential.
threads  = Number of worker threads for the parallel modes.

Environment:
TRACT_DATA_ROOT      = Data root directory (default: ../data)
TRACT_DEQUE_CAPACITY = Slots per work-stealing deque (default: 8192)
RUST_LOG             = Log filter";

fn config_from_args(args: &[String]) -> eyre::Result<SchedulerConfig> {
    let mut config = match args.get(2) {
        Some(mode) => SchedulerConfig::parse(mode, args.get(3).map(String::as_str))?,
        None => SchedulerConfig::sequential(),
    };
    if let Ok(raw) = std::env::var("TRACT_DEQUE_CAPACITY") {
        config = config.with_deque_capacity_str(&raw)?;
    }
    Ok(config)
}

#[allow(clippy::print_stdout)]
fn report_elapsed(seconds: f64) {
    println!("{seconds:.2}");
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tract_aggregate=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(data_set) = args.get(1) else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let config = config_from_args(&args)?;
    let root = std::env::var_os("TRACT_DATA_ROOT")
        .map_or_else(|| PathBuf::from("../data"), PathBuf::from);
    let paths = DataPaths::new(&root, data_set);

    info!(data_set = %data_set, mode = %config.mode, threads = config.threads.get(), "running");

    let (tracts, zones) = load_dataset(&paths, &PlanarOracle)
        .wrap_err_with(|| format!("failed to load data set {data_set:?}"))?;

    let start = Instant::now();
    let totals = schedule(&config, &PlanarOracle, &tracts, zones)?;
    let elapsed = start.elapsed();

    write_csv(&paths.output, &totals)
        .wrap_err_with(|| format!("failed to write {}", paths.output.display()))?;
    info!(output = %paths.output.display(), zones = totals.len(), "wrote totals");

    report_elapsed(elapsed.as_secs_f64());
    Ok(())
}
