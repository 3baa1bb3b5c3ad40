use efm_runner::{Simulation, SimulationConfig};
use std::path::PathBuf;

fn print_help() {
    eprintln!(
        r#"Emergent Firms Simulator - agents forming, growing and dissolving firms

USAGE:
    efm-sim [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --seed <N>          Override the random seed
    --ticks <N>         Override the number of ticks
    --output <DIR>      Directory for the run history (default: .)
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    # Run with defaults
    efm-sim

    # Run a config file for 100 ticks
    efm-sim --config lending_off.json --ticks 100 --output runs
"#
    );
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let Some(value) = value else {
        eprintln!("Error: {} requires a value", flag);
        std::process::exit(1);
    };
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            eprintln!("Error: invalid value for {}: {}", flag, value);
            std::process::exit(1);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut ticks: Option<u64> = None;
    let mut output = PathBuf::from(".");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                config_path = Some(parse_value("--config", args.get(i)));
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_value("--seed", args.get(i)));
            }
            "--ticks" => {
                i += 1;
                ticks = Some(parse_value("--ticks", args.get(i)));
            }
            "--output" | "-o" => {
                i += 1;
                output = parse_value("--output", args.get(i));
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            SimulationConfig::from_file(&path)?
        }
        None => {
            log::info!("Using default configuration");
            SimulationConfig::default()
        }
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(ticks) = ticks {
        config.tmax = ticks;
    }
    config.validate()?;

    let experiment = config.experiment.clone();
    let history = Simulation::new(config)?.run()?;

    std::fs::create_dir_all(&output)?;
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = output.join(format!("{}_{}.json", experiment, stamp));
    let file = std::io::BufWriter::new(std::fs::File::create(&path)?);
    serde_json::to_writer(file, &history)?;

    if let Some(census) = history.final_census() {
        log::info!(
            "Final census: {} firms, {} singletons, largest firm {}, wage gini {:.3}",
            census.num_firms,
            census.num_singletons,
            census.largest_firm_size,
            census.wage_gini
        );
    }
    log::info!("Run history written to {}", path.display());

    Ok(())
}
