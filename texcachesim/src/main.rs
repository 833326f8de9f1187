use std::fs::File;
use std::io::BufReader;
use std::time::Instant;
use clap::Parser;
use log::info;
use texcachelib::config::SimulationConfig;
use texcachelib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Texture cache locality simulator for fixed and adaptive block formats"))]
struct Args {
    config: String,

    /// Overrides the seed of the random access pattern
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let start = Instant::now();
    let args = Args::parse();
    let config_file = File::open(&args.config).map_err(|e| format!("Couldn't open the config file at path {}: {e}", args.config))?;
    let mut config: SimulationConfig = serde_json::from_reader(BufReader::new(config_file)).map_err(|e| format!("Couldn't parse the config file: {e}"))?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!("Building {} texture", config.texture.format());
    let mut simulator = Simulator::from_config(&config).map_err(|e| format!("Couldn't set up the simulation: {e}"))?;
    let result = simulator.simulate(&mut config.build_patterns());
    println!("{}", serde_json::to_string_pretty(result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes texture construction and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        println!("Uninitialised cache lines after the last pattern: {}", simulator.get_uninitialised_line_count());
    }
    Ok(())
}
