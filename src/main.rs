//! # Gridlock Command Line
//!
//! Generates levels from a seed or a config file, validates every guarantee,
//! and prints a summary line per level.

use clap::Parser;
use gridlock::{
    collect_keys, GenerationConfig, Generator, GridlockError, GridlockResult, Level,
    SectorDungeonGenerator,
};
use log::{error, info};

/// Command line arguments for the level generator.
#[derive(Parser, Debug)]
#[command(name = "gridlock")]
#[command(about = "Sector-grid roguelike level generator with solvable lock-and-key puzzles")]
#[command(version)]
struct Args {
    /// Random seed for level generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of consecutive seeds to generate
    #[arg(short, long, default_value_t = 1)]
    count: u64,

    /// JSON generation config; its seed is overridden by --seed
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the number of sectors per side
    #[arg(long)]
    grid_size: Option<usize>,

    /// Build every corridor through the repair loop
    #[arg(long)]
    repair_only: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

fn run(args: &Args) -> GridlockResult<()> {
    info!("Starting Gridlock v{}", gridlock::VERSION);

    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(grid_size) = args.grid_size {
        config.grid_size = grid_size;
    }
    config.validate()?;

    let generator = if args.repair_only {
        SectorDungeonGenerator::repair_only()
    } else {
        SectorDungeonGenerator::new()
    };

    let base_seed = config.seed;
    for offset in 0..args.count {
        let level_config = GenerationConfig {
            seed: base_seed.wrapping_add(offset),
            ..config.clone()
        };
        let mut rng = gridlock::generation::utils::create_rng(&level_config);
        let level = generator.generate(&level_config, &mut rng)?;
        check_walkthrough(&level, level_config.seed)?;
        println!("{}", summary(&level, level_config.seed));
    }

    Ok(())
}

/// Confirms on the tile map that every key is collectable and the exit reachable.
fn check_walkthrough(level: &Level, seed: u64) -> GridlockResult<()> {
    let walk = collect_keys(level);
    if !walk.collected_all(level) || !walk.exit_reachable {
        return Err(GridlockError::GenerationFailed(format!(
            "seed {}: walkthrough collected {:?}, exit reachable: {}",
            seed, walk.collected, walk.exit_reachable
        )));
    }
    Ok(())
}

fn summary(level: &Level, seed: u64) -> String {
    let locks: Vec<String> = level
        .keys
        .iter()
        .map(|key| format!("{}@{}", key.color, key.room))
        .collect();

    format!(
        "seed={} rooms={} corridors={} walkable={} start={} exit={}{} locks=[{}]",
        seed,
        level.rooms.len(),
        level.corridors.len(),
        level.map.len(),
        level.start_room,
        level.exit_room,
        level.exit,
        locks.join(",")
    )
}
