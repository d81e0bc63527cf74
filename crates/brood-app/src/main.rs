use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use brood_app::game_loop::{self, LoopOptions};
use brood_app::{init_logging, scenario};
use brood_core::config::BroodConfig;

/// Headless runner for the BROOD hostile-creature simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; defaults apply to anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// JSON array of commands queued before the first tick
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Override the RNG seed from the config
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks to run; 0 runs until interrupted
    #[arg(short, long, default_value_t = 900)]
    ticks: u64,
    /// Run as fast as possible instead of at the tick rate
    #[arg(long)]
    fast: bool,
    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> anyhow::Result<BroodConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            BroodConfig::from_json_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => BroodConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let commands = match &args.scenario {
        Some(path) => scenario::load_scenario(path)?,
        None => scenario::demo_scenario(),
    };
    info!(
        seed = config.seed,
        commands = commands.len(),
        ticks = args.ticks,
        "BROOD starting"
    );

    let options = LoopOptions {
        max_ticks: (args.ticks > 0).then_some(args.ticks),
        realtime: !args.fast,
    };
    let handle = game_loop::spawn_game_loop(config, commands, options)
        .context("failed to start game loop")?;
    let summary = handle.join()?;

    if let Some(snapshot) = &summary.final_snapshot {
        info!(
            tick = snapshot.time.tick,
            enemies = snapshot.enemies.len(),
            live = snapshot.population.live,
            registered = snapshot.population.registered,
            "final state"
        );
        if args.dump {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        }
    }
    Ok(())
}
