//! Pheme headless runner
//!
//! Plays a scenario for a number of ticks, writes every event as JSONL and
//! prints the final world snapshot as JSON on stdout.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pheme_core::{demo_scenario, EventLogger, Scenario, Simulation, Tuning, DEFAULT_TUNING_PATH};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "pheme")]
#[command(about = "Social network simulation with word-of-mouth diffusion")]
struct Args {
    /// Random seed for reproducibility (overrides the tuning file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate (overrides the tuning file)
    #[arg(long)]
    ticks: Option<u64>,

    /// Scenario file; the built-in demo world is used when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Tuning file
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Write events to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Print an intermediate snapshot every N ticks (overrides the tuning file)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // An explicit tuning file must load; the default one is optional
    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::load_or_default(DEFAULT_TUNING_PATH),
    };
    if let Some(seed) = args.seed {
        tuning.simulation.seed = seed;
    }
    let ticks = args.ticks.unwrap_or(tuning.simulation.default_ticks);
    let snapshot_interval = args
        .snapshot_interval
        .unwrap_or(tuning.simulation.snapshot_interval);

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => demo_scenario()?,
    };

    info!(seed = tuning.simulation.seed, ticks, "starting simulation");

    let mut sim = Simulation::new(&tuning);
    scenario.apply(&mut sim)?;

    let mut logger = match &args.events {
        Some(path) => EventLogger::new(path)?,
        None => EventLogger::null(),
    };

    scenario.trigger_due(&mut sim, 0);
    logger.log_batch(&sim.drain_events())?;

    for _ in 0..ticks {
        let Some(report) = sim.step() else {
            warn!("clock paused; stopping");
            break;
        };
        scenario.trigger_due(&mut sim, report.tick);
        logger.log_batch(&sim.drain_events())?;

        if report.evolution.relationships_formed > 0 || report.delivery.delivered > 0 {
            info!(
                tick = report.tick,
                formed = report.evolution.relationships_formed,
                delivered = report.delivery.delivered,
                dropped = report.delivery.dropped,
                pending = report.delivery.pending,
                "tick complete"
            );
        }

        if snapshot_interval > 0 && report.tick % snapshot_interval == 0 {
            println!("{}", sim.snapshot().to_json_pretty()?);
        }
    }

    logger.flush()?;
    info!(
        tick = sim.current_tick(),
        events = logger.event_count(),
        delivered = logger.count_of("interaction_delivered"),
        formed = logger.count_of("relationship_formed"),
        characters = sim.graph().character_count(),
        relationships = sim.graph().relationship_count(),
        "simulation complete"
    );

    println!("{}", sim.snapshot().to_json_pretty()?);
    Ok(())
}
