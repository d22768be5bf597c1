use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{
    sync::mpsc::unbounded_channel,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tracing::{info, warn};

use runner::{
    Simulation,
    config::{init_tracing, load_script, load_tuning},
    io::{Format, forward_snapshots, snapshot_writer_task},
    levels::LevelDef,
    script::Script,
};
use common::config::TuningConfig;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "Headless stealth level runner", long_about = None)]
struct Args {
    // Builtin level: mansion, gallery or vault
    #[arg(short, long, default_value = "mansion")]
    level: String,

    // Level definition file, overrides --level
    #[arg(long)]
    level_file: Option<PathBuf>,

    // Autopilot script; without one the player stands still
    #[arg(short, long)]
    script: Option<PathBuf>,

    // Tuning overrides
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    // Seed for the vault code and paper location
    #[arg(long)]
    seed: Option<u64>,

    // Simulation ticks per second
    #[arg(long, default_value_t = 60)]
    hz: u32,

    // Stop after this many ticks even without an outcome
    #[arg(long)]
    max_ticks: Option<u64>,

    // Pace ticks in real time and use wall-clock deltas
    #[arg(long, default_value_t = false)]
    realtime: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    // Snapshot output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let level = match &args.level_file {
        Some(path) => LevelDef::load(path)?,
        None => LevelDef::builtin(&args.level)?,
    };
    let tuning = match &args.tuning {
        Some(path) => load_tuning(path)?,
        None => TuningConfig::default(),
    };
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => Script::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("seed {seed}");

    let mut sim = Simulation::new(&level, tuning, script, seed)
        .with_context(|| format!("failed to set up level '{}'", level.name))?;

    // Channel for sending snapshots from the simulation to the writer task
    let (to_writer, from_sim) = unbounded_channel();
    let writer = tokio::spawn(snapshot_writer_task(args.output.clone(), args.format, from_sim));

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(args.hz.max(1)));
    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("starting level '{}' at {} Hz", level.name, args.hz);

    let mut last_tick = Instant::now();
    let outcome = loop {
        if args.max_ticks.is_some_and(|max| sim.tick() >= max) {
            break None;
        }

        let delta = if args.realtime {
            interval.tick().await;
            let now = Instant::now();
            let delta = now - last_tick;
            last_tick = now;
            delta
        } else {
            tick_duration
        };

        let update_start = Instant::now();
        let outcome = sim.step(delta);
        let update_elapsed = update_start.elapsed();

        if update_elapsed > tick_duration {
            warn!(
                "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                sim.tick(),
                update_elapsed.as_secs_f64() * 1000.0,
                tick_duration.as_secs_f64() * 1000.0
            );
        }

        // The writer only stops early on an I/O error, reported below
        if !forward_snapshots(&to_writer, sim.drain_snapshots()) {
            warn!("snapshot writer stopped at tick {}", sim.tick());
            break outcome;
        }

        if outcome.is_some() {
            break outcome;
        }
    };

    drop(to_writer);
    writer.await.context("snapshot writer panicked")??;

    match outcome {
        Some(outcome) if outcome.is_failure() => warn!(?outcome, "level failed after {} ticks", sim.tick()),
        Some(outcome) => info!(?outcome, "level cleared after {} ticks", sim.tick()),
        None => info!("stopped after {} ticks without an outcome", sim.tick()),
    }
    Ok(())
}
