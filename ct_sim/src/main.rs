//! Headless host loop for the card table simulation.
//!
//! Runs a table at a fixed step until game over, the tick limit or Ctrl-C,
//! writing CSV telemetry on the way and printing the final standings.

mod config;
mod logging;
mod report;
mod telemetry;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::Error;
use card_table::{
    Phase, Simulation,
    scene::SceneGraph,
    telemetry::{NullTelemetry, TelemetrySink},
};
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;

use config::{Overrides, SimConfig};
use report::Summary;

const HELP: &str = "\
Run a headless card table simulation

USAGE:
  ct_sim [OPTIONS]

OPTIONS:
  --players        N       Seats at the table (2-6)          [default: env SIM_PLAYERS or 4]
  --rounds         N       Rounds before the game ends       [default: env SIM_TOTAL_ROUNDS or 10]
  --seed           N       Seed for a reproducible run       [default: env SIM_SEED or random]
  --tick-ms        MS      Fixed step length                 [default: env SIM_TICK_MS or 16]
  --max-ticks      N       Stop after this many ticks        [default: env SIM_MAX_TICKS or 1000000]
  --telemetry-dir  DIR     Append CSV telemetry in DIR       [default: env SIM_TELEMETRY_DIR or off]

FLAGS:
  --manual                 Press bet each round instead of running auto mode
  --diagnostics            Log action and round diagnostics
  --realtime               Sleep one step between ticks
  --json                   Print the summary as JSON
  -h, --help               Print help information

ENVIRONMENT:
  SIM_COINS_PER_PLAYER     Starting coins per seat           [default: 5]
  SIM_CARDS_PER_PLAYER     Cards dealt per hand              [default: 5]
  SIM_GAME_SPEED           Auto mode clock multiplier        [default: 4.0]
  SIM_DIAGNOSTICS          Log diagnostics (true/false)      [default: false]
  RUST_LOG                 Log filter                        [default: info]
  (A .env file in the working directory is loaded first)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        players: pargs.opt_value_from_str("--players")?,
        rounds: pargs.opt_value_from_str("--rounds")?,
        seed: pargs.opt_value_from_str("--seed")?,
        tick_ms: pargs.opt_value_from_str("--tick-ms")?,
        max_ticks: pargs.opt_value_from_str("--max-ticks")?,
        telemetry_dir: pargs.opt_value_from_str("--telemetry-dir")?,
        manual: pargs.contains("--manual"),
        diagnostics: pargs.contains("--diagnostics"),
        realtime: pargs.contains("--realtime"),
        json: pargs.contains("--json"),
    };

    logging::init();

    let unused = pargs.finish();
    if !unused.is_empty() {
        log::warn!("Ignoring unrecognized arguments: {unused:?}");
    }

    let config = SimConfig::from_env(overrides)?;
    config.validate()?;

    // Catching signals for a clean stop between ticks.
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    set_handler(move || handler_stop.store(true, Ordering::SeqCst))?;

    let summary = match &config.run.telemetry_dir {
        Some(dir) => run(&config, telemetry::open(dir)?, &stop)?,
        None => run(&config, NullTelemetry, &stop)?,
    };

    if config.run.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }

    Ok(())
}

/// Drive one simulation to game over, the tick limit or a stop request.
fn run<T: TelemetrySink>(
    config: &SimConfig,
    telemetry: T,
    stop: &AtomicBool,
) -> Result<Summary, Error> {
    let mut sim = Simulation::new(config.simulation.clone(), SceneGraph::new(), telemetry)?;
    let dt = config.step_seconds();
    let step = Duration::from_millis(config.run.tick_ms);
    let started = Instant::now();

    info!(
        "Starting {} simulation with {} players",
        if sim.is_auto_mode() { "auto" } else { "manual" },
        config.simulation.players
    );

    let mut ticks = 0;
    while sim.phase() != Phase::GameOver
        && ticks < config.run.max_ticks
        && !stop.load(Ordering::SeqCst)
    {
        // Manual mode opens each betting round once the table is idle.
        if !sim.is_auto_mode() && sim.scheduler.is_empty() && sim.table.pot.is_empty() {
            sim.press_bet();
        }
        sim.tick(dt);
        ticks += 1;

        if config.run.realtime {
            thread::sleep(step);
        }
    }

    if sim.phase() != Phase::GameOver {
        // Game over flushes on entry; an early stop still keeps its rows.
        sim.telemetry_mut().flush();
    }

    let summary = Summary::from_simulation(&sim, ticks);
    logging::log_run_finished(
        ticks,
        summary.rounds_played,
        summary.winner.filter(|_| summary.finished),
        started.elapsed().as_millis() as u64,
    );
    Ok(summary)
}
