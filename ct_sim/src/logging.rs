//! Structured logging configuration.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! picks those records up alongside native `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Features:
/// - Configurable log levels via RUST_LOG env var (default `info`)
/// - Source file and line on every event
/// - Diagnostic categories (`Action`, `Round`, `Table`) usable as filter targets
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log the end of a run with structured data
///
/// # Arguments
///
/// * `ticks` - Ticks executed
/// * `rounds` - Rounds resolved
/// * `winner` - Overall winner, if the game finished
/// * `elapsed_ms` - Wall-clock duration in milliseconds
pub fn log_run_finished(ticks: u64, rounds: u32, winner: Option<usize>, elapsed_ms: u64) {
    match winner {
        Some(winner) => tracing::info!(
            ticks = ticks,
            rounds = rounds,
            winner = winner,
            elapsed_ms = elapsed_ms,
            "Simulation finished"
        ),
        None => tracing::warn!(
            ticks = ticks,
            rounds = rounds,
            elapsed_ms = elapsed_ms,
            "Simulation stopped before game over"
        ),
    }
}
