//! Card table simulation - round controller and game state machine.
//!
//! This module provides the table-level game built on the action scheduler:
//! - Seats, stakes, deck and pot bookkeeping
//! - Betting, folding and dealing as animated actions
//! - Round resolution, elimination and game over
//! - Pause menu, auto mode and table resizing

// Submodules
pub mod constants;
pub mod entities;
pub mod errors;
pub mod pause;
pub mod state_machine;

mod betting;
mod dealing;
mod resolution;

pub use errors::{RoundError, RoundResult, SettingsError};
pub use pause::{MenuOption, PauseCounters, PauseMenu};
pub use resolution::score;
pub use state_machine::{Phase, Simulation, SimulationSettings, Standing, overall_winner};
