//! # Card Table
//!
//! A tick-driven card table simulation built on a cooperative action scheduler.
//!
//! Every visible change (a card sliding to a hand, a coin hopping into the pot,
//! a seat marker fading out) is an [`action::Action`]: a delayed, timed
//! interpolation of one entity's transform or opacity. Actions live in one of
//! two queues that the host advances once per frame. The main queue runs on the
//! game clock and stops while the pause menu is open; the paused queue keeps the
//! menu itself animating.
//!
//! ## Round Flow
//!
//! The round controller sits on top of the scheduler:
//!
//! - **Deal**: each seat gets a fanned hand, the human seat's cards face up
//! - **Bet / Fold**: the human seat's buttons drive every other seat's reaction
//! - **Resolve**: once all animations finish, the best hand takes the pot
//! - **Eliminate**: players without coins leave; the last one standing wins
//!
//! ## Core Modules
//!
//! - [`action`]: Actions, easing, the two queues and their clocks
//! - [`game`]: Table state, round controller and game state machine
//! - [`scene`]: The entity store actions animate
//! - [`telemetry`]: CSV rows written at round and game end
//! - [`diagnostics`]: Runtime-toggleable trace output
//!
//! ## Example
//!
//! ```
//! use card_table::{Phase, Simulation, SimulationSettings, scene::SceneGraph,
//!     telemetry::NullTelemetry};
//!
//! let settings = SimulationSettings { seed: Some(7), ..SimulationSettings::default() };
//! let mut sim = Simulation::new(settings, SceneGraph::new(), NullTelemetry).unwrap();
//! sim.press_bet();
//! sim.tick(1.0 / 60.0);
//! assert_eq!(sim.phase(), Phase::Playing);
//! ```

/// Timed entity animations and the queues that run them.
pub mod action;
pub use action::{Action, ActionKind, Animate, Clocks, Easing, QueueKind, Scheduler, Timing};

/// Table state, round controller and game state machine.
pub mod game;
pub use game::{
    MenuOption, Phase, RoundError, Simulation, SimulationSettings, SettingsError, Standing,
    constants,
    entities::{self, Card, Player, PlayStyle, Table},
};

pub mod diagnostics;
pub mod scene;
pub mod telemetry;
