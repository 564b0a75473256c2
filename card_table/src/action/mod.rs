//! Timed, delayed, eased visual actions and the queues that run them.
//!
//! An [`Action`] is pure data plus a step function: it never owns the entity
//! it animates and holds no global state. Actions are collected into
//! [`ActionQueue`]s which the [`Scheduler`] advances once per tick with
//! the deltas computed by [`Clocks`].

pub mod clock;
pub mod easing;
pub mod kinds;
pub mod queue;

pub use clock::Clocks;
pub use easing::Easing;
pub use kinds::{ActionKind, Animate, Fade, Flip, Move, Rotate, Scale};
pub use queue::{ActionQueue, QueueKind, Scheduler};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scene::{EntityId, Scene};

/// Delay and duration of an action, in seconds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Timing {
    pub delay: f32,
    pub duration: f32,
}

impl Timing {
    /// Negative or non-finite delays start immediately.
    #[must_use]
    pub fn new(delay: f32, duration: f32) -> Self {
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        Self { delay, duration }
    }
}

/// Outcome of advancing a single action by one tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    /// Still inside its delay; nothing visible happened.
    Waiting,
    Running,
    Completed,
    /// The target handle is gone; the action should be discarded.
    Dropped,
}

impl Step {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Dropped)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Action {
    pub target: EntityId,
    pub timing: Timing,
    pub easing: Easing,
    pub kind: ActionKind,
    elapsed: f32,
    started: bool,
}

impl Action {
    #[must_use]
    pub fn new(target: EntityId, kind: impl Into<ActionKind>, timing: Timing, easing: Easing) -> Self {
        Self {
            target,
            timing,
            easing,
            kind: kind.into(),
            elapsed: 0.0,
            started: false,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// `clamp((elapsed - delay) / duration, 0, 1)`.
    ///
    /// A non-positive duration means the action is instantaneous once its
    /// delay has passed.
    #[must_use]
    pub fn percent(&self) -> f32 {
        let Timing { delay, duration } = self.timing;
        if self.elapsed < delay {
            return 0.0;
        }
        if !(duration.is_finite() && duration > 0.0) {
            return 1.0;
        }
        ((self.elapsed - delay) / duration).clamp(0.0, 1.0)
    }

    /// Advance by `dt` seconds and apply the eased progress to the target.
    pub fn advance(&mut self, dt: f32, scene: &mut dyn Scene) -> Step {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        if self.elapsed < self.timing.delay {
            return Step::Waiting;
        }
        if !scene.is_valid(self.target) {
            return Step::Dropped;
        }
        if !self.started {
            self.kind.begin(scene, self.target);
            self.started = true;
        }

        let percent = self.percent();
        if percent >= 1.0 {
            return if self.kind.finish(scene, self.target) {
                Step::Completed
            } else {
                Step::Dropped
            };
        }

        if self.kind.apply(scene, self.target, self.easing.apply(percent)) {
            Step::Running
        } else {
            Step::Dropped
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.name(), self.target)
    }
}
