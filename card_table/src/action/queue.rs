//! Ordered action queues and the two-queue scheduler.

use glam::Vec3;
use std::fmt;

use super::{
    Action, ActionKind, Animate, Clocks, Easing, Fade, Flip, Move, Rotate, Scale, Step, Timing,
};
use crate::{
    diagnostics::{CATEGORY_ACTION, Diagnostics},
    scene::{EntityId, Scene},
};

/// Every tenth action advanced in the main queue is traced when
/// diagnostics are on.
const TRACE_EVERY: usize = 10;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum QueueKind {
    /// Game actions, driven by `game_dt`.
    Main,
    /// Menu actions, driven by `pause_dt`.
    Paused,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// Actions in insertion order. Insertion order is layering order, not
/// completion order.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: Vec<Action>,
    retired: Vec<EntityId>,
}

impl ActionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Drop every pending action unconditionally. No action gets a cleanup
    /// step, so a half-applied effect stays where it was.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Advance each action once, in insertion order, removing the finished
    /// ones. Returns whether the queue is empty afterwards.
    pub fn advance(&mut self, dt: f32, scene: &mut dyn Scene) -> bool {
        self.advance_traced(dt, scene, None, true)
    }

    fn advance_traced(
        &mut self,
        dt: f32,
        scene: &mut dyn Scene,
        diagnostics: Option<&Diagnostics>,
        record_retired: bool,
    ) -> bool {
        let retired = &mut self.retired;
        let mut index = 0;
        self.actions.retain_mut(|action| {
            let step = action.advance(dt, &mut *scene);
            if let Some(diagnostics) = diagnostics {
                if step != Step::Waiting && index % TRACE_EVERY == 0 {
                    diagnostics.emit(
                        CATEGORY_ACTION,
                        format_args!(
                            "Action Name: {} Action Percent: {}",
                            action.kind.name(),
                            action.percent()
                        ),
                    );
                }
            }
            index += 1;
            match step {
                Step::Completed => {
                    if record_retired && action.kind.retires_target() {
                        retired.push(action.target);
                    }
                    false
                }
                Step::Dropped => {
                    log::debug!("dropping {action}: target no longer exists");
                    false
                }
                Step::Waiting | Step::Running => true,
            }
        });
        self.actions.is_empty()
    }

    /// Handles whose fade-out completed since the last drain.
    pub fn drain_retired(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.retired)
    }
}

/// The main and paused queues plus the factory helpers that fill them.
#[derive(Debug, Default)]
pub struct Scheduler {
    pub main: ActionQueue,
    pub paused: ActionQueue,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the main queue, then the paused queue. Returns whether the
    /// main queue is empty afterwards.
    ///
    /// Only the main queue retires targets. A paused-queue fade hides the
    /// menu panel, which lives for the whole run.
    pub fn advance(
        &mut self,
        clocks: &Clocks,
        scene: &mut dyn Scene,
        diagnostics: &Diagnostics,
    ) -> bool {
        let traced = diagnostics.is_enabled().then_some(diagnostics);
        let main_empty = self.main.advance_traced(clocks.game_dt, scene, traced, true);
        self.paused.advance_traced(clocks.pause_dt, scene, None, false);
        main_empty
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    pub fn queue_mut(&mut self, kind: QueueKind) -> &mut ActionQueue {
        match kind {
            QueueKind::Main => &mut self.main,
            QueueKind::Paused => &mut self.paused,
        }
    }

    pub fn push(&mut self, queue: QueueKind, action: Action) {
        self.queue_mut(queue).push(action);
    }

    fn create(
        &mut self,
        queue: QueueKind,
        target: EntityId,
        kind: impl Into<ActionKind>,
        timing: Timing,
        easing: Easing,
    ) {
        self.push(queue, Action::new(target, kind, timing, easing));
    }

    /// Translate `target` from `start` to `end` on the main queue.
    pub fn create_move(
        &mut self,
        diagnostics: &Diagnostics,
        target: EntityId,
        start: Vec3,
        end: Vec3,
        timing: Timing,
    ) {
        diagnostics.emit(CATEGORY_ACTION, "Translate action created");
        self.create(
            QueueKind::Main,
            target,
            Move { start, end },
            timing,
            Easing::EaseInOut,
        );
    }

    pub fn create_pause_move(&mut self, target: EntityId, start: Vec3, end: Vec3, timing: Timing) {
        self.create(
            QueueKind::Paused,
            target,
            Move { start, end },
            timing,
            Easing::EaseInOut,
        );
    }

    /// Uniform scale from `old_scale` to `scale` on the paused queue.
    pub fn create_pause_scale(
        &mut self,
        target: EntityId,
        old_scale: f32,
        scale: f32,
        timing: Timing,
    ) {
        self.create(
            QueueKind::Paused,
            target,
            Scale {
                from: Vec3::splat(old_scale),
                to: Vec3::splat(scale),
            },
            timing,
            Easing::EaseInOut,
        );
    }

    /// Rotate by `amount` degrees about the z axis.
    pub fn create_rotate(
        &mut self,
        diagnostics: &Diagnostics,
        target: EntityId,
        amount: f32,
        timing: Timing,
        queue: QueueKind,
    ) {
        diagnostics.emit(CATEGORY_ACTION, "Rotate action created");
        self.create(
            queue,
            target,
            Rotate::new(Vec3::Z, amount),
            timing,
            Easing::Linear,
        );
    }

    /// Turn `target` to the facing `rotation` (degrees about y).
    pub fn create_flip(
        &mut self,
        diagnostics: &Diagnostics,
        target: EntityId,
        rotation: f32,
        timing: Timing,
    ) {
        diagnostics.emit(CATEGORY_ACTION, "Flip action created");
        self.create(
            QueueKind::Main,
            target,
            Flip::to(rotation),
            timing,
            Easing::EaseInOut,
        );
    }

    pub fn create_fade(
        &mut self,
        diagnostics: &Diagnostics,
        target: EntityId,
        alpha: f32,
        easing: Easing,
        timing: Timing,
    ) {
        diagnostics.emit(CATEGORY_ACTION, "Fade action created");
        self.create(QueueKind::Main, target, Fade::to(alpha), timing, easing);
    }

    pub fn create_pause_fade(
        &mut self,
        diagnostics: &Diagnostics,
        target: EntityId,
        alpha: f32,
        easing: Easing,
        timing: Timing,
    ) {
        diagnostics.emit(CATEGORY_ACTION, "Fade action created");
        self.create(QueueKind::Paused, target, Fade::to(alpha), timing, easing);
    }
}
