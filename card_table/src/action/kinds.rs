//! Per-kind interpolation for the five action kinds.

use enum_dispatch::enum_dispatch;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::{EntityId, Scene, Transform};

/// Interpolation step shared by every action kind.
///
/// `apply` and `finish` return `false` when the target handle is no longer
/// valid, which tells the queue to drop the action.
#[enum_dispatch]
pub trait Animate {
    fn name(&self) -> &'static str;

    /// Capture start values that are defined as "current" rather than
    /// recorded at creation. Called once, on the first tick past the delay.
    fn begin(&mut self, _scene: &dyn Scene, _target: EntityId) {}

    fn apply(&self, scene: &mut dyn Scene, target: EntityId, eased: f32) -> bool;

    /// Pin the entity to the exact end state.
    fn finish(&self, scene: &mut dyn Scene, target: EntityId) -> bool;

    /// Whether completing this action leaves the target retired.
    fn retires_target(&self) -> bool {
        false
    }
}

fn update_transform(
    scene: &mut dyn Scene,
    target: EntityId,
    update: impl FnOnce(&mut Transform),
) -> bool {
    let Some(mut transform) = scene.transform(target) else {
        return false;
    };
    update(&mut transform);
    scene.set_transform(target, transform)
}

/// Translate between a start and end position recorded at creation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Move {
    pub start: Vec3,
    pub end: Vec3,
}

impl Animate for Move {
    fn name(&self) -> &'static str {
        "Translate"
    }

    fn apply(&self, scene: &mut dyn Scene, target: EntityId, eased: f32) -> bool {
        update_transform(scene, target, |t| {
            t.position = self.start.lerp(self.end, eased);
        })
    }

    fn finish(&self, scene: &mut dyn Scene, target: EntityId) -> bool {
        update_transform(scene, target, |t| t.position = self.end)
    }
}

/// Turn a card about its vertical axis to a fixed facing.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Flip {
    pub from: f32,
    pub to: f32,
}

impl Flip {
    #[must_use]
    pub fn to(facing: f32) -> Self {
        Self {
            from: facing,
            to: facing,
        }
    }
}

impl Animate for Flip {
    fn name(&self) -> &'static str {
        "Flip"
    }

    fn begin(&mut self, scene: &dyn Scene, target: EntityId) {
        if let Some(transform) = scene.transform(target) {
            self.from = transform.rotation.y;
        }
    }

    fn apply(&self, scene: &mut dyn Scene, target: EntityId, eased: f32) -> bool {
        update_transform(scene, target, |t| {
            t.rotation.y = self.from + (self.to - self.from) * eased;
        })
    }

    fn finish(&self, scene: &mut dyn Scene, target: EntityId) -> bool {
        update_transform(scene, target, |t| t.rotation.y = self.to)
    }
}

/// Incremental rotation of `amount` degrees around a fixed axis.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Rotate {
    pub axis: Vec3,
    pub amount: f32,
    pub base: Vec3,
}

impl Rotate {
    #[must_use]
    pub fn new(axis: Vec3, amount: f32) -> Self {
        Self {
            axis: axis.normalize_or(Vec3::Z),
            amount,
            base: Vec3::ZERO,
        }
    }
}

impl Animate for Rotate {
    fn name(&self) -> &'static str {
        "Rotate"
    }

    fn begin(&mut self, scene: &dyn Scene, target: EntityId) {
        if let Some(transform) = scene.transform(target) {
            self.base = transform.rotation;
        }
    }

    fn apply(&self, scene: &mut dyn Scene, target: EntityId, eased: f32) -> bool {
        update_transform(scene, target, |t| {
            t.rotation = self.base + self.axis * (self.amount * eased);
        })
    }

    fn finish(&self, scene: &mut dyn Scene, target: EntityId) -> bool {
        update_transform(scene, target, |t| {
            t.rotation = self.base + self.axis * self.amount;
        })
    }
}

/// Opacity from the entity's current alpha to `to`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Fade {
    pub from: f32,
    pub to: f32,
}

impl Fade {
    #[must_use]
    pub fn to(alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        Self {
            from: alpha,
            to: alpha,
        }
    }
}

impl Animate for Fade {
    fn name(&self) -> &'static str {
        "Fade"
    }

    fn begin(&mut self, scene: &dyn Scene, target: EntityId) {
        if let Some(opacity) = scene.opacity(target) {
            self.from = opacity;
        }
    }

    fn apply(&self, scene: &mut dyn Scene, target: EntityId, eased: f32) -> bool {
        scene.set_opacity(target, self.from + (self.to - self.from) * eased)
    }

    fn finish(&self, scene: &mut dyn Scene, target: EntityId) -> bool {
        scene.set_opacity(target, self.to)
    }

    fn retires_target(&self) -> bool {
        self.to == 0.0
    }
}

/// Scale between two factors, uniform or per axis.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Scale {
    pub from: Vec3,
    pub to: Vec3,
}

impl Animate for Scale {
    fn name(&self) -> &'static str {
        "Scale"
    }

    fn apply(&self, scene: &mut dyn Scene, target: EntityId, eased: f32) -> bool {
        update_transform(scene, target, |t| t.scale = self.from.lerp(self.to, eased))
    }

    fn finish(&self, scene: &mut dyn Scene, target: EntityId) -> bool {
        update_transform(scene, target, |t| t.scale = self.to)
    }
}

#[enum_dispatch(Animate)]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ActionKind {
    Move,
    Flip,
    Rotate,
    Fade,
    Scale,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EntityKind, SceneGraph};

    fn scene_with_entity() -> (SceneGraph, EntityId) {
        let mut scene = SceneGraph::new();
        let id = scene.create(EntityKind::Card, Transform::default());
        (scene, id)
    }

    #[test]
    fn test_move_interpolates_and_pins() {
        let (mut scene, id) = scene_with_entity();
        let kind = ActionKind::from(Move {
            start: Vec3::ZERO,
            end: Vec3::new(2.0, 4.0, 0.0),
        });
        assert!(kind.apply(&mut scene, id, 0.5));
        assert_eq!(
            scene.transform(id).unwrap().position,
            Vec3::new(1.0, 2.0, 0.0)
        );
        assert!(kind.finish(&mut scene, id));
        assert_eq!(
            scene.transform(id).unwrap().position,
            Vec3::new(2.0, 4.0, 0.0)
        );
    }

    #[test]
    fn test_flip_captures_current_facing() {
        let (mut scene, id) = scene_with_entity();
        let mut transform = scene.transform(id).unwrap();
        transform.rotation.y = 180.0;
        scene.set_transform(id, transform);

        let mut kind = ActionKind::from(Flip::to(0.0));
        kind.begin(&scene, id);
        kind.apply(&mut scene, id, 0.5);
        assert_eq!(scene.transform(id).unwrap().rotation.y, 90.0);
        kind.finish(&mut scene, id);
        assert_eq!(scene.transform(id).unwrap().rotation.y, 0.0);
    }

    #[test]
    fn test_rotate_is_incremental_from_base() {
        let (mut scene, id) = scene_with_entity();
        let mut transform = scene.transform(id).unwrap();
        transform.rotation.z = 10.0;
        scene.set_transform(id, transform);

        let mut kind = ActionKind::from(Rotate::new(Vec3::Z, 90.0));
        kind.begin(&scene, id);
        kind.finish(&mut scene, id);
        assert_eq!(scene.transform(id).unwrap().rotation.z, 100.0);
    }

    #[test]
    fn test_rotate_zero_axis_falls_back_to_z() {
        let rotate = Rotate::new(Vec3::ZERO, 45.0);
        assert_eq!(rotate.axis, Vec3::Z);
    }

    #[test]
    fn test_fade_to_zero_retires_target() {
        let (mut scene, id) = scene_with_entity();
        let mut kind = ActionKind::from(Fade::to(0.0));
        kind.begin(&scene, id);
        kind.apply(&mut scene, id, 0.25);
        assert_eq!(scene.opacity(id), Some(0.75));
        kind.finish(&mut scene, id);
        assert_eq!(scene.opacity(id), Some(0.0));
        assert!(kind.retires_target());
        assert!(scene.is_valid(id), "fading never destroys the entity");
    }

    #[test]
    fn test_fade_in_does_not_retire() {
        assert!(!ActionKind::from(Fade::to(1.0)).retires_target());
    }

    #[test]
    fn test_scale_non_uniform() {
        let (mut scene, id) = scene_with_entity();
        let kind = ActionKind::from(Scale {
            from: Vec3::ONE,
            to: Vec3::new(2.0, 3.0, 1.0),
        });
        kind.finish(&mut scene, id);
        assert_eq!(scene.transform(id).unwrap().scale, Vec3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_invalid_target_reports_failure() {
        let (mut scene, id) = scene_with_entity();
        scene.destroy(id);
        let kind = ActionKind::from(Move {
            start: Vec3::ZERO,
            end: Vec3::ONE,
        });
        assert!(!kind.apply(&mut scene, id, 0.5));
        assert!(!kind.finish(&mut scene, id));
    }
}
