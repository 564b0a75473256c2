/// Property-based tests for action timing using proptest
///
/// These tests verify that actions progress monotonically and land exactly
/// on their end state across arbitrary frame-delta sequences.
use card_table::{
    Action, Easing, Timing,
    action::{ActionQueue, Fade, Move, Scale},
    scene::{EntityKind, Scene, SceneGraph, Transform},
};
use glam::Vec3;
use proptest::prelude::*;

// Strategy for a frame delta, including zero-length frames
fn dt_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), 0.0f32..0.5]
}

fn easing_strategy() -> impl Strategy<Value = Easing> {
    prop_oneof![
        Just(Easing::Linear),
        Just(Easing::EaseIn),
        Just(Easing::EaseOut),
        Just(Easing::EaseInOut),
    ]
}

fn vec3_strategy() -> impl Strategy<Value = Vec3> {
    (-50.0f32..50.0, -50.0f32..50.0, -5.0f32..5.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn test_percent_is_monotonic(
        delay in 0.0f32..3.0,
        duration in 0.01f32..3.0,
        dts in prop::collection::vec(dt_strategy(), 1..80),
    ) {
        let mut scene = SceneGraph::new();
        let target = scene.create(EntityKind::Coin, Transform::default());
        let mut action = Action::new(
            target,
            Move { start: Vec3::ZERO, end: Vec3::ONE },
            Timing::new(delay, duration),
            Easing::Linear,
        );

        let mut last = action.percent();
        prop_assert_eq!(last, 0.0);
        for dt in dts {
            let step = action.advance(dt, &mut scene);
            let percent = action.percent();
            prop_assert!(percent >= last, "percent went from {} to {}", last, percent);
            prop_assert!((0.0..=1.0).contains(&percent));
            if action.elapsed() < delay {
                prop_assert_eq!(percent, 0.0);
            }
            last = percent;
            if step.is_finished() {
                break;
            }
        }
    }

    #[test]
    fn test_move_lands_exactly_on_end(
        start in vec3_strategy(),
        end in vec3_strategy(),
        delay in 0.0f32..2.0,
        duration in 0.01f32..2.0,
        easing in easing_strategy(),
        dts in prop::collection::vec(0.01f32..0.3, 1..40),
    ) {
        let mut scene = SceneGraph::new();
        let target = scene.create(EntityKind::Card, Transform::at(start));
        let mut queue = ActionQueue::new();
        queue.push(Action::new(target, Move { start, end }, Timing::new(delay, duration), easing));

        for dt in &dts {
            queue.advance(*dt, &mut scene);
        }
        // Finish with frames long enough to cover whatever is left.
        while !queue.advance(0.5, &mut scene) {}

        prop_assert_eq!(scene.transform(target).unwrap().position, end);
    }

    #[test]
    fn test_fade_and_scale_pin_their_targets(
        alpha in 0.0f32..=1.0,
        scale in 0.1f32..4.0,
        dts in prop::collection::vec(dt_strategy(), 0..20),
    ) {
        let mut scene = SceneGraph::new();
        let target = scene.create(EntityKind::Panel, Transform::default());
        let mut queue = ActionQueue::new();
        queue.push(Action::new(target, Fade::to(alpha), Timing::new(0.0, 1.0), Easing::EaseOut));
        queue.push(Action::new(
            target,
            Scale { from: Vec3::ONE, to: Vec3::splat(scale) },
            Timing::new(0.5, 1.0),
            Easing::EaseInOut,
        ));

        for dt in dts {
            queue.advance(dt, &mut scene);
        }
        while !queue.advance(0.5, &mut scene) {}

        prop_assert_eq!(scene.opacity(target), Some(alpha));
        prop_assert_eq!(scene.transform(target).unwrap().scale, Vec3::splat(scale));
    }
}
