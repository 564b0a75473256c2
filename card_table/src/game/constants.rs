//! Table limits, geometry and animation timings.

use glam::Vec3;

pub const MIN_PLAYERS: usize = 2;
/// Seats with a defined play style.
pub const MAX_PLAYERS: usize = 6;
pub const DECK_SIZE: usize = 52;

pub const DEFAULT_PLAYERS: usize = 4;
pub const DEFAULT_COINS_PER_PLAYER: usize = 5;
pub const DEFAULT_CARDS_PER_PLAYER: usize = 5;
pub const DEFAULT_TOTAL_ROUNDS: u32 = 10;
pub const DEFAULT_GAME_SPEED: f32 = 4.0;

// === Geometry ===

pub const SEAT_RADIUS: f32 = 4.0;
/// Off-table spot where the deck sits and dealt cards start from.
pub const STAGING_ANGLE: f32 = -20.0;
pub const STAGING_RADIUS: f32 = 10.0;
pub const LABEL_ANGLE: f32 = 90.0;
pub const LABEL_RADIUS: f32 = 2.0;
pub const OFF_TABLE: Vec3 = Vec3::new(100.0, 100.0, 0.0);
pub const COIN_OFFSET: Vec3 = Vec3::new(0.6, 0.0, 0.0);
pub const COIN_STACK_STEP: f32 = 0.05;
pub const MENU_HIDDEN: Vec3 = Vec3::new(0.0, -12.0, -1.0);
pub const MENU_SHOWN: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Card facings about the y axis, in degrees.
pub const FACE_DOWN: f32 = 0.0;
pub const FACE_UP: f32 = 180.0;

// === Betting ===

pub const BET_BASE_DELAY: f32 = 2.0;
pub const BET_DURATION: f32 = 1.0;
pub const BET_JITTER: f32 = 0.5;
pub const BET_TURN_DIVISOR: f32 = 5.0;

// === Folding ===

pub const FOLD_BASE_DELAY: f32 = 4.0;
pub const FOLD_MOVE_DURATION: f32 = 1.0;
pub const FLIP_DURATION: f32 = 1.0;

// === Dealing ===

pub const DEAL_FIRST_ROUND_DELAY: f32 = 0.5;
/// Later rounds wait for the previous round's cards to travel home.
pub const DEAL_LATER_ROUND_DELAY: f32 = 6.0;
pub const DEAL_CARD_STAGGER: f32 = 0.25;
pub const DEAL_MOVE_DURATION: f32 = 3.0;
pub const FAN_START_FACTOR: f32 = 0.35;
pub const FAN_STEP: f32 = 0.45;
pub const HAND_OFFSET: f32 = 0.8;

// === Resolution ===

pub const WINNER_DELAY: f32 = 1.0;
pub const WINNER_DURATION: f32 = 2.0;
pub const RETURN_DURATION: f32 = 1.0;
pub const ELIMINATION_FADE_DELAY: f32 = 1.0;
pub const ELIMINATION_FADE_DURATION: f32 = 2.0;

// === Resizing ===

pub const RESIZE_COIN_DELAY: f32 = 1.0;
pub const RESIZE_COIN_DIVISOR: f32 = 10.0;
pub const RESIZE_COIN_DURATION: f32 = 5.0;
pub const RESIZE_FADE_DELAY: f32 = 1.0;
pub const RESIZE_FADE_DURATION: f32 = 3.0;

// === Pause menu ===

pub const MENU_SLIDE_DURATION: f32 = 0.5;
pub const MENU_WIGGLE_DEGREES: f32 = 10.0;

/// Point on a circle around the table centre. Angles are in degrees,
/// counter-clockwise from +x.
#[must_use]
pub fn polar(angle: f32, radius: f32) -> Vec3 {
    let radians = angle.to_radians();
    Vec3::new(radius * radians.cos(), radius * radians.sin(), 0.0)
}

#[must_use]
pub fn staging_position() -> Vec3 {
    polar(STAGING_ANGLE, STAGING_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_axes() {
        let right = polar(0.0, 2.0);
        assert!((right - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        let up = polar(90.0, 2.0);
        assert!((up - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_full_table_fits_in_deck() {
        assert!(MAX_PLAYERS * DEFAULT_CARDS_PER_PLAYER <= DECK_SIZE);
    }
}
