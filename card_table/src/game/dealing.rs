//! Dealing a fresh hand to every seat.

use glam::Vec3;

use super::{
    constants::{
        DEAL_CARD_STAGGER, DEAL_FIRST_ROUND_DELAY, DEAL_LATER_ROUND_DELAY, DEAL_MOVE_DURATION,
        FACE_DOWN, FACE_UP, FAN_START_FACTOR, FAN_STEP, FLIP_DURATION, HAND_OFFSET,
        staging_position,
    },
    errors::{RoundError, RoundResult},
    state_machine::Simulation,
};
use crate::{
    action::Timing, diagnostics::CATEGORY_ROUND, scene::Scene, telemetry::TelemetrySink,
};

impl<S: Scene, T: TelemetrySink> Simulation<S, T> {
    /// Deal each active seat up to a full hand, if a deal is armed.
    ///
    /// Consumes the armed flag, so a second call before the next round
    /// does nothing. Returns how many seats received cards.
    pub fn deal_new_round(&mut self) -> usize {
        if !self.deal_armed {
            return 0;
        }
        self.deal_armed = false;

        let mut dealt = 0;
        for seat in 0..self.table.players.len() {
            match self.deal_to(seat) {
                Ok(true) => dealt += 1,
                Ok(false) => {}
                Err(e) => log::warn!("Could not deal to seat {seat}: {e}"),
            }
        }
        if dealt > 0 {
            self.diagnostics.emit(
                CATEGORY_ROUND,
                format_args!("Dealt round {} to {dealt} players", self.table.round),
            );
        }
        dealt
    }

    fn deal_to(&mut self, seat: usize) -> RoundResult<bool> {
        let per_player = self.table.cards_per_player;
        let Some(player) = self.table.players.get(seat) else {
            return Ok(false);
        };
        if !player.active || player.cards.len() >= per_player {
            return Ok(false);
        }

        let held = player.cards.len();
        let needed = per_player - held;
        if self.table.deck.len() < needed {
            return Err(RoundError::DeckExhausted {
                needed,
                available: self.table.deck.len(),
            });
        }

        let facing = if player.is_human() { FACE_UP } else { FACE_DOWN };
        // Hands sit between the seat and the centre of the table.
        let hand_y = if player.seat.y < 0.0 {
            player.seat.y + HAND_OFFSET
        } else {
            player.seat.y - HAND_OFFSET
        };
        let first_x = player.seat.x - per_player as f32 / 2.0 * FAN_START_FACTOR;

        let start = staging_position();
        let mut delay = if self.table.round < 2 {
            DEAL_FIRST_ROUND_DELAY
        } else {
            DEAL_LATER_ROUND_DELAY
        };
        let cards: Vec<_> = self.table.deck.drain(..needed).collect();
        for (slot, card) in (held..).zip(&cards) {
            let end = Vec3::new(first_x + slot as f32 * FAN_STEP, hand_y, 0.0);
            self.scheduler.create_flip(
                &self.diagnostics,
                card.entity,
                facing,
                Timing::new(0.0, FLIP_DURATION),
            );
            self.scheduler.create_move(
                &self.diagnostics,
                card.entity,
                start,
                end,
                Timing::new(delay, DEAL_MOVE_DURATION),
            );
            delay += DEAL_CARD_STAGGER;
        }
        self.table.players[seat].cards.extend(cards);
        Ok(true)
    }
}
