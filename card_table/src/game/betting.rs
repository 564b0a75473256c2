//! Bets, folds and the per-tick trigger sweep.

use glam::Vec3;
use rand::{Rng, seq::SliceRandom};
use std::fmt;

use super::{
    constants::{
        BET_BASE_DELAY, BET_DURATION, BET_JITTER, BET_TURN_DIVISOR, FACE_DOWN, FLIP_DURATION,
        FOLD_BASE_DELAY, FOLD_MOVE_DURATION, staging_position,
    },
    errors::{RoundError, RoundResult},
    state_machine::Simulation,
};
use crate::{
    action::Timing,
    diagnostics::CATEGORY_ROUND,
    scene::Scene,
    telemetry::TelemetrySink,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Reaction {
    Bet,
    Fold,
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bet => write!(f, "bet"),
            Self::Fold => write!(f, "fold"),
        }
    }
}

impl<S: Scene, T: TelemetrySink> Simulation<S, T> {
    /// Move up to the seat's bet amount from its stake into the pot.
    ///
    /// Returns `Ok(false)` without touching the table when the seat does
    /// not exist or holds no cards or no coins. Coin transforms are looked
    /// up before anything moves, so a missing entity also leaves the table
    /// untouched.
    pub fn bet(&mut self, seat: usize, turn_index: f32) -> RoundResult<bool> {
        let Some(player) = self.table.players.get(seat) else {
            self.diagnostics
                .emit(CATEGORY_ROUND, format_args!("No seat {seat} to bet from"));
            return Ok(false);
        };
        if player.cards.is_empty() || player.coins.is_empty() {
            self.diagnostics
                .emit(CATEGORY_ROUND, format_args!("{player} has nothing to bet"));
            return Ok(false);
        }

        let wager = player.bet_amount.min(player.coins.len());
        let starts = player.coins[..wager]
            .iter()
            .map(|&coin| {
                self.scene
                    .transform(coin)
                    .map(|transform| (coin, transform.position))
                    .ok_or(RoundError::MissingEntity(coin))
            })
            .collect::<RoundResult<Vec<_>>>()?;

        let delay = BET_BASE_DELAY + turn_index / BET_TURN_DIVISOR;
        for (coin, start) in starts {
            let end = Vec3::new(
                self.rng.random_range(-BET_JITTER..BET_JITTER),
                self.rng.random_range(-BET_JITTER..BET_JITTER),
                self.rng.random_range(-BET_JITTER..BET_JITTER),
            );
            self.scheduler.create_move(
                &self.diagnostics,
                coin,
                start,
                end,
                Timing::new(delay, BET_DURATION),
            );
            self.table.pot.push(coin);
        }

        let player = &mut self.table.players[seat];
        player.coins.drain(..wager);
        player.bet_trigger = false;
        self.diagnostics.emit(
            CATEGORY_ROUND,
            format_args!("Player {} bets {wager}", player.id),
        );
        Ok(true)
    }

    /// Flip the seat's cards face-down and send them back to the deck,
    /// which is then reshuffled.
    ///
    /// Returns `Ok(false)` when the seat does not exist or has no cards,
    /// so folding twice is harmless.
    pub fn fold(&mut self, seat: usize, turn_index: f32) -> RoundResult<bool> {
        let player_count = self.table.players.len();
        let Some(player) = self.table.players.get_mut(seat) else {
            self.diagnostics
                .emit(CATEGORY_ROUND, format_args!("No seat {seat} to fold"));
            return Ok(false);
        };
        player.fold_trigger = false;
        if player.cards.is_empty() {
            return Ok(false);
        }
        let cards = std::mem::take(&mut player.cards);
        let id = player.id;

        let deck_position = staging_position();
        let delay = FOLD_BASE_DELAY + turn_index / player_count as f32;
        for card in &cards {
            let start = self
                .scene
                .transform(card.entity)
                .map_or(deck_position, |transform| transform.position);
            self.scheduler.create_flip(
                &self.diagnostics,
                card.entity,
                FACE_DOWN,
                Timing::new(0.0, FLIP_DURATION),
            );
            self.scheduler.create_move(
                &self.diagnostics,
                card.entity,
                start,
                deck_position,
                Timing::new(delay, FOLD_MOVE_DURATION),
            );
        }
        self.table.deck.extend(cards);
        self.table.deck.shuffle(&mut self.rng);
        self.diagnostics
            .emit(CATEGORY_ROUND, format_args!("Player {id} folds"));
        Ok(true)
    }

    /// Act on the human seat's button presses, then let every other seat
    /// react according to its trigger.
    pub(crate) fn sweep_triggers(&mut self) {
        if self.table.players.is_empty() || !(self.bet_pressed || self.fold_pressed) {
            return;
        }
        if self.bet_pressed {
            self.react(0, Reaction::Bet, 0.0);
        }
        if self.fold_pressed {
            self.react(0, Reaction::Fold, 0.0);
        }

        for seat in 1..self.table.players.len() {
            let player = &self.table.players[seat];
            let reaction = if player.bet_trigger {
                Reaction::Bet
            } else if player.fold_trigger {
                Reaction::Fold
            } else {
                continue;
            };
            self.react(seat, reaction, seat as f32);
        }
    }

    fn react(&mut self, seat: usize, reaction: Reaction, turn_index: f32) {
        let result = match reaction {
            Reaction::Bet => self.bet(seat, turn_index),
            Reaction::Fold => self.fold(seat, turn_index),
        };
        match result {
            Ok(done) => {
                if let Some(player) = self.table.players.get_mut(seat) {
                    match reaction {
                        Reaction::Bet => player.bet_trigger = false,
                        Reaction::Fold => {
                            player.fold_trigger = false;
                            player.folded_this_round |= done;
                        }
                    }
                }
            }
            Err(e) => log::warn!("Seat {seat} could not {reaction}: {e}"),
        }
    }
}
