//! Scoring hands, awarding the pot, starting the next round and removing
//! players who ran out of coins.

use glam::Vec3;
use rand::seq::SliceRandom;

use super::{
    constants::{
        COIN_OFFSET, COIN_STACK_STEP, ELIMINATION_FADE_DELAY, ELIMINATION_FADE_DURATION,
        RETURN_DURATION, WINNER_DELAY, WINNER_DURATION, staging_position,
    },
    entities::Player,
    state_machine::{Phase, Simulation},
};
use crate::{
    action::{Easing, Timing},
    diagnostics::CATEGORY_ROUND,
    scene::Scene,
    telemetry::{Outcome, TelemetrySink, player_outcome_row, round_summary_row},
};

/// Sum of the card values in a hand.
#[must_use]
pub fn score(player: &Player) -> u32 {
    player.cards.iter().map(|card| u32::from(card.value)).sum()
}

impl<S: Scene, T: TelemetrySink> Simulation<S, T> {
    /// Score every hand and hand the pot to the best one.
    ///
    /// Only players with a stake are eligible, unless every seat went all
    /// in, in which case everyone is. A tie goes to the first eligible seat
    /// in table order. Writes the round summary and, once the pot moves,
    /// starts the next round and writes the per-player outcome. Returns the
    /// winning seat.
    pub fn find_winner(&mut self) -> Option<usize> {
        for player in &mut self.table.players {
            player.score = score(player);
        }
        let all_in = self.table.players_remaining() == 0;
        let mut best: Option<(usize, u32)> = None;
        for (seat, player) in self.table.players.iter().enumerate() {
            if player.coins.is_empty() && !all_in {
                continue;
            }
            if best.is_none_or(|(_, top)| player.score > top) {
                best = Some((seat, player.score));
            }
        }

        let scores: Vec<u32> = self.table.players.iter().map(|p| p.score).collect();
        self.telemetry
            .write_round_summary(&round_summary_row(self.table.round, &scores));

        let (winner, top) = best?;
        if self.table.pot.is_empty() {
            return Some(winner);
        }

        let won = self.table.pot.len();
        self.award_pot(winner);
        let resolved_round = self.table.round;
        let outcomes: Vec<(usize, Outcome)> = self
            .table
            .players
            .iter()
            .enumerate()
            .map(|(seat, player)| {
                let outcome = if seat == winner {
                    Outcome::Won
                } else if player.folded_this_round {
                    Outcome::Folded
                } else {
                    Outcome::Lost
                };
                (player.coins.len(), outcome)
            })
            .collect();
        let id = self.table.players[winner].id;

        self.new_round();
        self.telemetry
            .write_player_outcome(&player_outcome_row(resolved_round, &outcomes));
        if self.phase == Phase::Playing {
            self.phase = Phase::RoundEnd;
        }
        log::info!("Round {resolved_round}: player {id} wins {won} coins with {top}");
        Some(winner)
    }

    /// Stack the pot onto the winner's coins.
    fn award_pot(&mut self, winner: usize) {
        let player = &self.table.players[winner];
        let anchor = player
            .coins
            .first()
            .and_then(|&coin| self.scene.transform(coin))
            .map_or(player.seat + COIN_OFFSET, |transform| transform.position);
        let base = player.coins.len();

        let pot = std::mem::take(&mut self.table.pot);
        for (i, &coin) in pot.iter().enumerate() {
            let start = self
                .scene
                .transform(coin)
                .map_or(Vec3::ZERO, |transform| transform.position);
            let end = anchor + Vec3::new(0.0, 0.0, (base + i) as f32 * COIN_STACK_STEP);
            self.scheduler.create_move(
                &self.diagnostics,
                coin,
                start,
                end,
                Timing::new(WINNER_DELAY, WINNER_DURATION),
            );
        }
        self.table.players[winner].coins.extend(pot);
    }

    /// Fold every hand back into the deck, reshuffle, bump the round
    /// counter and arm the next deal.
    ///
    /// The counter holds while the pause menu is open or the game is over.
    pub fn new_round(&mut self) {
        for seat in 0..self.table.players.len() {
            if let Err(e) = self.fold(seat, seat as f32) {
                log::warn!("Seat {seat} could not fold for the next round: {e}");
            }
        }
        self.table.deck.shuffle(&mut self.rng);

        if self.pause_menu.is_open() || self.clocks.is_frozen() {
            self.diagnostics.emit(
                CATEGORY_ROUND,
                format_args!("Round {} held while paused", self.table.round),
            );
        } else {
            self.table.round += 1;
        }
        for player in &mut self.table.players {
            player.folded_this_round = false;
        }
        self.deal_armed = true;
    }

    /// Remove every player without a stake, returning their cards to the
    /// deck and fading out their markers. Returns how many were removed.
    ///
    /// Enters game over when exactly one player is left with a stake.
    pub fn remove_loser(&mut self) -> usize {
        let mut removed = 0;
        let mut seat = 0;
        while seat < self.table.players.len() {
            if self.table.players[seat].coins.is_empty() {
                let player = self.table.players.remove(seat);
                self.eliminate(player);
                removed += 1;
            } else {
                seat += 1;
            }
        }

        if self.table.players_remaining() == 1 {
            self.enter_game_over();
        }
        removed
    }

    fn eliminate(&mut self, player: Player) {
        let deck_top = self
            .table
            .deck
            .first()
            .and_then(|card| self.scene.transform(card.entity))
            .map_or_else(staging_position, |transform| transform.position);
        for card in &player.cards {
            let start = self
                .scene
                .transform(card.entity)
                .map_or(deck_top, |transform| transform.position);
            self.scheduler.create_move(
                &self.diagnostics,
                card.entity,
                start,
                deck_top,
                Timing::new(0.0, RETURN_DURATION),
            );
        }
        self.scheduler.create_fade(
            &self.diagnostics,
            player.marker,
            0.0,
            Easing::EaseOut,
            Timing::new(ELIMINATION_FADE_DELAY, ELIMINATION_FADE_DURATION),
        );
        log::info!("{player} is out in round {}", self.table.round);
        self.table.deck.extend(player.cards);
    }
}
