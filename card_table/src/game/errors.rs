//! Round and settings error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::EntityId;

/// Structural inconsistencies met while mutating the table.
///
/// Precondition misses (no cards, no stake, unknown seat) are not errors;
/// those operations report `Ok(false)`.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RoundError {
    #[error("deck has {available} cards, need {needed}")]
    DeckExhausted { needed: usize, available: usize },
    #[error("entity {0} is not in the scene")]
    MissingEntity(EntityId),
}

/// Invalid simulation settings.
#[derive(Clone, Debug, Deserialize, Error, PartialEq, Serialize)]
pub enum SettingsError {
    #[error("player count {0} is outside {min}..={max}", min = super::constants::MIN_PLAYERS, max = super::constants::MAX_PLAYERS)]
    PlayerCount(usize),
    #[error("need at least one card per player")]
    NoCards,
    #[error("{players} players x {cards} cards exceeds the {deck}-card deck")]
    DeckTooSmall {
        players: usize,
        cards: usize,
        deck: usize,
    },
    #[error("need at least one coin per player")]
    NoCoins,
    #[error("need at least one round")]
    NoRounds,
    #[error("game speed must be positive, got {0}")]
    GameSpeed(f32),
}

pub type RoundResult<T> = Result<T, RoundError>;
