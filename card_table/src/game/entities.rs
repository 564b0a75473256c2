use glam::Vec3;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{
    COIN_OFFSET, COIN_STACK_STEP, DECK_SIZE, FACE_DOWN, SEAT_RADIUS, polar, staging_position,
};
use crate::scene::{EntityId, EntityKind, Scene, Transform};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Numeric rank of a card, ace=1 through king=13.
pub type Value = u8;

/// A card's face plus the handle of the entity that shows it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
    pub entity: EntityId,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.value {
            1 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.suit);
        write!(f, "{repr:>4}")
    }
}

/// How a seat reacts when the human seat bets or folds.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlayStyle {
    /// The locally controlled seat; acts only on button presses.
    Human,
    /// Always bets a fixed amount.
    Bettor(usize),
    /// Always folds.
    Folder,
    /// Bets a random amount in `min..max`.
    Gambler { min: usize, max: usize },
}

impl PlayStyle {
    /// Style for a seat index, cycling through the six known seats.
    #[must_use]
    pub fn for_seat(seat: usize) -> Self {
        match seat % 6 {
            0 => Self::Human,
            1 => Self::Bettor(2),
            2 => Self::Bettor(1),
            3 => Self::Folder,
            4 => Self::Gambler { min: 1, max: 4 },
            _ => Self::Bettor(4),
        }
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Bettor(amount) => write!(f, "bets {amount}"),
            Self::Folder => write!(f, "folds"),
            Self::Gambler { min, max } => write!(f, "bets {min}..{max}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    /// 1-based player number. Stays with the player when seats shift.
    pub id: usize,
    pub marker: EntityId,
    pub seat: Vec3,
    pub cards: Vec<Card>,
    pub coins: Vec<EntityId>,
    pub bet_amount: usize,
    pub bet_trigger: bool,
    pub fold_trigger: bool,
    pub score: u32,
    pub active: bool,
    pub folded_this_round: bool,
    pub style: PlayStyle,
}

impl Player {
    #[must_use]
    pub fn new(id: usize, marker: EntityId, seat: Vec3) -> Self {
        Self {
            id,
            marker,
            seat,
            cards: Vec::new(),
            coins: Vec::new(),
            bet_amount: 1,
            bet_trigger: false,
            fold_trigger: false,
            score: 0,
            active: true,
            folded_this_round: false,
            style: PlayStyle::for_seat(id.saturating_sub(1)),
        }
    }

    /// Seat 0 of the current roster plays the human style.
    #[must_use]
    pub fn is_human(&self) -> bool {
        self.style == PlayStyle::Human
    }

    /// Set triggers and bet amount from the play style.
    pub fn apply_style<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (bet, fold, amount) = match self.style {
            PlayStyle::Human => (false, false, 1),
            PlayStyle::Bettor(amount) => (true, false, amount),
            PlayStyle::Folder => (false, true, 1),
            PlayStyle::Gambler { min, max } => (true, false, rng.random_range(min..max.max(min + 1))),
        };
        self.bet_trigger = bet;
        self.fold_trigger = fold;
        self.bet_amount = amount;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Player {}", self.id)
    }
}

/// Roster, deck, pot and round counters.
///
/// Every card and coin handle lives in exactly one container at a time:
/// a hand or stake, the deck, or the pot.
#[derive(Debug, Default)]
pub struct Table {
    /// Seat 0 is the human seat.
    pub players: Vec<Player>,
    /// Top of the deck is index 0.
    pub deck: Vec<Card>,
    pub pot: Vec<EntityId>,
    pub round: u32,
    pub total_rounds: u32,
    pub cards_per_player: usize,
    pub coins_per_player: usize,
    /// Handles the table no longer references; destroyed once the main
    /// queue drains.
    pub retired: Vec<EntityId>,
}

impl Table {
    #[must_use]
    pub fn new(total_rounds: u32, cards_per_player: usize, coins_per_player: usize) -> Self {
        Self {
            round: 1,
            total_rounds,
            cards_per_player,
            coins_per_player,
            ..Self::default()
        }
    }

    /// Request the 52 card entities, face-down at the staging spot, and
    /// shuffle them into the deck.
    pub fn build_deck<R: Rng + ?Sized>(&mut self, scene: &mut dyn Scene, rng: &mut R) {
        let mut transform = Transform::at(staging_position());
        transform.rotation.y = FACE_DOWN;
        self.deck = Vec::with_capacity(DECK_SIZE);
        for value in 1u8..14u8 {
            for suit in [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart] {
                let entity = scene.create(EntityKind::Card, transform);
                self.deck.push(Card {
                    value,
                    suit,
                    entity,
                });
            }
        }
        self.deck.shuffle(rng);
    }

    /// Request a marker and a coin stack for each of `count` seats placed
    /// on a circle around the pot, seat 0 at the bottom.
    pub fn seat_players(&mut self, scene: &mut dyn Scene, count: usize) {
        self.players = (0..count)
            .map(|seat| {
                let angle = 270.0 - seat as f32 * 360.0 / count as f32;
                let position = polar(angle, SEAT_RADIUS);
                let marker = scene.create(EntityKind::Seat, Transform::at(position));
                let mut player = Player::new(seat + 1, marker, position);
                player.coins = (0..self.coins_per_player)
                    .map(|j| {
                        let at = position
                            + COIN_OFFSET
                            + Vec3::new(0.0, 0.0, j as f32 * COIN_STACK_STEP);
                        scene.create(EntityKind::Coin, Transform::at(at))
                    })
                    .collect();
                player
            })
            .collect();
    }

    #[must_use]
    pub fn player_by_id(&self, id: usize) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Players that still have a stake.
    #[must_use]
    pub fn players_remaining(&self) -> usize {
        self.players
            .iter()
            .filter(|player| !player.coins.is_empty())
            .count()
    }

    /// Coins across every stake plus the pot.
    #[must_use]
    pub fn coin_total(&self) -> usize {
        self.players
            .iter()
            .map(|player| player.coins.len())
            .sum::<usize>()
            + self.pot.len()
    }

    /// Cards in the deck plus every hand.
    #[must_use]
    pub fn card_total(&self) -> usize {
        self.players
            .iter()
            .map(|player| player.cards.len())
            .sum::<usize>()
            + self.deck.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn test_card_display() {
        let card = Card {
            value: 12,
            suit: Suit::Heart,
            entity: EntityId::new(0),
        };
        assert_eq!(card.to_string(), " Q/♥");
    }

    #[test]
    fn test_deck_holds_every_card_once() {
        let mut scene = SceneGraph::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut table = Table::new(10, 5, 5);
        table.build_deck(&mut scene, &mut rng);

        assert_eq!(table.deck.len(), DECK_SIZE);
        let faces: HashSet<_> = table.deck.iter().map(|c| (c.value, c.suit)).collect();
        assert_eq!(faces.len(), DECK_SIZE);
        let handles: HashSet<_> = table.deck.iter().map(|c| c.entity).collect();
        assert_eq!(handles.len(), DECK_SIZE);
        assert_eq!(scene.count_kind(&EntityKind::Card), DECK_SIZE);
    }

    #[test]
    fn test_seat_players_creates_stakes() {
        let mut scene = SceneGraph::new();
        let mut table = Table::new(10, 5, 3);
        table.seat_players(&mut scene, 4);

        assert_eq!(table.players.len(), 4);
        assert_eq!(table.coin_total(), 12);
        assert_eq!(table.players_remaining(), 4);
        assert!(table.players[0].is_human());
        assert_eq!(table.players[3].style, PlayStyle::Folder);
        assert!(table.players[0].seat.y < 0.0, "human sits at the bottom");
    }

    #[test]
    fn test_play_styles_per_seat() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = SceneGraph::new();
        let mut table = Table::new(10, 5, 3);
        table.seat_players(&mut scene, 6);
        for player in &mut table.players {
            player.apply_style(&mut rng);
        }

        let human = &table.players[0];
        assert!(!human.bet_trigger && !human.fold_trigger);
        assert_eq!(table.players[1].bet_amount, 2);
        assert!(table.players[3].fold_trigger);
        assert!((1..4).contains(&table.players[4].bet_amount));
        assert_eq!(table.players[5].bet_amount, 4);
    }
}
