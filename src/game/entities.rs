use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::constants::{CARDS_IN_DECK, HOLE_CARDS};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart];
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

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (two=2u8 ... ace=14u8) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// Errors raised by the deck collaborator.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum DeckError {
    #[error("deck exhausted: need {needed} cards, {remaining} left")]
    Exhausted { needed: usize, remaining: usize },
}

/// A deck of cards dealt from the top. Dealing never reshuffles; a hand
/// gets a fresh deck from its `DeckSource`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
    deck_idx: usize,
}

impl Deck {
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }

    pub fn deal_card(&mut self) -> Result<Card, DeckError> {
        let card = self
            .cards
            .get(self.deck_idx)
            .copied()
            .ok_or(DeckError::Exhausted {
                needed: 1,
                remaining: 0,
            })?;
        self.deck_idx += 1;
        Ok(card)
    }

    /// Deal `n` cards at once. Nothing is consumed unless all `n` are
    /// available.
    pub fn deal_cards(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(DeckError::Exhausted {
                needed: n,
                remaining,
            });
        }
        let cards = self.cards[self.deck_idx..self.deck_idx + n].to_vec();
        self.deck_idx += n;
        Ok(cards)
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.deck_idx = 0;
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = Vec::with_capacity(CARDS_IN_DECK);
        for value in 2u8..=14u8 {
            for suit in Suit::ALL {
                cards.push(Card(value, suit));
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

/// Type alias for tournament chips. Stacks, blinds and bets are whole chips.
pub type Chips = u32;

/// Type alias for player identifiers (matches the user ids handed out by
/// whoever seats the player).
pub type PlayerId = i64;

/// Type alias for game identifiers.
pub type GameId = i64;

/// Stable seat position of a player. Seats are unique within a game and
/// increase clockwise; gaps are allowed.
pub type SeatPosition = u32;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub seat: SeatPosition,
    pub chips: Chips,
    /// Where the player finished, once eliminated (1 = winner).
    pub finish_position: Option<usize>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: &str, seat: SeatPosition, chips: Chips) -> Self {
        Self {
            id,
            name: name.to_string(),
            seat,
            chips,
            finish_position: None,
        }
    }

    /// A player is active while they have chips behind.
    pub fn is_active(&self) -> bool {
        self.chips > 0
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (seat {}, {} chips)", self.name, self.seat, self.chips)
    }
}

/// Two hole cards dealt to one player.
pub type HoleCards = [Card; HOLE_CARDS];
