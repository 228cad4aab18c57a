//! Where each hand's deck comes from.

use rand::{SeedableRng, rngs::StdRng};

use crate::game::entities::Deck;

/// Supplies a fresh deck for every hand.
pub trait DeckSource: Send {
    fn fresh_deck(&mut self) -> Deck;
}

impl<D: DeckSource + ?Sized> DeckSource for Box<D> {
    fn fresh_deck(&mut self) -> Deck {
        (**self).fresh_deck()
    }
}

/// Shuffles a full 52-card deck per hand.
#[derive(Debug)]
pub struct ShuffledDecks {
    rng: StdRng,
}

impl ShuffledDecks {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible deck sequence, for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ShuffledDecks {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSource for ShuffledDecks {
    fn fresh_deck(&mut self) -> Deck {
        let mut deck = Deck::default();
        deck.shuffle_with(&mut self.rng);
        deck
    }
}

/// Unshuffled decks in a fixed order.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderedDecks;

impl DeckSource for OrderedDecks {
    fn fresh_deck(&mut self) -> Deck {
        Deck::default()
    }
}
