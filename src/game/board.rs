//! Community board and the street progression that drives it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::constants::FLOP_CARDS;
use super::entities::Card;

/// Betting round bound to a board stage. Streets only move forward.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    /// The hand has been finalized.
    Complete,
}

impl Street {
    /// The street a board-dealing call moves to, if any.
    pub fn next(self) -> Option<Street> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River | Self::Complete => None,
        }
    }

    /// The street that has to be current before this one can be dealt.
    pub fn previous(self) -> Option<Street> {
        match self {
            Self::Preflop => None,
            Self::Flop => Some(Self::Preflop),
            Self::Turn => Some(Self::Flop),
            Self::River => Some(Self::Turn),
            Self::Complete => None,
        }
    }

    /// Cards revealed when entering this street.
    pub fn cards_to_reveal(self) -> usize {
        match self {
            Self::Flop => FLOP_CARDS,
            Self::Turn | Self::River => 1,
            Self::Preflop | Self::Complete => 0,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Complete => "complete",
        };
        write!(f, "{repr}")
    }
}

/// Board reveal errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BoardError {
    #[error("the {0} can't be revealed on this board")]
    NotRevealable(Street),

    #[error("the {street} takes {expected} cards, got {got}")]
    WrongCardCount {
        street: Street,
        expected: usize,
        got: usize,
    },
}

/// Up to five community cards. A slot is set once and never cleared.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Board {
    flop: Option<[Card; FLOP_CARDS]>,
    turn: Option<Card>,
    river: Option<Card>,
}

impl Board {
    pub fn flop(&self) -> Option<&[Card; FLOP_CARDS]> {
        self.flop.as_ref()
    }

    pub fn turn(&self) -> Option<Card> {
        self.turn
    }

    pub fn river(&self) -> Option<Card> {
        self.river
    }

    /// Revealed cards in dealing order.
    pub fn cards(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(5);
        if let Some(flop) = self.flop {
            cards.extend(flop);
        }
        cards.extend(self.turn);
        cards.extend(self.river);
        cards
    }

    /// The street implied by which slots are filled.
    pub fn revealed_street(&self) -> Street {
        match (self.flop.is_some(), self.turn.is_some(), self.river.is_some()) {
            (_, _, true) => Street::River,
            (_, true, false) => Street::Turn,
            (true, false, false) => Street::Flop,
            (false, false, false) => Street::Preflop,
        }
    }

    /// Whether `street` is the next one this board can reveal.
    pub fn can_reveal(&self, street: Street) -> bool {
        match street {
            Street::Flop => self.flop.is_none(),
            Street::Turn => self.flop.is_some() && self.turn.is_none(),
            Street::River => self.turn.is_some() && self.river.is_none(),
            Street::Preflop | Street::Complete => false,
        }
    }

    /// Fill the slots for `street` with exactly `street.cards_to_reveal()`
    /// cards. The board is untouched on error.
    pub(crate) fn reveal(&mut self, street: Street, cards: &[Card]) -> Result<(), BoardError> {
        if !self.can_reveal(street) {
            return Err(BoardError::NotRevealable(street));
        }
        match (street, cards) {
            (Street::Flop, [a, b, c]) => self.flop = Some([*a, *b, *c]),
            (Street::Turn, [card]) => self.turn = Some(*card),
            (Street::River, [card]) => self.river = Some(*card),
            _ => {
                return Err(BoardError::WrongCardCount {
                    street,
                    expected: street.cards_to_reveal(),
                    got: cards.len(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self
            .cards()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "[{repr}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;

    fn cards(n: usize) -> Vec<Card> {
        (0..n).map(|i| Card(2 + i as u8, Suit::Heart)).collect()
    }

    #[test]
    fn test_street_chain() {
        assert_eq!(Street::Preflop.next(), Some(Street::Flop));
        assert_eq!(Street::Flop.next(), Some(Street::Turn));
        assert_eq!(Street::Turn.next(), Some(Street::River));
        assert_eq!(Street::River.next(), None);
        assert_eq!(Street::Complete.next(), None);
        assert_eq!(Street::River.previous(), Some(Street::Turn));
    }

    #[test]
    fn test_empty_board() {
        let board = Board::default();
        assert!(board.flop().is_none());
        assert!(board.turn().is_none());
        assert!(board.river().is_none());
        assert_eq!(board.revealed_street(), Street::Preflop);
        assert!(board.can_reveal(Street::Flop));
        assert!(!board.can_reveal(Street::Turn));
        assert!(!board.can_reveal(Street::River));
    }

    #[test]
    fn test_reveal_sequence() {
        let mut board = Board::default();
        board.reveal(Street::Flop, &cards(3)).unwrap();
        assert_eq!(board.revealed_street(), Street::Flop);
        assert!(!board.can_reveal(Street::Flop));
        assert!(!board.can_reveal(Street::River));

        board.reveal(Street::Turn, &cards(1)).unwrap();
        assert_eq!(board.revealed_street(), Street::Turn);

        board.reveal(Street::River, &cards(1)).unwrap();
        assert_eq!(board.revealed_street(), Street::River);
        assert_eq!(board.cards().len(), 5);
        assert!(!board.can_reveal(Street::River));
    }

    #[test]
    fn test_reveal_rejects_wrong_card_count() {
        let mut board = Board::default();
        assert_eq!(
            board.reveal(Street::Flop, &cards(2)),
            Err(BoardError::WrongCardCount {
                street: Street::Flop,
                expected: 3,
                got: 2
            })
        );
        assert_eq!(board, Board::default());

        assert_eq!(
            board.reveal(Street::Turn, &cards(1)),
            Err(BoardError::NotRevealable(Street::Turn))
        );
        assert_eq!(board.revealed_street(), Street::Preflop);
    }

    #[test]
    fn test_street_display() {
        assert_eq!(Street::Flop.to_string(), "flop");
        assert_eq!(Street::Complete.to_string(), "complete");
    }
}
