//! Hand lifecycle error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{
    board::{BoardError, Street},
    entities::{DeckError, PlayerId, SeatPosition},
};

/// Caller-contract violations. These are never retried.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum InvalidState {
    #[error("game has not been started")]
    GameNotStarted,
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("need 2+ players with chips, have {active}")]
    NotEnoughPlayers { active: usize },
    #[error("table is full")]
    CapacityReached,
    #[error("seat {0} is already taken")]
    SeatTaken(SeatPosition),
    #[error("player {0} is already seated")]
    PlayerAlreadySeated(PlayerId),
    #[error("player {0} is not in this game")]
    UnknownPlayer(PlayerId),
    #[error("player {0} has no chips")]
    PlayerNotActive(PlayerId),
    #[error("player {0} is not in this hand")]
    PlayerNotInHand(PlayerId),
    #[error("no hand has been dealt")]
    NoCurrentHand,
    #[error("hand is already finalized")]
    HandFinalized,
    #[error("can't deal the {requested} while the hand is on the {current}")]
    StreetOutOfOrder { requested: Street, current: Street },
}

/// Hand lifecycle errors
#[derive(Debug, Error)]
pub enum HandError {
    /// Operation not allowed in the current game or hand state
    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidState),

    /// Deck collaborator failure, passed through unchanged
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),

    /// Cards that don't fit the board slots being filled
    #[error("board error: {0}")]
    Board(#[from] BoardError),
}

impl HandError {
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

/// Result type for hand lifecycle operations
pub type HandResult<T> = Result<T, HandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_out_of_order_message() {
        let err = HandError::from(InvalidState::StreetOutOfOrder {
            requested: Street::Turn,
            current: Street::Preflop,
        });
        assert!(err.is_invalid_state());
        assert_eq!(
            err.to_string(),
            "invalid state: can't deal the turn while the hand is on the preflop"
        );
    }

    #[test]
    fn test_deck_error_is_not_invalid_state() {
        let err = HandError::from(DeckError::Exhausted {
            needed: 3,
            remaining: 1,
        });
        assert!(!err.is_invalid_state());
        assert!(err.to_string().contains("deck exhausted"));
    }
}
