//! Table-level poker primitives.
//!
//! This module provides the building blocks the hand lifecycle composes:
//! - Cards, decks and players
//! - The community board and its street progression
//! - Pure seat rotation (button movement and blind roles)

pub mod board;
pub mod constants;
pub mod entities;
pub mod rotation;

pub use board::{Board, BoardError, Street};
pub use entities::{
    Card, Chips, Deck, DeckError, GameId, HoleCards, Player, PlayerId, SeatPosition, Suit,
};
pub use rotation::{SeatAssignment, assign_roles, clockwise_from, first_active, next_button};
