//! # Tourney Poker
//!
//! Hand lifecycle engine for multi-way tournament poker tables.
//!
//! Between hands the dealer button rotates among players who still have
//! chips, blind levels escalate on a timer, and the small/big blind roles are
//! handed out (with the heads-up exception where the button posts the small
//! blind). Within a hand the engine posts the blinds, deals hole cards and
//! walks the board through flop, turn and river under strict ordering rules.
//!
//! Betting decisions, showdown evaluation and transport are left to the
//! caller.
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, decks, players, the board and seat rotation
//! - [`tournament`]: Blind levels, the level timer and its clock
//! - [`hand`]: The `Game` aggregate and the `HandManager` engine
//! - [`db`]: Storage trait for games and hand history
//! - [`table`]: One async actor per game, managed by `TableManager`
//!
//! ## Example
//!
//! ```
//! use tourney_poker::{Game, HandManager, Player, tournament::BlindScheduleConfig};
//!
//! let schedule = BlindScheduleConfig::standard().to_schedule().unwrap();
//! let mut game = Game::new(1, "Sunday", schedule);
//! for seat in 1..=4 {
//!     game.add_player(Player::new(seat.into(), "player", seat, 2000)).unwrap();
//! }
//! game.start().unwrap();
//!
//! let mut manager: HandManager = HandManager::default();
//! let hand = manager.start_new_hand(&mut game).unwrap();
//! assert_eq!((hand.small_blind(), hand.big_blind()), (2, 3));
//! ```

/// Storage boundary for games and hand history.
pub mod db;

/// Table-level primitives: cards, board, players and seat rotation.
pub mod game;
pub use game::{Board, Card, Chips, Player, PlayerId, SeatPosition, Street};

/// The game aggregate and hand lifecycle engine.
pub mod hand;
pub use hand::{Game, Hand, HandError, HandManager, HandResult, InvalidState};

/// Async actor layer, one task per game.
pub mod table;

/// Blind schedule, level timer and clock.
pub mod tournament;
