//! Hand lifecycle for tournament tables.
//!
//! This module provides:
//! - The `Game` aggregate (roster, blind schedule, button, current hand)
//! - `Hand` snapshots with per-player bets and the community board
//! - `HandManager`, which deals hands, reveals streets and ends hands
//! - Injectable deck sources
//!
//! ## Example
//!
//! ```
//! use tourney_poker::game::Player;
//! use tourney_poker::hand::{Game, HandManager};
//! use tourney_poker::tournament::BlindScheduleConfig;
//!
//! let schedule = BlindScheduleConfig::standard().to_schedule().unwrap();
//! let mut game = Game::new(1, "Final table", schedule);
//! game.add_player(Player::new(1, "alice", 1, 2000)).unwrap();
//! game.add_player(Player::new(2, "bob", 2, 2000)).unwrap();
//! game.add_player(Player::new(3, "carol", 3, 2000)).unwrap();
//! game.start().unwrap();
//!
//! let mut manager: HandManager = HandManager::default();
//! let hand = manager.start_new_hand(&mut game).unwrap();
//! assert_eq!(hand.pot(), 30);
//!
//! manager.flop(&mut game).unwrap();
//! manager.end_hand(&mut game).unwrap();
//! assert_eq!(game.button(), Some(2));
//! ```

pub mod dealer;
pub mod errors;
pub mod manager;
pub mod models;
mod pot;

pub use dealer::{DeckSource, OrderedDecks, ShuffledDecks};
pub use errors::{HandError, HandResult, InvalidState};
pub use manager::HandManager;
pub use models::{Game, Hand, HandId, PlayerHand};
