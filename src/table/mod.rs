//! Table module serializing access to each game through an async actor.
//!
//! This module implements:
//! - TableActor: Async actor owning a single game and its hand engine
//! - TableManager: Spawns, reopens and closes table actors
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each table runs in a separate Tokio task with an mpsc message inbox.
//! Requests are applied to a copy of the game, persisted through the
//! `GameRepository`, and only then committed. Different games never share
//! state.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tourney_poker::db::InMemoryGameRepository;
//! use tourney_poker::table::{Entrant, TableManager};
//! use tourney_poker::tournament::BlindScheduleConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = TableManager::new(Arc::new(InMemoryGameRepository::new()));
//!     let entrants = [Entrant::new(1, "alice", 1), Entrant::new(2, "bob", 2)];
//!     let table = manager
//!         .create_game("heads-up", &BlindScheduleConfig::standard(), &entrants, None)
//!         .await
//!         .unwrap();
//!
//!     let hand = table.start_hand().await.unwrap();
//!     assert_eq!(hand.small_blind(), hand.button());
//! }
//! ```

pub mod actor;
pub mod errors;
pub mod manager;
pub mod messages;

pub use actor::{TableActor, TableHandle, TableHands};
pub use errors::{TableError, TableResult};
pub use manager::{DeckFactory, Entrant, TableManager, TableMetadata};
pub use messages::TableMessage;
