//! Repository trait definitions for testability and dependency injection.
//!
//! Game and hand storage is an outside concern; the table layer only talks
//! to the `GameRepository` trait. `InMemoryGameRepository` keeps JSON
//! snapshots in memory and backs tests and the simulator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::game::entities::GameId;
use crate::hand::models::{Game, Hand, HandId};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Game {0} not found")]
    GameNotFound(GameId),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Listing row for stored games
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSummary {
    pub id: GameId,
    pub name: String,
    pub players_remaining: usize,
    pub hands_played: u64,
    pub is_started: bool,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id(),
            name: game.name().to_string(),
            players_remaining: game.players_remaining(),
            hands_played: game.hands_played(),
            is_started: game.is_started(),
        }
    }
}

/// Trait for game and hand-history storage
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Load a game by ID
    async fn load_game(&self, game_id: GameId) -> RepositoryResult<Game>;

    /// Insert or replace a game
    async fn save_game(&self, game: &Game) -> RepositoryResult<()>;

    /// Insert or replace a hand in a game's history
    async fn save_hand(&self, game_id: GameId, hand: &Hand) -> RepositoryResult<()>;

    /// Write a game together with its current hand. Either both records
    /// are stored or neither is.
    async fn save_game_and_hand(&self, game: &Game) -> RepositoryResult<()>;

    /// A game's hands, oldest first
    async fn load_hands(&self, game_id: GameId) -> RepositoryResult<Vec<Hand>>;

    /// All stored games, by ID
    async fn list_games(&self) -> RepositoryResult<Vec<GameSummary>>;
}

/// In-memory `GameRepository` holding serialized snapshots
#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<GameId, String>>,
    hands: RwLock<HashMap<GameId, Vec<(HandId, String)>>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn load_game(&self, game_id: GameId) -> RepositoryResult<Game> {
        let games = self.games.read().await;
        let json = games
            .get(&game_id)
            .ok_or(RepositoryError::GameNotFound(game_id))?;
        Ok(serde_json::from_str(json)?)
    }

    async fn save_game(&self, game: &Game) -> RepositoryResult<()> {
        let json = serde_json::to_string(game)?;
        self.games.write().await.insert(game.id(), json);
        Ok(())
    }

    async fn save_hand(&self, game_id: GameId, hand: &Hand) -> RepositoryResult<()> {
        let json = serde_json::to_string(hand)?;
        let mut hands = self.hands.write().await;
        upsert_hand(hands.entry(game_id).or_default(), hand.id(), json);
        Ok(())
    }

    async fn save_game_and_hand(&self, game: &Game) -> RepositoryResult<()> {
        // Serialize both before touching either map.
        let game_json = serde_json::to_string(game)?;
        let hand_json = game
            .current_hand()
            .map(|hand| serde_json::to_string(hand).map(|json| (hand.id(), json)))
            .transpose()?;

        let mut games = self.games.write().await;
        let mut hands = self.hands.write().await;
        if let Some((hand_id, json)) = hand_json {
            upsert_hand(hands.entry(game.id()).or_default(), hand_id, json);
        }
        games.insert(game.id(), game_json);
        Ok(())
    }

    async fn load_hands(&self, game_id: GameId) -> RepositoryResult<Vec<Hand>> {
        let hands = self.hands.read().await;
        hands
            .get(&game_id)
            .map(|history| {
                history
                    .iter()
                    .map(|(_, json)| serde_json::from_str(json).map_err(RepositoryError::from))
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_games(&self) -> RepositoryResult<Vec<GameSummary>> {
        let games = self.games.read().await;
        let mut summaries = games
            .values()
            .map(|json| {
                let game: Game = serde_json::from_str(json)?;
                Ok(GameSummary::from(&game))
            })
            .collect::<RepositoryResult<Vec<_>>>()?;
        summaries.sort_by_key(|summary| summary.id);
        Ok(summaries)
    }
}

fn upsert_hand(history: &mut Vec<(HandId, String)>, hand_id: HandId, json: String) {
    match history.iter_mut().find(|(id, _)| *id == hand_id) {
        Some(entry) => entry.1 = json,
        None => history.push((hand_id, json)),
    }
}
