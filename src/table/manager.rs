//! Table manager for spawning and managing multiple table actors.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{
    actor::{TableActor, TableHandle, TableHands},
    errors::{TableError, TableResult},
};
use crate::{
    db::{GameRepository, GameSummary, RepositoryError},
    game::entities::{GameId, Player, PlayerId, SeatPosition},
    hand::{DeckSource, Game, HandManager, ShuffledDecks},
    tournament::{BlindScheduleConfig, Clock, SystemClock},
};

/// Builds the deck source for each new table
pub type DeckFactory = Arc<dyn Fn() -> Box<dyn DeckSource> + Send + Sync>;

/// A player registering for a new game
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Entrant {
    pub player_id: PlayerId,
    pub name: String,
    pub seat: SeatPosition,
}

impl Entrant {
    pub fn new(player_id: PlayerId, name: &str, seat: SeatPosition) -> Self {
        Self {
            player_id,
            name: name.to_string(),
            seat,
        }
    }
}

/// Table metadata for discovery
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableMetadata {
    #[serde(flatten)]
    pub game: GameSummary,
    /// An actor is running for this game
    pub is_open: bool,
}

/// Table manager for managing multiple table instances
pub struct TableManager {
    /// Game storage shared by every table
    repository: Arc<dyn GameRepository>,

    /// Clock shared by every table
    clock: Arc<dyn Clock>,

    /// Deck source factory, one source per table
    decks: DeckFactory,

    /// Active table handles
    tables: Arc<RwLock<HashMap<GameId, TableHandle>>>,

    /// Next game ID
    next_game_id: Arc<RwLock<GameId>>,
}

impl TableManager {
    /// Create a new table manager using the wall clock and shuffled decks
    pub fn new(repository: Arc<dyn GameRepository>) -> Self {
        Self::with_sources(
            repository,
            Arc::new(SystemClock),
            Arc::new(|| Box::new(ShuffledDecks::new()) as Box<dyn DeckSource>),
        )
    }

    /// Create a table manager with an explicit clock and deck factory
    pub fn with_sources(
        repository: Arc<dyn GameRepository>,
        clock: Arc<dyn Clock>,
        decks: DeckFactory,
    ) -> Self {
        Self {
            repository,
            clock,
            decks,
            tables: Arc::new(RwLock::new(HashMap::new())),
            next_game_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Spawn tables for every stored game that hasn't finished.
    ///
    /// Updates `next_game_id` to one more than the highest stored game ID.
    ///
    /// # Returns
    ///
    /// * `TableResult<usize>` - Number of tables opened
    pub async fn load_existing_games(&self) -> TableResult<usize> {
        let summaries = self.repository.list_games().await?;

        let mut loaded_count = 0;
        for summary in &summaries {
            let game = self.repository.load_game(summary.id).await?;
            if game.is_finished() {
                continue;
            }
            self.spawn(game).await;
            log::info!("Loaded and spawned existing table {}", summary.id);
            loaded_count += 1;
        }

        if let Some(max_id) = summaries.iter().map(|s| s.id).max() {
            let mut next_id = self.next_game_id.write().await;
            *next_id = (*next_id).max(max_id + 1);
        }

        Ok(loaded_count)
    }

    /// Create, start and spawn a new game.
    ///
    /// Every entrant is seated with the configured starting stack. The
    /// button goes to `button` if given, otherwise the lowest seat.
    ///
    /// # Returns
    ///
    /// * `TableResult<TableHandle>` - Handle to the new table
    pub async fn create_game(
        &self,
        name: &str,
        config: &BlindScheduleConfig,
        entrants: &[Entrant],
        button: Option<PlayerId>,
    ) -> TableResult<TableHandle> {
        let schedule = config.to_schedule()?;

        let mut next_id = self.next_game_id.write().await;
        let game_id = *next_id;

        let mut game = Game::new(game_id, name, schedule);
        for entrant in entrants {
            game.add_player(Player::new(
                entrant.player_id,
                &entrant.name,
                entrant.seat,
                config.starting_chips,
            ))?;
        }
        if let Some(button) = button {
            game.set_button(button)?;
        }
        game.start()?;

        self.repository.save_game(&game).await?;
        *next_id += 1;
        drop(next_id);

        let handle = self.spawn(game).await;
        log::info!(
            "Created and spawned table {} with {} players",
            game_id,
            entrants.len()
        );

        Ok(handle)
    }

    /// Get the table for a stored game, spawning it if it isn't running.
    ///
    /// # Returns
    ///
    /// * `TableResult<TableHandle>` - Table handle
    pub async fn open_game(&self, game_id: GameId) -> TableResult<TableHandle> {
        if let Some(handle) = self.get_table(game_id).await {
            return Ok(handle);
        }

        let game = self
            .repository
            .load_game(game_id)
            .await
            .map_err(|e| match e {
                RepositoryError::GameNotFound(id) => TableError::GameNotFound(id),
                other => other.into(),
            })?;

        let mut next_id = self.next_game_id.write().await;
        *next_id = (*next_id).max(game_id + 1);
        drop(next_id);

        let handle = self.spawn(game).await;
        log::info!("Opened table {}", game_id);
        Ok(handle)
    }

    /// Get a running table's handle
    pub async fn get_table(&self, game_id: GameId) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables
            .get(&game_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Stored games, with whether each has a running table
    pub async fn list_tables(&self) -> TableResult<Vec<TableMetadata>> {
        let summaries = self.repository.list_games().await?;
        let tables = self.tables.read().await;

        Ok(summaries
            .into_iter()
            .map(|game| TableMetadata {
                is_open: tables.get(&game.id).is_some_and(|h| !h.is_closed()),
                game,
            })
            .collect())
    }

    /// Stop a table's actor. The stored game is kept and can be reopened.
    ///
    /// # Returns
    ///
    /// * `TableResult<()>` - Success or error
    pub async fn close_table(&self, game_id: GameId) -> TableResult<()> {
        let handle = self
            .tables
            .write()
            .await
            .remove(&game_id)
            .ok_or(TableError::GameNotFound(game_id))?;

        match handle.close().await {
            Ok(()) | Err(TableError::TableClosed(_)) => {}
            Err(e) => return Err(e),
        }

        log::info!("Closed table {}", game_id);
        Ok(())
    }

    /// Get active table count
    pub async fn active_table_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.values().filter(|h| !h.is_closed()).count()
    }

    async fn spawn(&self, game: Game) -> TableHandle {
        let game_id = game.id();
        let hands: TableHands = HandManager::new(self.clock.clone(), (self.decks)());
        let (actor, handle) = TableActor::new(game, hands, self.repository.clone());

        let mut tables = self.tables.write().await;
        tables.insert(game_id, handle.clone());
        drop(tables);

        tokio::spawn(async move {
            actor.run().await;
        });

        handle
    }
}
