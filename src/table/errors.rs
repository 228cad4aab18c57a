//! Table error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::game::entities::GameId;
use crate::hand::HandError;
use crate::tournament::ConfigError;

/// Table errors
#[derive(Debug, Error)]
pub enum TableError {
    /// Rejected by the hand engine
    #[error("{0}")]
    Hand(#[from] HandError),

    /// Storage failure; the table keeps its last committed state
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Bad blind schedule configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The table's actor has stopped
    #[error("Table {0} is closed")]
    TableClosed(GameId),

    /// No table or stored game with this ID
    #[error("Game {0} not found")]
    GameNotFound(GameId),
}

impl TableError {
    /// Get a client-safe error message that doesn't leak storage details or
    /// internal IDs.
    pub fn client_message(&self) -> String {
        match self {
            TableError::Repository(_) => "Internal server error".to_string(),
            TableError::TableClosed(_) => "Table is closed".to_string(),
            TableError::GameNotFound(_) => "Game not found".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the engine refused the call because of the game's state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, TableError::Hand(err) if err.is_invalid_state())
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
