//! Storage boundary for games and their hand history.

pub mod repository;

pub use repository::{
    GameRepository, GameSummary, InMemoryGameRepository, RepositoryError, RepositoryResult,
};
