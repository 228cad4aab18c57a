/// Integration tests for the table actor layer
///
/// These tests run games through `TableManager` and `TableHandle`:
/// serialized access, persistence on every commit, and isolation between
/// games.
use async_trait::async_trait;
use chrono::TimeDelta;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tourney_poker::{
    Game, Hand, Street,
    db::{
        GameRepository, GameSummary, InMemoryGameRepository, RepositoryError, RepositoryResult,
    },
    game::GameId,
    hand::{DeckSource, ShuffledDecks},
    table::{DeckFactory, Entrant, TableError, TableHandle, TableManager},
    tournament::{BlindScheduleConfig, ManualClock},
};

fn entrants(n: i64) -> Vec<Entrant> {
    (1..=n)
        .map(|i| Entrant::new(i, &format!("p{i}"), i as u32))
        .collect()
}

fn seeded_decks() -> DeckFactory {
    Arc::new(|| Box::new(ShuffledDecks::seeded(9)) as Box<dyn DeckSource>)
}

fn manager_with(repo: Arc<dyn GameRepository>) -> (TableManager, ManualClock) {
    let clock = ManualClock::default();
    let manager = TableManager::with_sources(repo, Arc::new(clock.clone()), seeded_decks());
    (manager, clock)
}

async fn four_handed(manager: &TableManager) -> TableHandle {
    manager
        .create_game(
            "four handed",
            &BlindScheduleConfig::standard(),
            &entrants(4),
            Some(1),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_hand_through_table_handle() {
    let (manager, _) = manager_with(Arc::new(InMemoryGameRepository::new()));
    let table = four_handed(&manager).await;

    let hand = table.start_hand().await.unwrap();
    assert_eq!((hand.button(), hand.small_blind(), hand.big_blind()), (1, 2, 3));
    assert_eq!(hand.pot(), 30);
    assert_eq!(table.player_in_small_blind().await.unwrap().id, 2);
    assert_eq!(table.player_in_big_blind().await.unwrap().chips, 1980);

    assert_eq!(table.flop().await.unwrap().street(), Street::Flop);
    assert_eq!(table.turn().await.unwrap().street(), Street::Turn);
    assert_eq!(table.river().await.unwrap().board().cards().len(), 5);

    let game = table.end_hand().await.unwrap();
    assert_eq!(game.button(), Some(2));

    let hand = table.start_hand().await.unwrap();
    assert_eq!((hand.button(), hand.small_blind(), hand.big_blind()), (2, 3, 4));
}

#[tokio::test]
async fn test_elimination_through_table_handle() {
    let (manager, _) = manager_with(Arc::new(InMemoryGameRepository::new()));
    let table = four_handed(&manager).await;

    table.start_hand().await.unwrap();
    table.set_chips(3, 0).await.unwrap();
    let game = table.end_hand().await.unwrap();
    assert_eq!(game.players_remaining(), 3);

    let hand = table.start_hand().await.unwrap();
    assert_eq!((hand.button(), hand.small_blind(), hand.big_blind()), (2, 4, 1));
}

#[tokio::test]
async fn test_concurrent_flops_only_one_succeeds() {
    let (manager, _) = manager_with(Arc::new(InMemoryGameRepository::new()));
    let table = four_handed(&manager).await;
    table.start_hand().await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let table = table.clone();
            tokio::spawn(async move { table.flop().await })
        })
        .collect();

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(hand) => {
                assert_eq!(hand.board().cards().len(), 3);
                successes += 1;
            }
            Err(err) => assert!(err.is_invalid_state(), "unexpected error: {err}"),
        }
    }
    assert_eq!(successes, 1);

    let game = table.game().await.unwrap();
    assert_eq!(game.current_hand().unwrap().board().cards().len(), 3);
}

#[tokio::test]
async fn test_concurrent_commits_keep_pot_balanced() {
    let (manager, _) = manager_with(Arc::new(InMemoryGameRepository::new()));
    let table = four_handed(&manager).await;
    table.start_hand().await.unwrap();

    let tasks: Vec<_> = (1..=4)
        .map(|player_id| {
            let table = table.clone();
            tokio::spawn(async move { table.commit_bet(player_id, 100).await })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 100);
    }

    let game = table.game().await.unwrap();
    let hand = game.current_hand().unwrap();
    assert_eq!(hand.pot(), 30 + 400);
    assert!(hand.is_pot_balanced());
}

#[tokio::test]
async fn test_games_are_isolated() {
    let (manager, _) = manager_with(Arc::new(InMemoryGameRepository::new()));
    let first = four_handed(&manager).await;
    let second = four_handed(&manager).await;
    assert_ne!(first.game_id(), second.game_id());

    first.start_hand().await.unwrap();
    first.flop().await.unwrap();

    let err = second.flop().await.unwrap_err();
    assert!(err.is_invalid_state());
    assert!(second.game().await.unwrap().current_hand().is_none());
    assert_eq!(manager.active_table_count().await, 2);
}

#[tokio::test]
async fn test_blinds_escalate_on_table_clock() {
    let (manager, clock) = manager_with(Arc::new(InMemoryGameRepository::new()));
    let table = four_handed(&manager).await;

    table.start_hand().await.unwrap();
    table.end_hand().await.unwrap();
    clock.advance(TimeDelta::minutes(20));

    let hand = table.start_hand().await.unwrap();
    assert_eq!(hand.blinds().level, 2);
    assert_eq!(hand.pot(), 45);
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let repo: Arc<dyn GameRepository> = Arc::new(InMemoryGameRepository::new());
    let (manager, _) = manager_with(repo.clone());
    let table = four_handed(&manager).await;
    let game_id = table.game_id();

    table.start_hand().await.unwrap();
    table.flop().await.unwrap();
    manager.close_table(game_id).await.unwrap();
    assert!(matches!(
        table.flop().await,
        Err(TableError::TableClosed(_))
    ));

    let (other, _) = manager_with(repo.clone());
    let reopened = other.open_game(game_id).await.unwrap();
    let hand = reopened.turn().await.unwrap();
    assert_eq!(hand.street(), Street::Turn);

    let history = repo.load_hands(game_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].street(), Street::Turn);
}

#[tokio::test]
async fn test_hand_history_keeps_every_hand() {
    let repo: Arc<dyn GameRepository> = Arc::new(InMemoryGameRepository::new());
    let (manager, _) = manager_with(repo.clone());
    let table = four_handed(&manager).await;

    for _ in 0..3 {
        table.start_hand().await.unwrap();
        table.end_hand().await.unwrap();
    }

    let history = repo.load_hands(table.game_id()).await.unwrap();
    let numbers: Vec<_> = history.iter().map(|h| h.number()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(history.iter().all(|h| h.is_finalized()));
}

#[tokio::test]
async fn test_list_tables() {
    let (manager, _) = manager_with(Arc::new(InMemoryGameRepository::new()));
    four_handed(&manager).await;
    let table = four_handed(&manager).await;
    table.start_hand().await.unwrap();
    manager.close_table(1).await.unwrap();

    let tables = manager.list_tables().await.unwrap();
    assert_eq!(tables.len(), 2);
    assert!(!tables[0].is_open);
    assert!(tables[1].is_open);
    assert_eq!(tables[1].game.hands_played, 1);
}

#[tokio::test]
async fn test_close_unknown_table() {
    let (manager, _) = manager_with(Arc::new(InMemoryGameRepository::new()));
    let err = manager.close_table(3).await.unwrap_err();
    assert!(matches!(err, TableError::GameNotFound(3)));
    assert_eq!(err.client_message(), "Game not found");
}

/// Repository that can be told to fail every write.
#[derive(Default)]
struct FlakyRepository {
    inner: InMemoryGameRepository,
    failing: AtomicBool,
}

#[async_trait]
impl GameRepository for FlakyRepository {
    async fn load_game(&self, game_id: GameId) -> RepositoryResult<Game> {
        self.inner.load_game(game_id).await
    }

    async fn save_game(&self, game: &Game) -> RepositoryResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("write rejected".to_string()));
        }
        self.inner.save_game(game).await
    }

    async fn save_hand(&self, game_id: GameId, hand: &Hand) -> RepositoryResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("write rejected".to_string()));
        }
        self.inner.save_hand(game_id, hand).await
    }

    async fn save_game_and_hand(&self, game: &Game) -> RepositoryResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("write rejected".to_string()));
        }
        self.inner.save_game_and_hand(game).await
    }

    async fn load_hands(&self, game_id: GameId) -> RepositoryResult<Vec<Hand>> {
        self.inner.load_hands(game_id).await
    }

    async fn list_games(&self) -> RepositoryResult<Vec<GameSummary>> {
        self.inner.list_games().await
    }
}

#[tokio::test]
async fn test_failed_save_keeps_committed_state() {
    let repo = Arc::new(FlakyRepository::default());
    let (manager, _) = manager_with(repo.clone());
    let table = four_handed(&manager).await;
    let game_id = table.game_id();
    table.start_hand().await.unwrap();
    let before = table.game().await.unwrap();

    repo.failing.store(true, Ordering::SeqCst);
    let err = table.flop().await.unwrap_err();
    assert!(matches!(err, TableError::Repository(_)));
    assert_eq!(err.client_message(), "Internal server error");
    assert_eq!(table.game().await.unwrap(), before);

    let history = repo.load_hands(game_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].street(), Street::Preflop);
    assert_eq!(repo.load_game(game_id).await.unwrap(), before);

    repo.failing.store(false, Ordering::SeqCst);
    let hand = table.flop().await.unwrap();
    assert_eq!(hand.street(), Street::Flop);
    assert_eq!(repo.load_hands(game_id).await.unwrap()[0].street(), Street::Flop);
}

#[tokio::test]
async fn test_failed_start_leaves_no_hand_in_history() {
    let repo = Arc::new(FlakyRepository::default());
    let (manager, _) = manager_with(repo.clone());
    let table = four_handed(&manager).await;
    let game_id = table.game_id();
    table.start_hand().await.unwrap();
    table.end_hand().await.unwrap();

    repo.failing.store(true, Ordering::SeqCst);
    assert!(table.start_hand().await.is_err());
    let history = repo.load_hands(game_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(repo.load_game(game_id).await.unwrap().hands_played(), 1);

    repo.failing.store(false, Ordering::SeqCst);
    let hand = table.start_hand().await.unwrap();
    assert_eq!(hand.number(), 2);

    let history = repo.load_hands(game_id).await.unwrap();
    let numbers: Vec<_> = history.iter().map(|h| h.number()).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(history[1].id(), hand.id());
}
