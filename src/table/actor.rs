//! Table actor implementation with async message handling.
//!
//! One actor owns one `Game`. Messages are handled one at a time, so every
//! operation on a game is serialized without locks.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::{
    errors::{TableError, TableResult},
    messages::TableMessage,
};
use crate::{
    db::GameRepository,
    game::entities::{Chips, GameId, Player, PlayerId},
    hand::{DeckSource, Game, Hand, HandManager, HandResult, InvalidState},
    tournament::Clock,
};

/// Inbox size for each table
const TABLE_INBOX_CAPACITY: usize = 100;

/// Hand engine as configured for a table
pub type TableHands = HandManager<Arc<dyn Clock>, Box<dyn DeckSource>>;

/// Table actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    game_id: GameId,
}

impl TableHandle {
    /// Create a new table handle
    pub fn new(sender: mpsc::Sender<TableMessage>, game_id: GameId) -> Self {
        Self { sender, game_id }
    }

    /// Get game ID
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Whether the actor has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the table
    pub async fn send(&self, message: TableMessage) -> TableResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TableError::TableClosed(self.game_id))
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> TableMessage,
    ) -> TableResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(message(tx)).await?;
        rx.await.map_err(|_| TableError::TableClosed(self.game_id))
    }

    pub async fn start_hand(&self) -> TableResult<Hand> {
        self.request(|response| TableMessage::StartHand { response })
            .await?
    }

    pub async fn flop(&self) -> TableResult<Hand> {
        self.request(|response| TableMessage::Flop { response }).await?
    }

    pub async fn turn(&self) -> TableResult<Hand> {
        self.request(|response| TableMessage::Turn { response }).await?
    }

    pub async fn river(&self) -> TableResult<Hand> {
        self.request(|response| TableMessage::River { response }).await?
    }

    pub async fn end_hand(&self) -> TableResult<Game> {
        self.request(|response| TableMessage::EndHand { response })
            .await?
    }

    pub async fn commit_bet(&self, player_id: PlayerId, amount: Chips) -> TableResult<Chips> {
        self.request(|response| TableMessage::CommitBet {
            player_id,
            amount,
            response,
        })
        .await?
    }

    pub async fn set_chips(&self, player_id: PlayerId, chips: Chips) -> TableResult<Player> {
        self.request(|response| TableMessage::SetChips {
            player_id,
            chips,
            response,
        })
        .await?
    }

    pub async fn game(&self) -> TableResult<Game> {
        self.request(|response| TableMessage::GetGame { response })
            .await
    }

    pub async fn player_in_small_blind(&self) -> TableResult<Player> {
        self.request(|response| TableMessage::PlayerInSmallBlind { response })
            .await?
    }

    pub async fn player_in_big_blind(&self) -> TableResult<Player> {
        self.request(|response| TableMessage::PlayerInBigBlind { response })
            .await?
    }

    /// Stop the actor. Pending messages behind this one are dropped.
    pub async fn close(&self) -> TableResult<()> {
        self.request(|response| TableMessage::Close { response })
            .await
    }
}

/// Table actor managing a single tournament game
pub struct TableActor {
    /// Game ID
    id: GameId,

    /// Last committed game state
    game: Game,

    /// Hand engine with this table's clock and deck source
    hands: TableHands,

    /// Where every committed state is written
    repository: Arc<dyn GameRepository>,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Is table closed
    is_closed: bool,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Returns
    ///
    /// * `(TableActor, TableHandle)` - Actor and handle for sending messages
    pub fn new(
        game: Game,
        hands: TableHands,
        repository: Arc<dyn GameRepository>,
    ) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(TABLE_INBOX_CAPACITY);
        let id = game.id();

        let actor = Self {
            id,
            game,
            hands,
            repository,
            inbox,
            is_closed: false,
        };

        (actor, TableHandle::new(sender, id))
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        log::info!("Table {} '{}' starting", self.id, self.game.name());

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
            if self.is_closed {
                break;
            }
        }

        log::info!("Table {} '{}' closed", self.id, self.game.name());
    }

    /// Handle a table message
    async fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::StartHand { response } => {
                let result = self
                    .apply(|hands, game| hands.start_new_hand(game).cloned())
                    .await;
                let _ = response.send(result);
            }

            TableMessage::Flop { response } => {
                let result = self.apply(|hands, game| hands.flop(game).cloned()).await;
                let _ = response.send(result);
            }

            TableMessage::Turn { response } => {
                let result = self.apply(|hands, game| hands.turn(game).cloned()).await;
                let _ = response.send(result);
            }

            TableMessage::River { response } => {
                let result = self.apply(|hands, game| hands.river(game).cloned()).await;
                let _ = response.send(result);
            }

            TableMessage::EndHand { response } => {
                let result = self
                    .apply(|hands, game| {
                        hands.end_hand(game)?;
                        Ok(game.clone())
                    })
                    .await;
                let _ = response.send(result);
            }

            TableMessage::CommitBet {
                player_id,
                amount,
                response,
            } => {
                let result = self
                    .apply(|hands, game| hands.commit_bet(game, player_id, amount))
                    .await;
                let _ = response.send(result);
            }

            TableMessage::SetChips {
                player_id,
                chips,
                response,
            } => {
                let result = self
                    .apply(|_, game| {
                        let player = game
                            .player_mut(player_id)
                            .ok_or(InvalidState::UnknownPlayer(player_id))?;
                        player.chips = chips;
                        Ok(player.clone())
                    })
                    .await;
                let _ = response.send(result);
            }

            TableMessage::GetGame { response } => {
                let _ = response.send(self.game.clone());
            }

            TableMessage::PlayerInSmallBlind { response } => {
                let result = self.game.player_in_small_blind().cloned();
                let _ = response.send(result.map_err(TableError::from));
            }

            TableMessage::PlayerInBigBlind { response } => {
                let result = self.game.player_in_big_blind().cloned();
                let _ = response.send(result.map_err(TableError::from));
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    /// Run `op` against a copy of the game, persist the copy and its hand in
    /// one write, then make it the committed state. Any failure leaves both
    /// the committed state and the stored history as they were.
    async fn apply<T>(
        &mut self,
        op: impl FnOnce(&mut TableHands, &mut Game) -> HandResult<T>,
    ) -> TableResult<T> {
        let mut next = self.game.clone();
        let value = op(&mut self.hands, &mut next).inspect_err(|e| {
            log::debug!("Table {}: rejected: {}", self.id, e);
        })?;

        if let Err(e) = self.repository.save_game_and_hand(&next).await {
            log::error!("Table {}: failed to save game: {}", self.id, e);
            return Err(e.into());
        }

        self.game = next;
        Ok(value)
    }
}
