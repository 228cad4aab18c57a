//! Table actor message types.

use tokio::sync::oneshot;

use super::errors::TableResult;
use crate::game::entities::{Chips, Player, PlayerId};
use crate::hand::{Game, Hand};

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Deal the next hand
    StartHand {
        response: oneshot::Sender<TableResult<Hand>>,
    },

    /// Reveal the flop
    Flop {
        response: oneshot::Sender<TableResult<Hand>>,
    },

    /// Reveal the turn
    Turn {
        response: oneshot::Sender<TableResult<Hand>>,
    },

    /// Reveal the river
    River {
        response: oneshot::Sender<TableResult<Hand>>,
    },

    /// Finalize the current hand and rotate the button
    EndHand {
        response: oneshot::Sender<TableResult<Game>>,
    },

    /// Move chips from a player's stack into the pot
    CommitBet {
        player_id: PlayerId,
        amount: Chips,
        response: oneshot::Sender<TableResult<Chips>>,
    },

    /// Overwrite a player's stack (pot awards, corrections)
    SetChips {
        player_id: PlayerId,
        chips: Chips,
        response: oneshot::Sender<TableResult<Player>>,
    },

    /// Current committed game state
    GetGame {
        response: oneshot::Sender<Game>,
    },

    /// Small blind of the current hand
    PlayerInSmallBlind {
        response: oneshot::Sender<TableResult<Player>>,
    },

    /// Big blind of the current hand
    PlayerInBigBlind {
        response: oneshot::Sender<TableResult<Player>>,
    },

    /// Stop the actor
    Close { response: oneshot::Sender<()> },
}
