//! Game and hand aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use super::errors::{HandResult, InvalidState};
use crate::game::{
    board::{Board, Street},
    constants::{MAX_PLAYERS, MIN_PLAYERS},
    entities::{Chips, Deck, GameId, HoleCards, Player, PlayerId, SeatPosition},
    rotation::{self, SeatAssignment},
};
use crate::tournament::models::{BlindLevel, BlindSchedule};

/// Hand ID type
pub type HandId = Uuid;

/// One player's stake in one hand.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerHand {
    pub player_id: PlayerId,
    pub seat: SeatPosition,
    /// Relative seating for this hand: button = 0, then clockwise.
    pub rank: usize,
    pub hole_cards: HoleCards,
    /// Stack the player had before blinds were posted.
    pub starting_chips: Chips,
    /// Chips committed over the whole hand. Never resets.
    pub(crate) bet_amount: Chips,
    /// Chips committed on the current street.
    pub(crate) round_bet_amount: Chips,
}

impl PlayerHand {
    pub fn bet_amount(&self) -> Chips {
        self.bet_amount
    }

    pub fn round_bet_amount(&self) -> Chips {
        self.round_bet_amount
    }
}

impl Ord for PlayerHand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then(self.player_id.cmp(&other.player_id))
    }
}

impl PartialOrd for PlayerHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single dealt hand. Created by `HandManager::start_new_hand`, advanced
/// street by street, and frozen once finalized.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Hand {
    pub(crate) id: HandId,
    pub(crate) number: u64,
    pub(crate) blinds: BlindLevel,
    pub(crate) button: PlayerId,
    pub(crate) small_blind: PlayerId,
    pub(crate) big_blind: PlayerId,
    /// Sorted by rank.
    pub(crate) players: Vec<PlayerHand>,
    pub(crate) board: Board,
    pub(crate) street: Street,
    pub(crate) pot: Chips,
    /// Outstanding bet on the current street.
    pub(crate) total_bet_amount: Chips,
    pub(crate) next_to_act: Option<PlayerId>,
    pub(crate) finalized: bool,
    pub(crate) deck: Deck,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
}

impl Hand {
    /// Build an empty hand (no bets posted) for the given seating.
    /// `hole_cards` is indexed by rank.
    pub(crate) fn new(
        number: u64,
        blinds: BlindLevel,
        seats: &SeatAssignment,
        roster: &[Player],
        hole_cards: Vec<HoleCards>,
        deck: Deck,
        started_at: DateTime<Utc>,
    ) -> Self {
        let players = seats
            .order
            .iter()
            .zip(hole_cards)
            .enumerate()
            .filter_map(|(rank, (&player_id, hole_cards))| {
                roster
                    .iter()
                    .find(|p| p.id == player_id)
                    .map(|player| PlayerHand {
                        player_id,
                        seat: player.seat,
                        rank,
                        hole_cards,
                        starting_chips: player.chips,
                        bet_amount: 0,
                        round_bet_amount: 0,
                    })
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            number,
            blinds,
            button: seats.button,
            small_blind: seats.small_blind,
            big_blind: seats.big_blind,
            players,
            board: Board::default(),
            street: Street::Preflop,
            pot: 0,
            total_bet_amount: 0,
            next_to_act: None,
            finalized: false,
            deck,
            started_at,
            finished_at: None,
        }
    }

    pub fn id(&self) -> HandId {
        self.id
    }

    /// Sequence number within the game, starting at 1.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Blind level captured when the hand was dealt.
    pub fn blinds(&self) -> &BlindLevel {
        &self.blinds
    }

    pub fn button(&self) -> PlayerId {
        self.button
    }

    pub fn small_blind(&self) -> PlayerId {
        self.small_blind
    }

    pub fn big_blind(&self) -> PlayerId {
        self.big_blind
    }

    /// Players in rank order (button first).
    pub fn players(&self) -> &[PlayerHand] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerHand> {
        self.players.iter().find(|ph| ph.player_id == player_id)
    }

    pub(crate) fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerHand> {
        self.players.iter_mut().find(|ph| ph.player_id == player_id)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn pot(&self) -> Chips {
        self.pot
    }

    pub fn total_bet_amount(&self) -> Chips {
        self.total_bet_amount
    }

    pub fn next_to_act(&self) -> Option<PlayerId> {
        self.next_to_act
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Cards still undealt in this hand's deck.
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub(crate) fn ensure_open(&self) -> Result<(), InvalidState> {
        if self.finalized {
            return Err(InvalidState::HandFinalized);
        }
        Ok(())
    }

    pub(crate) fn finalize(&mut self, finished_at: DateTime<Utc>) {
        self.finalized = true;
        self.street = Street::Complete;
        self.next_to_act = None;
        self.finished_at = Some(finished_at);
    }
}

/// A tournament table: roster, blind schedule, button and the hand in play.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Game {
    pub(crate) id: GameId,
    pub(crate) name: String,
    pub(crate) players: Vec<Player>,
    pub(crate) schedule: BlindSchedule,
    pub(crate) button: Option<PlayerId>,
    pub(crate) current_hand: Option<Hand>,
    pub(crate) started: bool,
    pub(crate) players_remaining: usize,
    pub(crate) hands_played: u64,
}

impl Game {
    pub fn new(id: GameId, name: &str, schedule: BlindSchedule) -> Self {
        Self {
            id,
            name: name.to_string(),
            players: Vec::with_capacity(MAX_PLAYERS),
            schedule,
            button: None,
            current_hand: None,
            started: false,
            players_remaining: 0,
            hands_played: 0,
        }
    }

    /// Seat a player before the game starts.
    ///
    /// # Errors
    ///
    /// Returns error if the game already started, the table is full, or the
    /// seat or player id is taken
    pub fn add_player(&mut self, player: Player) -> HandResult<()> {
        if self.started {
            return Err(InvalidState::GameAlreadyStarted.into());
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(InvalidState::CapacityReached.into());
        }
        if self.players.iter().any(|p| p.seat == player.seat) {
            return Err(InvalidState::SeatTaken(player.seat).into());
        }
        if self.players.iter().any(|p| p.id == player.id) {
            return Err(InvalidState::PlayerAlreadySeated(player.id).into());
        }
        self.players.push(player);
        Ok(())
    }

    /// Put the button in front of a player before the first hand. After the
    /// game starts the button only moves through rotation.
    ///
    /// # Errors
    ///
    /// Returns error if the game already started or the player isn't seated
    /// with chips
    pub fn set_button(&mut self, player_id: PlayerId) -> HandResult<()> {
        if self.started {
            return Err(InvalidState::GameAlreadyStarted.into());
        }
        let player = self
            .player(player_id)
            .ok_or(InvalidState::UnknownPlayer(player_id))?;
        if !player.is_active() {
            return Err(InvalidState::PlayerNotActive(player_id).into());
        }
        self.button = Some(player_id);
        Ok(())
    }

    /// Mark the game started. Without a pre-assigned button, the lowest
    /// occupied seat gets it.
    ///
    /// # Errors
    ///
    /// Returns error if already started or fewer than two players have chips
    pub fn start(&mut self) -> HandResult<()> {
        if self.started {
            return Err(InvalidState::GameAlreadyStarted.into());
        }
        let active = self.active_count();
        if active < MIN_PLAYERS {
            return Err(InvalidState::NotEnoughPlayers { active }.into());
        }
        if self.button.is_none() {
            self.button = rotation::first_active(&self.players).map(|p| p.id);
        }
        self.players_remaining = active;
        self.started = true;
        Ok(())
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Mutable access for the betting/showdown collaborators, which settle
    /// chip counts outside this crate.
    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    pub fn active_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_active()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    pub fn schedule(&self) -> &BlindSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut BlindSchedule {
        &mut self.schedule
    }

    pub fn button(&self) -> Option<PlayerId> {
        self.button
    }

    pub fn button_player(&self) -> Option<&Player> {
        self.button.and_then(|id| self.player(id))
    }

    pub fn current_hand(&self) -> Option<&Hand> {
        self.current_hand.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Players not yet eliminated. Only changes when a hand ends.
    pub fn players_remaining(&self) -> usize {
        self.players_remaining
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// One player left standing.
    pub fn is_finished(&self) -> bool {
        self.started && self.players_remaining < MIN_PLAYERS
    }

    /// Player posting the small blind in the current hand.
    ///
    /// # Errors
    ///
    /// Returns error if no hand has been dealt
    pub fn player_in_small_blind(&self) -> HandResult<&Player> {
        let hand = self.current_hand().ok_or(InvalidState::NoCurrentHand)?;
        self.seated(hand.small_blind)
    }

    /// Player posting the big blind in the current hand.
    ///
    /// # Errors
    ///
    /// Returns error if no hand has been dealt
    pub fn player_in_big_blind(&self) -> HandResult<&Player> {
        let hand = self.current_hand().ok_or(InvalidState::NoCurrentHand)?;
        self.seated(hand.big_blind)
    }

    fn seated(&self, player_id: PlayerId) -> HandResult<&Player> {
        Ok(self
            .player(player_id)
            .ok_or(InvalidState::UnknownPlayer(player_id))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::errors::HandError;
    use crate::tournament::config::BlindScheduleConfig;

    fn game() -> Game {
        let schedule = BlindScheduleConfig::standard().to_schedule().unwrap();
        Game::new(1, "test", schedule)
    }

    #[test]
    fn test_add_player_rejects_taken_seat() {
        let mut game = game();
        game.add_player(Player::new(1, "a", 1, 100)).unwrap();
        let err = game.add_player(Player::new(2, "b", 1, 100)).unwrap_err();
        assert!(matches!(
            err,
            HandError::InvalidState(InvalidState::SeatTaken(1))
        ));
    }

    #[test]
    fn test_add_player_rejects_duplicate_id() {
        let mut game = game();
        game.add_player(Player::new(1, "a", 1, 100)).unwrap();
        let err = game.add_player(Player::new(1, "a", 2, 100)).unwrap_err();
        assert!(matches!(
            err,
            HandError::InvalidState(InvalidState::PlayerAlreadySeated(1))
        ));
    }

    #[test]
    fn test_add_player_capacity() {
        let mut game = game();
        for i in 0..MAX_PLAYERS as i64 {
            game.add_player(Player::new(i, "p", i as u32, 100)).unwrap();
        }
        let err = game.add_player(Player::new(99, "late", 99, 100)).unwrap_err();
        assert!(matches!(
            err,
            HandError::InvalidState(InvalidState::CapacityReached)
        ));
    }

    #[test]
    fn test_start_needs_two_players() {
        let mut game = game();
        game.add_player(Player::new(1, "a", 1, 100)).unwrap();
        game.add_player(Player::new(2, "b", 2, 0)).unwrap();
        let err = game.start().unwrap_err();
        assert!(matches!(
            err,
            HandError::InvalidState(InvalidState::NotEnoughPlayers { active: 1 })
        ));
        assert!(!game.is_started());
    }

    #[test]
    fn test_start_defaults_button_to_lowest_seat() {
        let mut game = game();
        game.add_player(Player::new(7, "a", 5, 100)).unwrap();
        game.add_player(Player::new(8, "b", 2, 100)).unwrap();
        game.start().unwrap();
        assert_eq!(game.button(), Some(8));
        assert_eq!(game.players_remaining(), 2);
        assert!(!game.is_finished());
    }

    #[test]
    fn test_set_button() {
        let mut game = game();
        game.add_player(Player::new(1, "a", 1, 100)).unwrap();
        game.add_player(Player::new(2, "b", 2, 0)).unwrap();
        assert!(game.set_button(3).is_err());
        assert!(matches!(
            game.set_button(2).unwrap_err(),
            HandError::InvalidState(InvalidState::PlayerNotActive(2))
        ));
        game.set_button(1).unwrap();
        assert_eq!(game.button_player().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_roles_need_a_hand() {
        let game = game();
        assert!(matches!(
            game.player_in_small_blind().unwrap_err(),
            HandError::InvalidState(InvalidState::NoCurrentHand)
        ));
        assert!(game.player_in_big_blind().is_err());
    }

    #[test]
    fn test_game_serde_roundtrip() {
        let mut game = game();
        game.add_player(Player::new(1, "a", 1, 100)).unwrap();
        game.add_player(Player::new(2, "b", 2, 100)).unwrap();
        game.start().unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let restored: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, game);
    }
}
