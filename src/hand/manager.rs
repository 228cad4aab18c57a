//! Hand lifecycle: deal, reveal the board street by street, and close out.
//!
//! Every operation validates and draws its cards before it mutates anything,
//! so a failed call leaves the game exactly as it was.

use super::{
    dealer::{DeckSource, ShuffledDecks},
    errors::{HandResult, InvalidState},
    models::{Game, Hand},
};
use crate::game::{
    board::Street,
    constants::{HOLE_CARDS, MIN_PLAYERS},
    entities::{Chips, Deck, HoleCards, Player, PlayerId},
    rotation,
};
use crate::tournament::{
    clock::{Clock, SystemClock},
    models::LevelChange,
};

/// Drives hands for any number of games. Holds only the injected clock and
/// deck source; all game state lives in the `Game` passed to each call.
#[derive(Debug)]
pub struct HandManager<C = SystemClock, D = ShuffledDecks> {
    clock: C,
    decks: D,
}

impl Default for HandManager {
    fn default() -> Self {
        Self::new(SystemClock, ShuffledDecks::new())
    }
}

impl<C: Clock, D: DeckSource> HandManager<C, D> {
    pub fn new(clock: C, decks: D) -> Self {
        Self { clock, decks }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Deal a new hand at the game's stored button.
    ///
    /// Settles the blind level, assigns roles among players with chips,
    /// deals hole cards and posts both blinds. An unfinished hand in play is
    /// discarded without moving the button.
    ///
    /// # Errors
    ///
    /// Returns error if the game isn't started, fewer than two players have
    /// chips, or the deck can't cover the hole cards
    pub fn start_new_hand<'g>(&mut self, game: &'g mut Game) -> HandResult<&'g Hand> {
        if !game.started {
            return Err(InvalidState::GameNotStarted.into());
        }
        let active = game.active_count();
        if active < MIN_PLAYERS {
            return Err(InvalidState::NotEnoughPlayers { active }.into());
        }

        let button = resolve_button(game).ok_or(InvalidState::NotEnoughPlayers { active })?;
        let seats = rotation::assign_roles(&game.players, button)
            .ok_or(InvalidState::NotEnoughPlayers { active })?;

        let mut deck = self.decks.fresh_deck();
        let hole_cards = deal_hole_cards(&mut deck, seats.order.len())?;

        let now = self.clock.now();
        match game.schedule.resolve_level(now) {
            LevelChange::Advanced { from, to } => log::info!(
                "Game {}: blinds up from level {} to {}",
                game.id,
                from,
                to
            ),
            LevelChange::Renewed => log::debug!("Game {}: final blind level renewed", game.id),
            LevelChange::Started | LevelChange::Unchanged => {}
        }
        let blinds = game.schedule.current_level().clone();

        if let Some(previous) = &game.current_hand
            && !previous.finalized
        {
            log::warn!(
                "Game {}: hand #{} replaced before it was ended",
                game.id,
                previous.number
            );
        }

        let mut hand = Hand::new(
            game.hands_played + 1,
            blinds,
            &seats,
            &game.players,
            hole_cards,
            deck,
            now,
        );

        let (small_blind, big_blind) =
            blind_pair(&mut game.players, seats.small_blind, seats.big_blind)?;
        hand.post_blinds(small_blind, big_blind)?;
        hand.next_to_act = Some(seats.first_to_act);

        game.hands_played = hand.number;
        game.button = Some(button);

        log::info!(
            "Game {}: hand #{} dealt at {}, button {} sb {} bb {}",
            game.id,
            hand.number,
            hand.blinds,
            seats.button,
            seats.small_blind,
            seats.big_blind
        );
        Ok(game.current_hand.insert(hand))
    }

    /// Reveal three community cards.
    ///
    /// # Errors
    ///
    /// Returns error unless the current hand is open and on the preflop
    pub fn flop<'g>(&self, game: &'g mut Game) -> HandResult<&'g Hand> {
        self.deal_street(game, Street::Flop)
    }

    /// Reveal the fourth community card.
    ///
    /// # Errors
    ///
    /// Returns error unless the current hand is open and on the flop
    pub fn turn<'g>(&self, game: &'g mut Game) -> HandResult<&'g Hand> {
        self.deal_street(game, Street::Turn)
    }

    /// Reveal the fifth community card.
    ///
    /// # Errors
    ///
    /// Returns error unless the current hand is open and on the turn
    pub fn river<'g>(&self, game: &'g mut Game) -> HandResult<&'g Hand> {
        self.deal_street(game, Street::River)
    }

    fn deal_street<'g>(&self, game: &'g mut Game, street: Street) -> HandResult<&'g Hand> {
        let Game {
            id,
            players,
            current_hand,
            ..
        } = game;
        let hand = current_hand.as_mut().ok_or(InvalidState::NoCurrentHand)?;
        hand.ensure_open()?;

        if street.previous() != Some(hand.street) || !hand.board.can_reveal(street) {
            return Err(InvalidState::StreetOutOfOrder {
                requested: street,
                current: hand.street,
            }
            .into());
        }

        let mut deck = hand.deck.clone();
        let mut board = hand.board.clone();
        let cards = deck.deal_cards(street.cards_to_reveal())?;
        board.reveal(street, &cards)?;

        hand.deck = deck;
        hand.board = board;
        hand.street = street;
        hand.reset_street_bets();

        // First player with chips clockwise of the button.
        hand.next_to_act = hand
            .players
            .iter()
            .cycle()
            .skip(1)
            .take(hand.players.len())
            .find(|ph| {
                players
                    .iter()
                    .any(|p| p.id == ph.player_id && p.is_active())
            })
            .map(|ph| ph.player_id);

        log::debug!("Game {}: hand #{} {} {}", id, hand.number, street, hand.board);
        Ok(hand)
    }

    /// Close out the current hand: freeze it, eliminate players left
    /// without chips, and move the button for the next hand.
    ///
    /// Players busted in the same hand finish in order of the stack they
    /// started it with, bigger stack placing higher. A player whose stack
    /// was zeroed outside the hand is eliminated here too, below them.
    ///
    /// # Errors
    ///
    /// Returns error if there's no open hand
    pub fn end_hand(&self, game: &mut Game) -> HandResult<()> {
        let now = self.clock.now();
        let Game {
            id,
            players,
            current_hand,
            button,
            players_remaining,
            ..
        } = game;
        let hand = current_hand.as_mut().ok_or(InvalidState::NoCurrentHand)?;
        hand.ensure_open()?;
        hand.finalize(now);

        // Busted in this hand, in rank order, then anyone zeroed between
        // hands. Those never dealt in rank below everyone who was.
        let mut busted: Vec<(PlayerId, Chips)> = hand
            .players
            .iter()
            .map(|ph| (ph.player_id, ph.starting_chips))
            .chain(
                players
                    .iter()
                    .filter(|p| hand.player(p.id).is_none())
                    .map(|p| (p.id, 0)),
            )
            .filter(|&(player_id, _)| {
                players
                    .iter()
                    .any(|p| p.id == player_id && !p.is_active() && p.finish_position.is_none())
            })
            .collect();
        busted.sort_by(|a, b| b.1.cmp(&a.1));

        let remaining_after = players_remaining.saturating_sub(busted.len());
        for (offset, (player_id, _)) in busted.iter().enumerate() {
            if let Some(player) = players.iter_mut().find(|p| p.id == *player_id) {
                let position = remaining_after + offset + 1;
                player.finish_position = Some(position);
                log::info!("Game {}: {} eliminated in place {}", id, player, position);
            }
        }
        *players_remaining = remaining_after;

        if *players_remaining == 1
            && let Some(winner) = players.iter_mut().find(|p| p.is_active())
        {
            winner.finish_position = Some(1);
            log::info!("Game {}: {} wins", id, winner);
        }

        *button = hand
            .player(hand.button)
            .and_then(|ph| rotation::next_button(players, ph.seat))
            .map(|p| p.id);

        log::info!(
            "Game {}: hand #{} ended, pot {}, {} players remaining",
            id,
            hand.number,
            hand.pot,
            players_remaining
        );
        Ok(())
    }

    /// Commit chips from a player's stack into the pot, capped at the
    /// stack. Returns the chips actually committed.
    ///
    /// # Errors
    ///
    /// Returns error if there's no open hand or the player isn't in it
    pub fn commit_bet(
        &self,
        game: &mut Game,
        player_id: PlayerId,
        amount: Chips,
    ) -> HandResult<Chips> {
        let Game {
            players,
            current_hand,
            ..
        } = game;
        let hand = current_hand.as_mut().ok_or(InvalidState::NoCurrentHand)?;
        hand.ensure_open()?;
        let player = players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(InvalidState::UnknownPlayer(player_id))?;

        let committed = hand.commit(player, amount)?;
        hand.sync_total_bet();
        Ok(committed)
    }
}

/// Button for the next hand: the stored one, moved on if that player has
/// since lost their stack, or the lowest active seat if none is stored.
fn resolve_button(game: &Game) -> Option<PlayerId> {
    match game.button_player() {
        Some(player) if player.is_active() => Some(player.id),
        Some(player) => rotation::next_button(&game.players, player.seat).map(|p| p.id),
        None => rotation::first_active(&game.players).map(|p| p.id),
    }
}

/// Deal two rounds, one card at a time, starting left of the button.
/// The result is indexed by rank.
fn deal_hole_cards(deck: &mut Deck, players: usize) -> HandResult<Vec<HoleCards>> {
    let cards = deck.deal_cards(players * HOLE_CARDS)?;
    Ok((0..players)
        .map(|rank| {
            let dealt = (rank + players - 1) % players;
            [cards[dealt], cards[players + dealt]]
        })
        .collect())
}

/// Both blind posters, borrowed mutably at once.
fn blind_pair(
    players: &mut [Player],
    small_blind: PlayerId,
    big_blind: PlayerId,
) -> Result<(&mut Player, &mut Player), InvalidState> {
    let mut small = None;
    let mut big = None;
    for player in players.iter_mut() {
        if player.id == small_blind {
            small = Some(player);
        } else if player.id == big_blind {
            big = Some(player);
        }
    }
    match (small, big) {
        (Some(small), Some(big)) => Ok((small, big)),
        (None, _) => Err(InvalidState::UnknownPlayer(small_blind)),
        (_, None) => Err(InvalidState::UnknownPlayer(big_blind)),
    }
}
