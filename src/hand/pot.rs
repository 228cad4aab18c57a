//! Chip movement into the pot.
//!
//! The pot always equals the sum of every player's `bet_amount` for the
//! hand. Commits are capped at the player's stack, so a short stack goes
//! all-in instead of failing.

use super::{errors::InvalidState, models::Hand};
use crate::game::entities::{Chips, Player};

impl Hand {
    /// Move up to `amount` chips from `player`'s stack into the pot.
    /// Returns the chips actually committed.
    pub(crate) fn commit(
        &mut self,
        player: &mut Player,
        amount: Chips,
    ) -> Result<Chips, InvalidState> {
        let player_hand = self
            .player_mut(player.id)
            .ok_or(InvalidState::PlayerNotInHand(player.id))?;

        let committed = amount.min(player.chips);
        player.chips -= committed;
        player_hand.bet_amount += committed;
        player_hand.round_bet_amount += committed;
        self.pot += committed;
        Ok(committed)
    }

    /// Post the blinds. The outstanding street bet is the full big blind
    /// even when the big blind was short.
    pub(crate) fn post_blinds(
        &mut self,
        small_blind: &mut Player,
        big_blind: &mut Player,
    ) -> Result<(), InvalidState> {
        let (small, big) = (self.blinds.small_blind, self.blinds.big_blind);
        self.commit(small_blind, small)?;
        self.commit(big_blind, big)?;
        self.total_bet_amount = big;
        Ok(())
    }

    /// Raise the outstanding street bet to the largest per-street commit.
    pub(crate) fn sync_total_bet(&mut self) {
        let highest = self
            .players
            .iter()
            .map(|ph| ph.round_bet_amount)
            .max()
            .unwrap_or(0);
        self.total_bet_amount = self.total_bet_amount.max(highest);
    }

    /// Clear per-street bets for a new street. The pot carries over.
    pub(crate) fn reset_street_bets(&mut self) {
        self.total_bet_amount = 0;
        for player_hand in &mut self.players {
            player_hand.round_bet_amount = 0;
        }
    }

    /// Sum of every player's commits for the hand.
    pub fn bets_total(&self) -> Chips {
        self.players.iter().map(|ph| ph.bet_amount).sum()
    }

    pub fn is_pot_balanced(&self) -> bool {
        self.pot == self.bets_total()
    }
}
