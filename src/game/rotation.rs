//! Seat rotation: moving the button and handing out blind roles.
//!
//! Everything here is a pure function of the roster's seat positions and
//! chip counts. Nothing is cached between hands, so eliminations between
//! hands can never leave a stale successor behind.

use serde::{Deserialize, Serialize};

use super::constants::MIN_PLAYERS;
use super::entities::{Player, PlayerId, SeatPosition};

/// Roles for one hand, derived from the active players and the button.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatAssignment {
    /// Active players clockwise from the button. A player's index is their
    /// relative rank for the hand (button = 0).
    pub order: Vec<PlayerId>,
    pub button: PlayerId,
    pub small_blind: PlayerId,
    pub big_blind: PlayerId,
    /// First to act preflop: the active player clockwise of the big blind.
    pub first_to_act: PlayerId,
}

impl SeatAssignment {
    pub fn rank_of(&self, player_id: PlayerId) -> Option<usize> {
        self.order.iter().position(|&id| id == player_id)
    }

    /// Heads-up: the button also posts the small blind.
    pub fn is_heads_up(&self) -> bool {
        self.order.len() == MIN_PLAYERS
    }
}

/// Active players sorted by seat.
fn active_by_seat(players: &[Player]) -> Vec<&Player> {
    let mut active: Vec<&Player> = players.iter().filter(|p| p.is_active()).collect();
    active.sort_by_key(|p| (p.seat, p.id));
    active
}

/// Active players in clockwise order, starting at the first active seat at
/// or after `seat`.
pub fn clockwise_from(players: &[Player], seat: SeatPosition) -> Vec<&Player> {
    let mut active = active_by_seat(players);
    let start = active.iter().position(|p| p.seat >= seat).unwrap_or(0);
    active.rotate_left(start);
    active
}

/// The active player in the lowest seat. Used when no button has been
/// assigned yet.
pub fn first_active(players: &[Player]) -> Option<&Player> {
    active_by_seat(players).into_iter().next()
}

/// The player who takes the button after the player seated at
/// `prior_button_seat`: the active player in the smallest seat strictly
/// greater than it, wrapping to the smallest active seat. Players without
/// chips are skipped.
pub fn next_button(players: &[Player], prior_button_seat: SeatPosition) -> Option<&Player> {
    let active = active_by_seat(players);
    active
        .iter()
        .find(|p| p.seat > prior_button_seat)
        .or_else(|| active.first())
        .copied()
}

/// Order the active players around `button` and hand out the blinds.
///
/// Returns `None` if fewer than two players are active or if `button` isn't
/// one of them.
pub fn assign_roles(players: &[Player], button: PlayerId) -> Option<SeatAssignment> {
    let button_player = players.iter().find(|p| p.id == button && p.is_active())?;
    let order: Vec<PlayerId> = clockwise_from(players, button_player.seat)
        .into_iter()
        .map(|p| p.id)
        .collect();

    let n = order.len();
    if n < MIN_PLAYERS {
        return None;
    }

    let (small_blind_rank, big_blind_rank) = if n == MIN_PLAYERS { (0, 1) } else { (1, 2) };
    Some(SeatAssignment {
        button,
        small_blind: order[small_blind_rank],
        big_blind: order[big_blind_rank],
        first_to_act: order[(big_blind_rank + 1) % n],
        order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(stacks: &[(SeatPosition, u32)]) -> Vec<Player> {
        stacks
            .iter()
            .map(|&(seat, chips)| Player::new(i64::from(seat), &format!("p{seat}"), seat, chips))
            .collect()
    }

    #[test]
    fn test_next_button_moves_one_seat() {
        let players = table(&[(1, 100), (2, 100), (3, 100), (4, 100)]);
        assert_eq!(next_button(&players, 1).unwrap().seat, 2);
        assert_eq!(next_button(&players, 3).unwrap().seat, 4);
    }

    #[test]
    fn test_next_button_wraps() {
        let players = table(&[(1, 100), (2, 100), (3, 100)]);
        assert_eq!(next_button(&players, 3).unwrap().seat, 1);
        assert_eq!(next_button(&players, 99).unwrap().seat, 1);
    }

    #[test]
    fn test_next_button_skips_busted_players() {
        let players = table(&[(1, 100), (2, 0), (3, 0), (4, 100)]);
        assert_eq!(next_button(&players, 1).unwrap().seat, 4);
        assert_eq!(next_button(&players, 4).unwrap().seat, 1);
    }

    #[test]
    fn test_next_button_handles_seat_gaps() {
        let players = table(&[(2, 100), (5, 100), (9, 100)]);
        assert_eq!(next_button(&players, 2).unwrap().seat, 5);
        assert_eq!(next_button(&players, 6).unwrap().seat, 9);
    }

    #[test]
    fn test_next_button_empty_table() {
        let players = table(&[(1, 0), (2, 0)]);
        assert!(next_button(&players, 1).is_none());
    }

    #[test]
    fn test_assign_roles_full_ring() {
        let players = table(&[(1, 100), (2, 100), (3, 100), (4, 100)]);
        let seats = assign_roles(&players, 1).unwrap();
        assert_eq!(seats.order, vec![1, 2, 3, 4]);
        assert_eq!(seats.small_blind, 2);
        assert_eq!(seats.big_blind, 3);
        assert_eq!(seats.first_to_act, 4);
        assert!(!seats.is_heads_up());
    }

    #[test]
    fn test_assign_roles_wraps_past_last_seat() {
        let players = table(&[(1, 100), (2, 100), (3, 100), (4, 100)]);
        let seats = assign_roles(&players, 3).unwrap();
        assert_eq!(seats.order, vec![3, 4, 1, 2]);
        assert_eq!(seats.small_blind, 4);
        assert_eq!(seats.big_blind, 1);
        assert_eq!(seats.first_to_act, 2);
    }

    #[test]
    fn test_assign_roles_three_handed_button_acts_first() {
        let players = table(&[(1, 100), (2, 100), (3, 100)]);
        let seats = assign_roles(&players, 1).unwrap();
        assert_eq!(seats.first_to_act, 1);
    }

    #[test]
    fn test_assign_roles_heads_up() {
        let players = table(&[(1, 0), (2, 100), (3, 100), (4, 0)]);
        let seats = assign_roles(&players, 2).unwrap();
        assert!(seats.is_heads_up());
        assert_eq!(seats.order, vec![2, 3]);
        assert_eq!(seats.small_blind, 2);
        assert_eq!(seats.big_blind, 3);
        assert_eq!(seats.first_to_act, 2);
    }

    #[test]
    fn test_assign_roles_skips_busted_between_blinds() {
        let players = table(&[(1, 100), (2, 0), (3, 100), (4, 100)]);
        let seats = assign_roles(&players, 1).unwrap();
        assert_eq!(seats.order, vec![1, 3, 4]);
        assert_eq!(seats.small_blind, 3);
        assert_eq!(seats.big_blind, 4);
        assert_eq!(seats.rank_of(4), Some(2));
        assert_eq!(seats.rank_of(2), None);
    }

    #[test]
    fn test_assign_roles_rejects_inactive_button() {
        let players = table(&[(1, 0), (2, 100), (3, 100)]);
        assert!(assign_roles(&players, 1).is_none());
    }

    #[test]
    fn test_assign_roles_needs_two_players() {
        let players = table(&[(1, 100), (2, 0)]);
        assert!(assign_roles(&players, 1).is_none());
    }

    #[test]
    fn test_first_active() {
        let players = table(&[(3, 100), (1, 0), (2, 100)]);
        assert_eq!(first_active(&players).unwrap().seat, 2);
    }
}
