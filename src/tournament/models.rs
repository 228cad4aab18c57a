//! Blind levels and the timer that escalates them.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::ConfigError;
use crate::game::entities::Chips;

/// One rung of the blind structure
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BlindLevel {
    /// Level number (1-indexed)
    pub level: u32,
    /// Small blind amount
    pub small_blind: Chips,
    /// Big blind amount
    pub big_blind: Chips,
}

impl BlindLevel {
    /// Create a new blind level
    pub fn new(level: u32, small_blind: Chips, big_blind: Chips) -> Self {
        Self {
            level,
            small_blind,
            big_blind,
        }
    }
}

impl fmt::Display for BlindLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} ({}/{})",
            self.level, self.small_blind, self.big_blind
        )
    }
}

/// What `BlindSchedule::resolve_level` did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LevelChange {
    /// First hand: the starting level's clock began.
    Started,
    /// The level expired and the schedule moved up.
    Advanced { from: u32, to: u32 },
    /// The final level expired; its clock was renewed in place.
    Renewed,
    /// The level is still running.
    Unchanged,
}

/// Ordered blind levels plus the running level's clock.
///
/// The level index never moves backwards. The expiry stays `None` until the
/// first hand is dealt, which keeps "not started" apart from "expired".
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "StoredSchedule")]
pub struct BlindSchedule {
    levels: Vec<BlindLevel>,
    level_duration_secs: u32,
    current_idx: usize,
    level_expires_at: Option<DateTime<Utc>>,
}

/// Schedule as stored, checked by `BlindSchedule::new` on the way in.
#[derive(Deserialize)]
struct StoredSchedule {
    levels: Vec<BlindLevel>,
    level_duration_secs: u32,
    current_idx: usize,
    level_expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<StoredSchedule> for BlindSchedule {
    type Error = ConfigError;

    fn try_from(stored: StoredSchedule) -> Result<Self, Self::Error> {
        let mut schedule =
            BlindSchedule::new(stored.levels, stored.level_duration_secs, stored.current_idx)?;
        schedule.level_expires_at = stored.level_expires_at;
        Ok(schedule)
    }
}

impl BlindSchedule {
    /// Create a schedule starting at `starting_idx` (0-based).
    ///
    /// # Errors
    ///
    /// Returns error if there are no levels, the duration is zero, or the
    /// starting index is out of range
    pub fn new(
        levels: Vec<BlindLevel>,
        level_duration_secs: u32,
        starting_idx: usize,
    ) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        if level_duration_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "level_duration_secs".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        if starting_idx >= levels.len() {
            return Err(ConfigError::UnknownStartingLevel(starting_idx as u32 + 1));
        }

        Ok(Self {
            levels,
            level_duration_secs,
            current_idx: starting_idx,
            level_expires_at: None,
        })
    }

    pub fn levels(&self) -> &[BlindLevel] {
        &self.levels
    }

    pub fn current_index(&self) -> usize {
        self.current_idx
    }

    pub fn current_level(&self) -> &BlindLevel {
        &self.levels[self.current_idx]
    }

    pub fn level_duration(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.level_duration_secs))
    }

    pub fn level_expires_at(&self) -> Option<DateTime<Utc>> {
        self.level_expires_at
    }

    /// Overwrite the running level's expiry, e.g. when restoring a game
    /// whose clock was stored elsewhere.
    pub fn set_level_expires_at(&mut self, expires_at: DateTime<Utc>) {
        self.level_expires_at = Some(expires_at);
    }

    /// Settle which level applies to a hand dealt at `now`.
    ///
    /// - No expiry yet: keep the starting level and start its clock.
    /// - Expiry at or before `now`: move to the next level (or stay on the
    ///   last one) and restart the clock.
    /// - Expiry in the future: touch nothing.
    pub fn resolve_level(&mut self, now: DateTime<Utc>) -> LevelChange {
        let change = match self.level_expires_at {
            None => LevelChange::Started,
            Some(expires_at) if expires_at <= now => {
                if self.current_idx + 1 < self.levels.len() {
                    let from = self.current_level().level;
                    self.current_idx += 1;
                    LevelChange::Advanced {
                        from,
                        to: self.current_level().level,
                    }
                } else {
                    LevelChange::Renewed
                }
            }
            Some(_) => return LevelChange::Unchanged,
        };

        self.level_expires_at = Some(now + self.level_duration());
        change
    }

    /// Time left on the running level, clamped at zero. `None` before the
    /// first hand.
    pub fn time_to_next_level(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.level_expires_at
            .map(|expires_at| (expires_at - now).max(TimeDelta::zero()))
    }
}
