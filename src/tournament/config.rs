//! Blind-schedule configuration.
//!
//! Supplies the ordered level list, the level duration and the starting stack,
//! either from a preset, from JSON, or from environment variables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{BlindLevel, BlindSchedule};
use crate::game::{
    constants::{DEFAULT_LEVEL_SECS, DEFAULT_STARTING_CHIPS},
    entities::Chips,
};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Blind schedule has no levels")]
    EmptySchedule,

    #[error("Starting level {0} is not in the schedule")]
    UnknownStartingLevel(u32),

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid blind level '{0}': expected SMALL/BIG")]
    MalformedLevel(String),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Blind schedule configuration for a tournament table
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BlindScheduleConfig {
    /// Blind levels in the order they're played
    pub levels: Vec<BlindLevel>,
    /// Duration of every level in seconds
    pub level_duration_secs: u32,
    /// Level number to start on (usually 1)
    pub starting_level: u32,
    /// Chips each player is seated with
    pub starting_chips: Chips,
}

impl Default for BlindScheduleConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl BlindScheduleConfig {
    /// Standard structure: 20-minute levels, 2000 chip stacks.
    pub fn standard() -> Self {
        Self {
            levels: levels_from_pairs(&[
                (10, 20),
                (15, 30),
                (20, 40),
                (30, 60),
                (40, 80),
                (50, 100),
                (75, 150),
                (100, 200),
                (150, 300),
                (200, 400),
                (300, 600),
                (400, 800),
            ]),
            level_duration_secs: DEFAULT_LEVEL_SECS,
            starting_level: 1,
            starting_chips: DEFAULT_STARTING_CHIPS,
        }
    }

    /// Turbo: same levels, 5-minute clock.
    pub fn turbo() -> Self {
        Self {
            level_duration_secs: 5 * 60,
            ..Self::standard()
        }
    }

    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or fails validation
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables, falling back to the
    /// standard preset for anything unset.
    ///
    /// Recognized variables:
    /// - `BLIND_LEVELS`: comma separated `SMALL/BIG` pairs (e.g. `10/20,15/30`)
    /// - `BLIND_LEVEL_SECS`: level duration in seconds
    /// - `BLIND_STARTING_LEVEL`: level number to start on
    /// - `STARTING_CHIPS`: chips per player
    ///
    /// # Errors
    ///
    /// Returns error if `BLIND_LEVELS` is malformed or the result fails
    /// validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::standard();
        let levels = match std::env::var("BLIND_LEVELS") {
            Ok(raw) => parse_levels(&raw)?,
            Err(_) => defaults.levels,
        };

        let config = Self {
            levels,
            level_duration_secs: parse_env_or("BLIND_LEVEL_SECS", defaults.level_duration_secs),
            starting_level: parse_env_or("BLIND_STARTING_LEVEL", defaults.starting_level),
            starting_chips: parse_env_or("STARTING_CHIPS", defaults.starting_chips),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error describing the first invalid setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }

        for (idx, level) in self.levels.iter().enumerate() {
            if level.level != idx as u32 + 1 {
                return Err(ConfigError::Invalid {
                    var: "levels".to_string(),
                    reason: format!("expected level {}, got {}", idx + 1, level.level),
                });
            }
            if level.small_blind == 0 {
                return Err(ConfigError::Invalid {
                    var: "levels".to_string(),
                    reason: format!("level {}: small blind must be greater than 0", level.level),
                });
            }
            if level.big_blind <= level.small_blind {
                return Err(ConfigError::Invalid {
                    var: "levels".to_string(),
                    reason: format!(
                        "level {}: big blind must be greater than small blind ({})",
                        level.level, level.small_blind
                    ),
                });
            }
        }

        if self.level_duration_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "level_duration_secs".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.starting_level == 0 || self.starting_level as usize > self.levels.len() {
            return Err(ConfigError::UnknownStartingLevel(self.starting_level));
        }

        if self.starting_chips == 0 {
            return Err(ConfigError::Invalid {
                var: "starting_chips".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Build the schedule a new game starts with.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration fails validation
    pub fn to_schedule(&self) -> Result<BlindSchedule, ConfigError> {
        self.validate()?;
        BlindSchedule::new(
            self.levels.clone(),
            self.level_duration_secs,
            self.starting_level as usize - 1,
        )
    }
}

fn levels_from_pairs(pairs: &[(Chips, Chips)]) -> Vec<BlindLevel> {
    pairs
        .iter()
        .enumerate()
        .map(|(idx, &(small, big))| BlindLevel::new(idx as u32 + 1, small, big))
        .collect()
}

/// Parse `SMALL/BIG` pairs separated by commas.
fn parse_levels(raw: &str) -> Result<Vec<BlindLevel>, ConfigError> {
    let pairs = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (small, big) = pair
                .split_once('/')
                .ok_or_else(|| ConfigError::MalformedLevel(pair.to_string()))?;
            let small = small
                .trim()
                .parse()
                .map_err(|_| ConfigError::MalformedLevel(pair.to_string()))?;
            let big = big
                .trim()
                .parse()
                .map_err(|_| ConfigError::MalformedLevel(pair.to_string()))?;
            Ok((small, big))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(levels_from_pairs(&pairs))
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
