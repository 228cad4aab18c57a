//! Tournament structure: blind levels, the level timer and its clock.
//!
//! This module provides:
//! - Blind levels and the escalating `BlindSchedule`
//! - Schedule configuration (presets, JSON, environment)
//! - The injectable `Clock` the level timer reads
//!
//! ## Example
//!
//! ```
//! use tourney_poker::tournament::{BlindScheduleConfig, Clock, SystemClock};
//!
//! let config = BlindScheduleConfig::turbo();
//! let mut schedule = config.to_schedule().unwrap();
//!
//! schedule.resolve_level(SystemClock.now());
//! assert_eq!(schedule.current_level().big_blind, 20);
//! ```

pub mod clock;
pub mod config;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BlindScheduleConfig, ConfigError};
pub use models::{BlindLevel, BlindSchedule, LevelChange};
