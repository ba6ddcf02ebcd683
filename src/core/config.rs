//! # User Configuration
//!
//! Per-user hydration settings: daily goal, cup size, reminder cadence, the
//! daily reminder window, and timezone. All numeric limits are enforced here,
//! so downstream code can assume any `UserConfig` it sees is valid.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with env-overridable defaults

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Opaque chat-platform user identifier.
pub type UserId = u64;

pub const DEFAULT_GOAL_ML: u32 = 2000;
pub const DEFAULT_CUP_ML: u32 = 250;
pub const DEFAULT_INTERVAL_MIN: u32 = 60;

pub const MAX_GOAL_ML: u32 = 10_000;
pub const MAX_CUP_ML: u32 = 2_000;
pub const MIN_INTERVAL_MIN: u32 = 10;
pub const MAX_INTERVAL_MIN: u32 = 480;

const DEFAULT_TZ: Tz = chrono_tz::Europe::Dublin;

/// Per-user hydration settings.
///
/// The window bounds are local times of day; `start_hm > end_hm` means the
/// window wraps past midnight (for example 22:00-06:00). The timezone is a
/// resolved [`Tz`], never a raw string, so fire-time code cannot hit an
/// unresolvable zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Chat-platform user this config belongs to
    pub user_id: UserId,

    /// Daily intake target in millilitres
    pub goal_ml: u32,

    /// Default serving size in millilitres
    pub cup_ml: u32,

    /// Reminder recurrence period in minutes
    pub interval_min: u32,

    /// Local time of day the reminder window opens
    pub start_hm: NaiveTime,

    /// Local time of day the reminder window closes
    pub end_hm: NaiveTime,

    /// The user's IANA timezone
    pub tz: Tz,
}

impl UserConfig {
    /// Build a config with the stock defaults for a new user.
    ///
    /// `HYDROBOT_DEFAULT_TZ`, `HYDROBOT_START_HM` and `HYDROBOT_END_HM`
    /// override the shipped defaults; malformed values fall back silently.
    pub fn with_defaults(user_id: UserId) -> Self {
        Self {
            user_id,
            goal_ml: DEFAULT_GOAL_ML,
            cup_ml: DEFAULT_CUP_ML,
            interval_min: DEFAULT_INTERVAL_MIN,
            start_hm: env_hm("HYDROBOT_START_HM").unwrap_or_else(|| hm(9, 0)),
            end_hm: env_hm("HYDROBOT_END_HM").unwrap_or_else(|| hm(21, 0)),
            tz: std::env::var("HYDROBOT_DEFAULT_TZ")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TZ),
        }
    }

    /// Set the daily goal, enforcing 1..=[`MAX_GOAL_ML`].
    pub fn set_goal(&mut self, goal_ml: u32) -> Result<(), ConfigError> {
        if goal_ml == 0 || goal_ml > MAX_GOAL_ML {
            return Err(ConfigError::InvalidGoal {
                got: goal_ml,
                min: 1,
                max: MAX_GOAL_ML,
            });
        }
        self.goal_ml = goal_ml;
        Ok(())
    }

    /// Set the default serving size, enforcing 1..=[`MAX_CUP_ML`].
    pub fn set_cup(&mut self, cup_ml: u32) -> Result<(), ConfigError> {
        if cup_ml == 0 || cup_ml > MAX_CUP_ML {
            return Err(ConfigError::InvalidCup {
                got: cup_ml,
                min: 1,
                max: MAX_CUP_ML,
            });
        }
        self.cup_ml = cup_ml;
        Ok(())
    }

    /// Set the reminder interval, enforcing
    /// [`MIN_INTERVAL_MIN`]..=[`MAX_INTERVAL_MIN`].
    pub fn set_interval(&mut self, interval_min: u32) -> Result<(), ConfigError> {
        if !(MIN_INTERVAL_MIN..=MAX_INTERVAL_MIN).contains(&interval_min) {
            return Err(ConfigError::InvalidInterval {
                got: interval_min,
                min: MIN_INTERVAL_MIN,
                max: MAX_INTERVAL_MIN,
            });
        }
        self.interval_min = interval_min;
        Ok(())
    }

    /// Set the reminder window from already-parsed bounds.
    ///
    /// `start > end` is a valid wrap-around window, and `start == end` is a
    /// valid single-instant window, so there is nothing left to reject here.
    pub fn set_window(&mut self, start_hm: NaiveTime, end_hm: NaiveTime) {
        self.start_hm = start_hm;
        self.end_hm = end_hm;
    }

    /// Set the timezone from an already-resolved zone.
    pub fn set_tz(&mut self, tz: Tz) {
        self.tz = tz;
    }
}

/// Validate one logged drink amount, enforcing 1..=[`MAX_CUP_ML`].
pub fn validate_amount(amount_ml: u32) -> Result<u32, ConfigError> {
    if amount_ml == 0 || amount_ml > MAX_CUP_ML {
        return Err(ConfigError::InvalidAmount {
            got: amount_ml,
            min: 1,
            max: MAX_CUP_ML,
        });
    }
    Ok(amount_ml)
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn env_hm(var: &str) -> Option<NaiveTime> {
    let raw = std::env::var(var).ok()?;
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}
