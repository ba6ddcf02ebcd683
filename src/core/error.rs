//! Typed errors for the configuration and store boundaries.
//!
//! Configuration errors can only arise while a user is changing settings.
//! Stored configs carry already-validated values, so the reminder fire path
//! never sees any of these.

use thiserror::Error;

use super::config::UserId;

/// Rejected user input at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The timezone identifier is not a known IANA zone.
    #[error("unknown timezone \"{0}\"")]
    InvalidTimezone(String),

    /// A window bound or window spec is not a well-formed HH:MM value.
    #[error("invalid time \"{0}\", expected HH:MM")]
    InvalidWindow(String),

    /// Reminder interval outside the supported range.
    #[error("interval must be {min}-{max} minutes, got {got}")]
    InvalidInterval { got: u32, min: u32, max: u32 },

    /// Daily goal outside the supported range.
    #[error("daily goal must be {min}-{max} ml, got {got}")]
    InvalidGoal { got: u32, min: u32, max: u32 },

    /// Cup size outside the supported range.
    #[error("cup size must be {min}-{max} ml, got {got}")]
    InvalidCup { got: u32, min: u32, max: u32 },

    /// A single logged intake outside the supported range.
    #[error("amount must be {min}-{max} ml, got {got}")]
    InvalidAmount { got: u32, min: u32, max: u32 },
}

/// Errors raised by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The user was never initialized in the store.
    #[error("user {0} is not registered")]
    UserNotFound(UserId),
}
