//! # Core Module
//!
//! Core domain types, per-user configuration, and error handling for the
//! hydration bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config and error modules

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{
    UserConfig, UserId, DEFAULT_CUP_ML, DEFAULT_GOAL_ML, DEFAULT_INTERVAL_MIN, MAX_CUP_ML,
    MAX_GOAL_ML, MAX_INTERVAL_MIN, MIN_INTERVAL_MIN,
};
pub use error::{ConfigError, StoreError};
