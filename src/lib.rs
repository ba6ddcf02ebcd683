// Core layer - shared domain types, configuration, and errors
pub mod core;

// Features layer - hydration domain logic and reminder scheduling
pub mod features;

// Infrastructure - persistence for user configs and the intake log
pub mod database;

// Application layer - chat command parsing and routing
pub mod commands;

// Re-export core types for convenience
pub use core::{ConfigError, StoreError, UserConfig, UserId};

// Re-export feature items
pub use features::{
    // Hydration
    evaluate, is_within_window, local_now, parse_hm, resolve_tz, today_bounds_local, Decision,
    SuppressReason,
    // Reminders
    Notifier, ReminderScheduler,
};

// Re-export persistence items
pub use database::{HydrationStore, SqliteStore};

// Re-export the command router
pub use commands::CommandRouter;
