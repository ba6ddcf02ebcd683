//! # Reminders Feature
//!
//! Per-user recurring reminder scheduling with policy-gated delivery.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

pub mod scheduler;

pub use scheduler::{Notifier, ReminderScheduler};
