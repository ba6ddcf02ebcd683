//! # Features Module
//!
//! Feature modules for the hydration bot: the pure hydration domain logic
//! (windows, clocks, notification policy) and the reminder scheduler built
//! on top of it.

pub mod hydration;
pub mod reminders;

// Re-export commonly used items
pub use hydration::{
    evaluate, is_within_window, local_now, parse_hm, resolve_tz, today_bounds_local, Decision,
    SuppressReason,
};
pub use reminders::{Notifier, ReminderScheduler};
