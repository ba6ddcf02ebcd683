//! # Hydration Feature
//!
//! Pure domain logic for hydration tracking: reminder window membership,
//! timezone-aware clock helpers, and the emit-or-suppress notification
//! policy. Nothing in here blocks or performs I/O.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod clock;
pub mod policy;
pub mod window;

pub use clock::{local_now, resolve_tz, today_bounds_local};
pub use policy::{evaluate, Decision, SuppressReason};
pub use window::{is_within_window, parse_hm};
