//! Reminder window membership.
//!
//! A window is a daily HH:MM-HH:MM span in the user's local time. A window
//! whose start is later than its end wraps past midnight (22:00-06:00).

use chrono::NaiveTime;

use crate::core::ConfigError;

/// Parse an "HH:MM" wall-clock time.
pub fn parse_hm(s: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ConfigError::InvalidWindow(s.trim().to_string()))
}

/// Whether `current` falls inside the daily window, boundaries included.
///
/// Both bounds are closed. `start == end` therefore names a single-instant
/// window, not a 24-hour one; that falls out of the `<=` comparisons and is
/// deliberately not special-cased.
pub fn is_within_window(start: NaiveTime, end: NaiveTime, current: NaiveTime) -> bool {
    if start <= end {
        start <= current && current <= end
    } else {
        // Wraps past midnight, e.g. 22:00-06:00.
        current >= start || current <= end
    }
}
