//! Timezone-aware clock helpers.
//!
//! Every timezone-dependent computation lives here: identifier resolution,
//! the user's local "now", and the local-day bounds used to query the
//! UTC-indexed intake log. Each helper has an `_at` variant taking the UTC
//! instant explicitly so tests can pin the clock.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::ConfigError;

/// Resolve an IANA timezone identifier.
///
/// This is the only place `InvalidTimezone` can arise. Stored configs carry
/// an already-resolved [`Tz`], so reminder fires never re-validate zones.
pub fn resolve_tz(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(name.trim().to_string()))
}

/// The current wall-clock time in the user's zone.
pub fn local_now(tz: Tz) -> DateTime<Tz> {
    local_now_at(tz, Utc::now())
}

/// `now_utc` converted into the user's zone.
pub fn local_now_at(tz: Tz, now_utc: DateTime<Utc>) -> DateTime<Tz> {
    now_utc.with_timezone(&tz)
}

/// Local midnight of today and of the following day, as zone-aware instants.
///
/// On a daylight-saving transition day the two instants are not 24 hours
/// apart; callers convert them to UTC to bound "today" queries against the
/// intake log, which is exactly why this is not a naive +24h computation.
pub fn today_bounds_local(tz: Tz) -> (DateTime<Tz>, DateTime<Tz>) {
    today_bounds_local_at(tz, Utc::now())
}

/// Testable variant of [`today_bounds_local`].
pub fn today_bounds_local_at(tz: Tz, now_utc: DateTime<Utc>) -> (DateTime<Tz>, DateTime<Tz>) {
    let today = local_now_at(tz, now_utc).date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    (local_day_start(tz, today), local_day_start(tz, tomorrow))
}

/// First representable instant of `date` in `tz`.
///
/// Midnight can be skipped or doubled by a DST transition: a skipped
/// midnight advances to the next valid wall-clock time, an ambiguous one
/// takes the earlier instant.
pub fn local_day_start(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let mut wall = date.and_time(NaiveTime::MIN);
    loop {
        match tz.from_local_datetime(&wall) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earlier, _) => return earlier,
            LocalResult::None => wall += Duration::minutes(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_resolve_tz() {
        assert_eq!(resolve_tz("Europe/Dublin"), Ok(chrono_tz::Europe::Dublin));
        assert_eq!(resolve_tz(" UTC "), Ok(chrono_tz::UTC));
        assert_eq!(
            resolve_tz("Atlantis/Central"),
            Err(ConfigError::InvalidTimezone("Atlantis/Central".to_string()))
        );
    }

    #[test]
    fn test_local_now_at_applies_offset() {
        // Dublin is UTC+1 in summer
        let local = local_now_at(chrono_tz::Europe::Dublin, utc("2025-07-01T12:00:00Z"));
        assert_eq!(local.time(), NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn test_today_bounds_regular_day() {
        let tz = chrono_tz::Europe::Dublin;
        let (start, end) = today_bounds_local_at(tz, utc("2025-07-01T12:00:00Z"));
        assert_eq!(start.time(), NaiveTime::MIN);
        assert_eq!(end.time(), NaiveTime::MIN);
        assert_eq!(end.signed_duration_since(start), Duration::hours(24));
    }

    #[test]
    fn test_today_bounds_spring_forward() {
        // Dublin 2025-03-30: clocks jump forward, the local day is 23 hours
        let tz = chrono_tz::Europe::Dublin;
        let (start, end) = today_bounds_local_at(tz, utc("2025-03-30T12:00:00Z"));
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 30).unwrap());
        assert_eq!(end.signed_duration_since(start), Duration::hours(23));
    }

    #[test]
    fn test_today_bounds_fall_back() {
        // Dublin 2025-10-26: clocks fall back, the local day is 25 hours
        let tz = chrono_tz::Europe::Dublin;
        let (start, end) = today_bounds_local_at(tz, utc("2025-10-26T12:00:00Z"));
        assert_eq!(end.signed_duration_since(start), Duration::hours(25));
    }

    #[test]
    fn test_bounds_follow_local_date_not_utc_date() {
        // 23:30 UTC is already the next local day in Almaty (UTC+5)
        let tz = chrono_tz::Asia::Almaty;
        let (start, _) = today_bounds_local_at(tz, utc("2025-07-01T23:30:00Z"));
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
    }

    #[test]
    fn test_skipped_midnight_advances() {
        // Santiago springs forward over midnight: Sep 7 2025 00:00 does not
        // exist, the local day starts at 01:00
        let tz = chrono_tz::America::Santiago;
        let start = local_day_start(tz, NaiveDate::from_ymd_opt(2025, 9, 7).unwrap());
        assert_eq!(start.time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }
}
