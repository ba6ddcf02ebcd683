//! SQLite implementation of the [`HydrationStore`] trait.
//!
//! One connection behind a mutex; every call is a short, synchronous
//! statement. Timestamps are stored as fixed-width RFC 3339 UTC strings so
//! range predicates can compare them lexically.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use log::{debug, info};

use super::HydrationStore;
use crate::core::{StoreError, UserConfig, UserId};
use crate::features::hydration::clock::{self, local_day_start};
use crate::features::hydration::window::parse_hm;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY,
        goal_ml INTEGER NOT NULL,
        cup_ml INTEGER NOT NULL,
        interval_min INTEGER NOT NULL,
        start_hm TEXT NOT NULL,
        end_hm TEXT NOT NULL,
        tz TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS intake_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        amount_ml INTEGER NOT NULL,
        ts_utc TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users (user_id)
    );
    CREATE INDEX IF NOT EXISTS idx_intake_user_ts ON intake_log (user_id, ts_utc);
";

/// SQLite-backed store for configs and intake logs.
pub struct SqliteStore {
    conn: Mutex<sqlite::Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    /// `":memory:"` gives a throwaway store for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = sqlite::open(path)?;
        conn.execute(SCHEMA)?;
        debug!("Opened hydration store at {path}");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, sqlite::Connection>> {
        self.conn.lock().map_err(|_| anyhow!("store mutex poisoned"))
    }
}

/// Fixed-width RFC 3339 so stored timestamps order lexically.
fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn row_to_config(stmt: &sqlite::Statement<'_>) -> Result<UserConfig> {
    Ok(UserConfig {
        user_id: stmt.read::<i64, _>("user_id")? as UserId,
        goal_ml: stmt.read::<i64, _>("goal_ml")? as u32,
        cup_ml: stmt.read::<i64, _>("cup_ml")? as u32,
        interval_min: stmt.read::<i64, _>("interval_min")? as u32,
        start_hm: parse_hm(&stmt.read::<String, _>("start_hm")?)?,
        end_hm: parse_hm(&stmt.read::<String, _>("end_hm")?)?,
        tz: clock::resolve_tz(&stmt.read::<String, _>("tz")?)?,
    })
}

#[async_trait]
impl HydrationStore for SqliteStore {
    async fn ensure_user(&self, user_id: UserId) -> Result<UserConfig> {
        match self.get_config(user_id).await {
            Ok(cfg) => Ok(cfg),
            // Only a genuinely missing user gets defaults. Any other read
            // failure (an unreadable row, a zone that stopped resolving)
            // must not overwrite the user's stored settings.
            Err(err) if matches!(
                err.downcast_ref::<StoreError>(),
                Some(StoreError::UserNotFound(_))
            ) =>
            {
                let cfg = UserConfig::with_defaults(user_id);
                self.save_config(&cfg).await?;
                info!("Initialized user {user_id} with default config");
                Ok(cfg)
            }
            Err(err) => Err(err),
        }
    }

    async fn get_config(&self, user_id: UserId) -> Result<UserConfig> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT * FROM users WHERE user_id = ?")?;
        stmt.bind((1, user_id as i64))?;
        if stmt.next()? == sqlite::State::Row {
            row_to_config(&stmt)
        } else {
            Err(StoreError::UserNotFound(user_id).into())
        }
    }

    async fn save_config(&self, cfg: &UserConfig) -> Result<()> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO users
                 (user_id, goal_ml, cup_ml, interval_min, start_hm, end_hm, tz)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )?;
        stmt.bind((1, cfg.user_id as i64))?;
        stmt.bind((2, i64::from(cfg.goal_ml)))?;
        stmt.bind((3, i64::from(cfg.cup_ml)))?;
        stmt.bind((4, i64::from(cfg.interval_min)))?;
        stmt.bind((5, cfg.start_hm.format("%H:%M").to_string().as_str()))?;
        stmt.bind((6, cfg.end_hm.format("%H:%M").to_string().as_str()))?;
        stmt.bind((7, cfg.tz.name()))?;
        stmt.next()?;
        Ok(())
    }

    async fn add_intake(&self, user_id: UserId, amount_ml: u32) -> Result<()> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("INSERT INTO intake_log (user_id, amount_ml, ts_utc) VALUES (?, ?, ?)")?;
        stmt.bind((1, user_id as i64))?;
        stmt.bind((2, i64::from(amount_ml)))?;
        stmt.bind((3, fmt_ts(Utc::now()).as_str()))?;
        stmt.next()?;
        debug!("Logged {amount_ml} ml for user {user_id}");
        Ok(())
    }

    async fn sum_intake_today(&self, user_id: UserId, cfg: &UserConfig) -> Result<u32> {
        let (start_local, end_local) = clock::today_bounds_local(cfg.tz);
        let start = fmt_ts(start_local.with_timezone(&Utc));
        let end = fmt_ts(end_local.with_timezone(&Utc));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT COALESCE(SUM(amount_ml), 0) AS total FROM intake_log
             WHERE user_id = ? AND ts_utc >= ? AND ts_utc < ?",
        )?;
        stmt.bind((1, user_id as i64))?;
        stmt.bind((2, start.as_str()))?;
        stmt.bind((3, end.as_str()))?;
        stmt.next()?;
        Ok(stmt.read::<i64, _>("total")? as u32)
    }

    async fn reset_today(&self, user_id: UserId, cfg: &UserConfig) -> Result<u64> {
        let (start_local, end_local) = clock::today_bounds_local(cfg.tz);
        let start = fmt_ts(start_local.with_timezone(&Utc));
        let end = fmt_ts(end_local.with_timezone(&Utc));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "DELETE FROM intake_log WHERE user_id = ? AND ts_utc >= ? AND ts_utc < ?",
        )?;
        stmt.bind((1, user_id as i64))?;
        stmt.bind((2, start.as_str()))?;
        stmt.bind((3, end.as_str()))?;
        stmt.next()?;
        let removed = conn.change_count() as u64;
        info!("Reset today's intake for user {user_id} ({removed} entries)");
        Ok(removed)
    }

    async fn daily_totals(
        &self,
        user_id: UserId,
        cfg: &UserConfig,
        days: u32,
    ) -> Result<Vec<(NaiveDate, u32)>> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let today = clock::local_now(cfg.tz).date_naive();
        let first_day = today - Duration::days(i64::from(days) - 1);
        let start = fmt_ts(local_day_start(cfg.tz, first_day).with_timezone(&Utc));

        let mut by_day: std::collections::HashMap<NaiveDate, u32> = std::collections::HashMap::new();
        {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(
                "SELECT ts_utc, amount_ml FROM intake_log
                 WHERE user_id = ? AND ts_utc >= ? ORDER BY ts_utc ASC",
            )?;
            stmt.bind((1, user_id as i64))?;
            stmt.bind((2, start.as_str()))?;
            while stmt.next()? == sqlite::State::Row {
                let ts = parse_ts(&stmt.read::<String, _>("ts_utc")?)?;
                let day = ts.with_timezone(&cfg.tz).date_naive();
                let amount = stmt.read::<i64, _>("amount_ml")? as u32;
                *by_day.entry(day).or_insert(0) += amount;
            }
        }

        let mut out = Vec::with_capacity(days as usize);
        for offset in 0..i64::from(days) {
            let day = first_day + Duration::days(offset);
            out.push((day, by_day.get(&day).copied().unwrap_or(0)));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DEFAULT_CUP_ML, DEFAULT_GOAL_ML};
    use chrono::NaiveTime;

    fn mem() -> SqliteStore {
        SqliteStore::open(":memory:").unwrap()
    }

    #[tokio::test]
    async fn test_ensure_user_creates_defaults() {
        let store = mem();
        let cfg = store.ensure_user(1).await.unwrap();
        assert_eq!(cfg.goal_ml, DEFAULT_GOAL_ML);
        assert_eq!(cfg.cup_ml, DEFAULT_CUP_ML);

        // Second call returns the stored row, not fresh defaults
        let mut cfg = cfg;
        cfg.set_goal(1234).unwrap();
        store.save_config(&cfg).await.unwrap();
        let again = store.ensure_user(1).await.unwrap();
        assert_eq!(again.goal_ml, 1234);
    }

    #[tokio::test]
    async fn test_ensure_user_keeps_unreadable_rows() {
        let store = mem();
        let mut cfg = store.ensure_user(6).await.unwrap();
        cfg.set_goal(3333).unwrap();
        store.save_config(&cfg).await.unwrap();

        // A zone name that no longer resolves makes the row unreadable,
        // which is not the same thing as the user being absent.
        store
            .conn()
            .unwrap()
            .execute("UPDATE users SET tz = 'Mars/Olympus' WHERE user_id = 6")
            .unwrap();

        assert!(store.ensure_user(6).await.is_err());

        // The stored settings survive untouched
        let conn = store.conn().unwrap();
        let mut stmt = conn
            .prepare("SELECT goal_ml, tz FROM users WHERE user_id = 6")
            .unwrap();
        assert_eq!(stmt.next().unwrap(), sqlite::State::Row);
        assert_eq!(stmt.read::<i64, _>("goal_ml").unwrap(), 3333);
        assert_eq!(stmt.read::<String, _>("tz").unwrap(), "Mars/Olympus");
    }

    #[tokio::test]
    async fn test_get_config_unknown_user() {
        let store = mem();
        let err = store.get_config(404).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::UserNotFound(404))
        );
    }

    #[tokio::test]
    async fn test_config_roundtrip() {
        let store = mem();
        let mut cfg = store.ensure_user(2).await.unwrap();
        cfg.set_goal(2200).unwrap();
        cfg.set_cup(330).unwrap();
        cfg.set_interval(45).unwrap();
        cfg.set_window(
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        );
        cfg.set_tz(chrono_tz::Asia::Almaty);
        store.save_config(&cfg).await.unwrap();

        let loaded = store.get_config(2).await.unwrap();
        assert_eq!(loaded, cfg);
    }

    #[tokio::test]
    async fn test_intake_sum_and_reset() {
        let store = mem();
        let cfg = store.ensure_user(3).await.unwrap();
        assert_eq!(store.sum_intake_today(3, &cfg).await.unwrap(), 0);

        store.add_intake(3, 250).await.unwrap();
        store.add_intake(3, 300).await.unwrap();
        assert_eq!(store.sum_intake_today(3, &cfg).await.unwrap(), 550);

        // Other users are untouched
        let other = store.ensure_user(4).await.unwrap();
        assert_eq!(store.sum_intake_today(4, &other).await.unwrap(), 0);

        let removed = store.reset_today(3, &cfg).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.sum_intake_today(3, &cfg).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_daily_totals_shape() {
        let store = mem();
        let cfg = store.ensure_user(5).await.unwrap();
        store.add_intake(5, 400).await.unwrap();

        let totals = store.daily_totals(5, &cfg, 7).await.unwrap();
        assert_eq!(totals.len(), 7);
        // Oldest first, today last, today's bucket holds the entry
        let today = clock::local_now(cfg.tz).date_naive();
        assert_eq!(totals[6].0, today);
        assert_eq!(totals[6].1, 400);
        assert!(totals[..6].iter().all(|(_, total)| *total == 0));

        assert!(store.daily_totals(5, &cfg, 0).await.unwrap().is_empty());
    }
}
