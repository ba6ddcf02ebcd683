//! # Database Module
//!
//! SQLite-backed persistence for user configs and the intake log, plus the
//! [`HydrationStore`] trait the rest of the bot consumes. Intake rows are
//! timestamped in UTC; "today" queries are bounded by the user's local
//! calendar day, converted to UTC at query time.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod store;

pub use store::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::{UserConfig, UserId};

/// Persistence surface consumed by the scheduler and the command layer.
#[async_trait]
pub trait HydrationStore: Send + Sync {
    /// Fetch the user's config, default-initializing on first contact.
    async fn ensure_user(&self, user_id: UserId) -> Result<UserConfig>;

    /// Fetch the user's config. Fails with
    /// [`StoreError::UserNotFound`](crate::core::StoreError::UserNotFound)
    /// if the user was never initialized.
    async fn get_config(&self, user_id: UserId) -> Result<UserConfig>;

    /// Persist the config, creating the row if needed.
    async fn save_config(&self, cfg: &UserConfig) -> Result<()>;

    /// Log one drink, timestamped now in UTC.
    async fn add_intake(&self, user_id: UserId, amount_ml: u32) -> Result<()>;

    /// Total intake over the user's current local calendar day.
    async fn sum_intake_today(&self, user_id: UserId, cfg: &UserConfig) -> Result<u32>;

    /// Delete the user's intake rows for the current local day, returning
    /// how many were removed.
    async fn reset_today(&self, user_id: UserId, cfg: &UserConfig) -> Result<u64>;

    /// Per-local-day totals for the most recent `days` days, oldest first.
    /// Days without entries appear with a zero total.
    async fn daily_totals(
        &self,
        user_id: UserId,
        cfg: &UserConfig,
        days: u32,
    ) -> Result<Vec<(NaiveDate, u32)>>;
}
