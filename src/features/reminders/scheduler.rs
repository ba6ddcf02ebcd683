//! # Reminder Scheduler
//!
//! Owns the per-user recurring reminder jobs. Every enabled user gets a
//! dedicated tokio task driven by a fixed-rate interval timer; each tick
//! loads the user's current config, applies the notification policy, and
//! sends through the [`Notifier`] when the policy says to.
//!
//! - **Version**: 1.0.1
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.1: Spawn replacement tasks under the registry entry lock
//! - 1.0.0: Initial release with atomic per-user job replacement

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::UserId;
use crate::database::HydrationStore;
use crate::features::hydration::clock;
use crate::features::hydration::policy::{self, Decision, SuppressReason};

/// Outbound message channel to the chat platform.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the user's chat. A failure here is logged and
    /// dropped by the scheduler; the recurring schedule is never affected.
    async fn send_message(&self, user_id: UserId, text: &str) -> Result<()>;
}

/// One active recurring job. Aborting the handle cancels the driving task.
struct ReminderJob {
    interval_min: u32,
    handle: JoinHandle<()>,
}

/// Schedules, replaces, and cancels per-user recurring reminders.
///
/// Invariant: at most one job per user. [`enable`](Self::enable) on an
/// already-enabled user aborts the old job and installs the new one under
/// the registry's per-key entry lock, so no two jobs for the same user are
/// ever pending at once. Jobs are in-memory only; after a restart users
/// have to be re-armed from outside.
pub struct ReminderScheduler {
    jobs: DashMap<UserId, ReminderJob>,
    store: Arc<dyn HydrationStore>,
    notifier: Arc<dyn Notifier>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn HydrationStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            jobs: DashMap::new(),
            store,
            notifier,
        }
    }

    /// Enable (or reconfigure) reminders for a user.
    ///
    /// The interval is snapshotted from the user's current config; window,
    /// goal, and timezone are re-read on every fire, so edits that keep the
    /// same interval take effect without a re-enable. The first fire happens
    /// immediately, later fires are spaced exactly `interval_min` apart from
    /// schedule time (fixed-rate; missed ticks are skipped, not bursted).
    pub async fn enable(&self, user_id: UserId) -> Result<()> {
        let cfg = self.store.get_config(user_id).await?;
        let interval_min = cfg.interval_min;
        // The replacement task is spawned inside the entry guard, after any
        // old handle has been aborted, so two jobs for the same user are
        // never live at once and concurrent enable/disable calls serialize
        // on the per-key lock.
        match self.jobs.entry(user_id) {
            Entry::Occupied(mut slot) => {
                slot.get().handle.abort();
                let handle = spawn_job(
                    user_id,
                    interval_min,
                    Arc::clone(&self.store),
                    Arc::clone(&self.notifier),
                );
                slot.insert(ReminderJob {
                    interval_min,
                    handle,
                });
                info!("Replaced reminder job for user {user_id} (every {interval_min} min)");
            }
            Entry::Vacant(slot) => {
                let handle = spawn_job(
                    user_id,
                    interval_min,
                    Arc::clone(&self.store),
                    Arc::clone(&self.notifier),
                );
                slot.insert(ReminderJob {
                    interval_min,
                    handle,
                });
                info!("Scheduled reminder job for user {user_id} (every {interval_min} min)");
            }
        }
        Ok(())
    }

    /// Disable reminders for a user. Idempotent: disabling a user without a
    /// job is a no-op. No fire that has not already started will run after
    /// this returns.
    pub fn disable(&self, user_id: UserId) {
        if let Some((_, job)) = self.jobs.remove(&user_id) {
            job.handle.abort();
            info!("Cancelled reminder job for user {user_id}");
        }
    }

    /// Whether the user currently has an active job.
    pub fn is_enabled(&self, user_id: UserId) -> bool {
        self.jobs.contains_key(&user_id)
    }

    /// Number of active jobs across all users.
    pub fn active_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// The interval a user's job was scheduled with, if enabled.
    pub fn scheduled_interval(&self, user_id: UserId) -> Option<u32> {
        self.jobs.get(&user_id).map(|job| job.interval_min)
    }

    /// Abort every job. Used at process teardown; jobs are not persisted.
    pub fn shutdown(&self) {
        let count = self.jobs.len();
        self.jobs.retain(|_, job| {
            job.handle.abort();
            false
        });
        if count > 0 {
            info!("Aborted {count} reminder job(s) on shutdown");
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn the driving task for one user's job.
///
/// Fires run inline in this task: one task per user keeps users isolated
/// from each other, and inline execution guarantees at most one in-flight
/// fire per user.
fn spawn_job(
    user_id: UserId,
    interval_min: u32,
    store: Arc<dyn HydrationStore>,
    notifier: Arc<dyn Notifier>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_secs(u64::from(interval_min) * 60);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match fire(user_id, store.as_ref(), notifier.as_ref()).await {
                Ok(FireOutcome::Sent { suggested_ml }) => {
                    debug!("Reminder sent to user {user_id} (suggested {suggested_ml} ml)");
                }
                Ok(FireOutcome::Suppressed(reason)) => {
                    debug!("Reminder for user {user_id} suppressed: {reason:?}");
                }
                // Swallowed: a failed store read or delivery must not stop
                // the recurring schedule.
                Err(err) => warn!("Reminder fire for user {user_id} failed: {err:#}"),
            }
        }
    })
}

#[derive(Debug)]
enum FireOutcome {
    Sent { suggested_ml: u32 },
    Suppressed(SuppressReason),
}

/// One fire: fresh config, local now, today's intake, policy, delivery.
async fn fire(
    user_id: UserId,
    store: &dyn HydrationStore,
    notifier: &dyn Notifier,
) -> Result<FireOutcome> {
    let cfg = store.get_config(user_id).await?;
    let local = clock::local_now(cfg.tz);
    let intake = store.sum_intake_today(user_id, &cfg).await?;
    match policy::evaluate(&cfg, local.time(), intake) {
        Decision::Suppress(reason) => Ok(FireOutcome::Suppressed(reason)),
        Decision::Emit { suggested_ml } => {
            let left = cfg.goal_ml.saturating_sub(intake);
            let text = format!(
                "💧 Time for some water! {left} ml left of your {} ml goal.\nQuick log: /drink {suggested_ml}",
                cfg.goal_ml
            );
            notifier.send_message(user_id, &text).await?;
            Ok(FireOutcome::Sent { suggested_ml })
        }
    }
}
