//! Command dispatch against the store and the reminder scheduler.
//!
//! Every handler validates its own arguments and answers with a usage hint
//! on bad input; only store failures bubble up as errors.

use std::sync::Arc;

use anyhow::Result;
use log::info;

use super::parser::parse_command;
use crate::core::config::validate_amount;
use crate::core::UserId;
use crate::database::HydrationStore;
use crate::features::hydration::{clock, parse_hm, resolve_tz};
use crate::features::reminders::ReminderScheduler;

/// Routes incoming chat text to the right handler.
pub struct CommandRouter {
    store: Arc<dyn HydrationStore>,
    scheduler: Arc<ReminderScheduler>,
}

impl CommandRouter {
    pub fn new(store: Arc<dyn HydrationStore>, scheduler: Arc<ReminderScheduler>) -> Self {
        Self { store, scheduler }
    }

    /// Handle one incoming message. `Ok(None)` means no reply is owed
    /// (plain chatter that is not a command or a bare number).
    pub async fn dispatch(&self, user_id: UserId, text: &str) -> Result<Option<String>> {
        let text = text.trim();
        if let Some((name, args)) = parse_command(text) {
            let reply = match name {
                "start" => self.start(user_id).await?,
                "setgoal" => self.set_goal(user_id, &args).await?,
                "setcup" => self.set_cup(user_id, &args).await?,
                "drink" => self.drink(user_id, args.first().copied()).await?,
                "status" => self.status(user_id).await?,
                "stats" => self.stats(user_id).await?,
                "settz" => self.set_tz(user_id, &args).await?,
                "setreminder" => self.set_reminder(user_id, &args).await?,
                "remind_off" => self.remind_off(user_id).await?,
                "reset_today" => self.reset_today(user_id).await?,
                _ => "Unknown command. Send /start for the list.".to_string(),
            };
            return Ok(Some(reply));
        }
        // A bare number logs a drink, so "250" works as /drink 250
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Some(self.drink(user_id, Some(text)).await?));
        }
        Ok(None)
    }

    async fn start(&self, user_id: UserId) -> Result<String> {
        let cfg = self.store.ensure_user(user_id).await?;
        Ok(format!(
            "Hi! I'll help you build a water-drinking habit.\n\n\
             Current goal: {} ml/day. Default cup: {} ml.\n\
             Reminder window: {}-{} every {} min. Timezone: {}.\n\n\
             Commands:\n\
             /setgoal 2200 - daily goal in ml\n\
             /setcup 250 - cup size\n\
             /drink [ml] - log water (defaults to your cup)\n\
             /status - today's progress\n\
             /stats - last 7 days\n\
             /setreminder 60 09:00-21:00 - enable reminders\n\
             /remind_off - disable reminders\n\
             /settz Europe/Dublin - set timezone\n\
             /reset_today - delete today's entries",
            cfg.goal_ml,
            cfg.cup_ml,
            cfg.start_hm.format("%H:%M"),
            cfg.end_hm.format("%H:%M"),
            cfg.interval_min,
            cfg.tz.name(),
        ))
    }

    async fn set_goal(&self, user_id: UserId, args: &[&str]) -> Result<String> {
        let mut cfg = self.store.ensure_user(user_id).await?;
        let Some(goal) = args.first().and_then(|raw| raw.parse::<u32>().ok()) else {
            return Ok("Usage: /setgoal <ml>, e.g. /setgoal 2000".to_string());
        };
        if let Err(err) = cfg.set_goal(goal) {
            return Ok(format!("{err}. Example: /setgoal 2000"));
        }
        self.store.save_config(&cfg).await?;
        Ok(format!("Goal updated: {goal} ml/day"))
    }

    async fn set_cup(&self, user_id: UserId, args: &[&str]) -> Result<String> {
        let mut cfg = self.store.ensure_user(user_id).await?;
        let Some(cup) = args.first().and_then(|raw| raw.parse::<u32>().ok()) else {
            return Ok("Usage: /setcup <ml>, e.g. /setcup 250".to_string());
        };
        if let Err(err) = cfg.set_cup(cup) {
            return Ok(format!("{err}. Example: /setcup 250"));
        }
        self.store.save_config(&cfg).await?;
        Ok(format!("Default cup: {cup} ml"))
    }

    async fn drink(&self, user_id: UserId, raw: Option<&str>) -> Result<String> {
        let cfg = self.store.ensure_user(user_id).await?;
        let amount = match raw {
            Some(raw) => match raw.parse::<u32>().ok().map(validate_amount) {
                Some(Ok(amount)) => amount,
                _ => return Ok("Invalid amount. Example: /drink 250".to_string()),
            },
            None => cfg.cup_ml,
        };
        self.store.add_intake(user_id, amount).await?;
        let total = self.store.sum_intake_today(user_id, &cfg).await?;
        let left = cfg.goal_ml.saturating_sub(total);
        Ok(format!(
            "Logged {amount} ml. Today: {total} ml. {left} ml to go."
        ))
    }

    async fn status(&self, user_id: UserId) -> Result<String> {
        let cfg = self.store.ensure_user(user_id).await?;
        let total = self.store.sum_intake_today(user_id, &cfg).await?;
        let left = cfg.goal_ml.saturating_sub(total);
        let now = clock::local_now(cfg.tz);
        Ok(format!(
            "It is {} ({}). Today: {total} ml of {} ml. {left} ml to go.",
            now.format("%H:%M, %d.%m"),
            cfg.tz.name(),
            cfg.goal_ml,
        ))
    }

    async fn stats(&self, user_id: UserId) -> Result<String> {
        let cfg = self.store.ensure_user(user_id).await?;
        let totals = self.store.daily_totals(user_id, &cfg, 7).await?;
        let mut out = String::from("Last 7 days:");
        for (day, total) in totals {
            out.push_str(&format!("\n{day}: {total} ml"));
        }
        Ok(out)
    }

    async fn set_tz(&self, user_id: UserId, args: &[&str]) -> Result<String> {
        let mut cfg = self.store.ensure_user(user_id).await?;
        let Some(raw) = args.first() else {
            return Ok(format!(
                "Current timezone: {}. Example: /settz Europe/Dublin",
                cfg.tz.name()
            ));
        };
        let tz = match resolve_tz(raw) {
            Ok(tz) => tz,
            Err(err) => {
                return Ok(format!(
                    "{err}. Examples: Europe/Dublin, Europe/Moscow, Asia/Almaty"
                ))
            }
        };
        cfg.set_tz(tz);
        self.store.save_config(&cfg).await?;
        Ok(format!("Timezone updated: {}", tz.name()))
    }

    async fn set_reminder(&self, user_id: UserId, args: &[&str]) -> Result<String> {
        const USAGE: &str =
            "Usage: /setreminder <interval_min> <HH:MM-HH:MM>\nExample: /setreminder 60 09:00-21:00";
        let mut cfg = self.store.ensure_user(user_id).await?;
        let (Some(raw_interval), Some(raw_window)) = (args.first(), args.get(1)) else {
            return Ok(USAGE.to_string());
        };
        let Some(interval) = raw_interval.parse::<u32>().ok() else {
            return Ok(USAGE.to_string());
        };
        if let Err(err) = cfg.set_interval(interval) {
            return Ok(format!("{err}.\n{USAGE}"));
        }
        let Some((raw_start, raw_end)) = raw_window.split_once('-') else {
            return Ok(USAGE.to_string());
        };
        let window = match (parse_hm(raw_start), parse_hm(raw_end)) {
            (Ok(start), Ok(end)) => (start, end),
            _ => return Ok(USAGE.to_string()),
        };
        cfg.set_window(window.0, window.1);
        self.store.save_config(&cfg).await?;

        self.scheduler.enable(user_id).await?;
        info!("User {user_id} enabled reminders");
        Ok(format!(
            "Reminders on: every {interval} min between {} and {} ({}).",
            window.0.format("%H:%M"),
            window.1.format("%H:%M"),
            cfg.tz.name(),
        ))
    }

    async fn remind_off(&self, user_id: UserId) -> Result<String> {
        self.scheduler.disable(user_id);
        Ok("Reminders off.".to_string())
    }

    async fn reset_today(&self, user_id: UserId) -> Result<String> {
        let cfg = self.store.ensure_user(user_id).await?;
        let removed = self.store.reset_today(user_id, &cfg).await?;
        Ok(format!("Deleted today's entries ({removed})."))
    }
}
