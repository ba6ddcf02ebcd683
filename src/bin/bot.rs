//! Console front-end for the hydration bot.
//!
//! Reads chat commands from stdin, one line per message, and prints the
//! replies. A real chat-platform client replaces this loop with its own
//! transport and hands the same [`CommandRouter`] the incoming text.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dotenvy::dotenv;
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use hydrobot::commands::CommandRouter;
use hydrobot::core::UserId;
use hydrobot::database::{HydrationStore, SqliteStore};
use hydrobot::features::reminders::{Notifier, ReminderScheduler};

/// Prints reminders to stdout in place of a chat delivery channel.
struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_message(&self, user_id: UserId, text: &str) -> Result<()> {
        println!("[reminder -> {user_id}] {text}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let db_path = std::env::var("HYDROBOT_DB").unwrap_or_else(|_| "hydrobot.sqlite3".to_string());
    let user_id: UserId = std::env::var("HYDROBOT_USER")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1);

    let store: Arc<dyn HydrationStore> = Arc::new(SqliteStore::open(&db_path)?);
    info!("Store opened at {db_path}");

    let scheduler = Arc::new(ReminderScheduler::new(
        Arc::clone(&store),
        Arc::new(ConsoleNotifier),
    ));
    let router = CommandRouter::new(store, Arc::clone(&scheduler));

    // Reminder jobs are not persisted; users re-arm with /setreminder after
    // a restart.
    println!("hydrobot console (user {user_id}). Send /start for help, Ctrl-D to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match router.dispatch(user_id, &line).await {
            Ok(Some(reply)) => println!("{reply}"),
            Ok(None) => {}
            Err(err) => error!("Command failed: {err:#}"),
        }
    }

    scheduler.shutdown();
    info!("Shutting down");
    Ok(())
}
