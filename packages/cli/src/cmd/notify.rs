//! `notify`: render the upcoming-events notification body.
//!
//! The console notifier stands in for a real delivery channel; anything
//! implementing [`Notifier`] can replace it without touching this command.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Local};
use matchday::{complete_events, EventStore, ExtractError, Notifier};

use crate::config::AppConfig;

struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, _recipient: &str, body: &str) -> Result<(), ExtractError> {
        println!("{body}");
        Ok(())
    }
}

pub async fn run(config: &AppConfig, days: u32) -> Result<()> {
    let store = EventStore::load(config.store_path()).context("failed to load event store")?;

    let today = Local::now().date_naive();
    let horizon = today + Duration::days(i64::from(days));
    let upcoming: Vec<_> = complete_events(&store, Some(today))
        .into_iter()
        .filter(|event| event.date.is_some_and(|date| date <= horizon))
        .collect();

    if upcoming.is_empty() {
        println!("No events in the next {days} days.");
        return Ok(());
    }

    let mut body = format!("⚽ Termine der nächsten {days} Tage:\n");
    for event in &upcoming {
        body.push('\n');
        body.push_str(&format_notification_line(event));
    }

    ConsoleNotifier.send("console", &body).await?;
    Ok(())
}

fn format_notification_line(event: &matchday::Event) -> String {
    let mut line = String::new();
    if let Some(date) = event.date {
        line.push_str(&date.format("%d.%m.").to_string());
    }
    if let Some(time) = event.time_start {
        line.push_str(&format!(" {}", time.format("%H:%M")));
    }
    line.push_str(&format!(" {} {}", event.event_type, event.title));
    if let Some(location) = &event.location {
        line.push_str(&format!(" @ {location}"));
    }
    if let Some(name) = &event.contact_name {
        line.push_str(&format!(" (Kontakt: {name})"));
    }
    line
}
