//! Command implementations

pub mod analyze;
pub mod list;
pub mod notify;
pub mod status;
pub mod sync;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use matchday::{Event, RawMessage};

/// Read and parse a chat-export file.
pub fn load_export(path: &Path) -> Result<Vec<RawMessage>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read export file {}", path.display()))?;
    let messages = matchday::parser::parse_export_text(&content);
    anyhow::ensure!(
        !messages.is_empty(),
        "no messages recognized in {}",
        path.display()
    );
    Ok(messages)
}

/// One-line colored rendering of an event.
pub fn format_event(event: &Event) -> String {
    let date = event
        .date
        .map(|d| d.format("%a %d.%m.%Y").to_string())
        .unwrap_or_else(|| "???".to_string());
    let time = event
        .time_start
        .map(|t| format!(" {}", t.format("%H:%M")))
        .unwrap_or_default();

    let mut extras: Vec<String> = Vec::new();
    if let Some(group) = event.age_group {
        extras.push(group.to_string());
    }
    if let Some(level) = event.skill_level {
        extras.push(format!("Stärke {level}"));
    }
    if let Some(fee) = event.entry_fee {
        extras.push(format!("{fee:.0} €"));
    }
    let extras = if extras.is_empty() {
        String::new()
    } else {
        format!(" [{}]", extras.join(", "))
    };

    let full = if event.status == matchday::EventStatus::Full {
        " AUSGEBUCHT".red().bold().to_string()
    } else {
        String::new()
    };

    format!(
        "{}{}  {} {}{}  @ {}{}",
        date.cyan(),
        time,
        event.event_type.to_string().yellow(),
        event.title.bold(),
        extras,
        event.location.as_deref().unwrap_or("?"),
        full,
    )
}
