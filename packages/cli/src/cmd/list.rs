//! `list`: complete events, filtered and sorted.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use matchday::{filtered_events, EventStore, EventType, FilterCriteria, SkillLevel};

use crate::config::AppConfig;

pub struct ListArgs {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub event_type: Option<String>,
    pub min_level: Option<u8>,
    pub max_level: Option<u8>,
    pub open_only: bool,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub json: bool,
}

pub fn run(config: &AppConfig, args: ListArgs) -> Result<()> {
    let store = EventStore::load(config.store_path()).context("failed to load event store")?;

    let event_types = match args.event_type.as_deref() {
        None => Vec::new(),
        Some("tournament") => vec![EventType::Tournament],
        Some("friendly_match") => vec![EventType::FriendlyMatch],
        Some("training") => vec![EventType::Training],
        Some(other) => anyhow::bail!(
            "unknown event type {other:?}, expected tournament, friendly_match or training"
        ),
    };

    let criteria = FilterCriteria {
        date_from: Some(args.from.unwrap_or_else(|| Local::now().date_naive())),
        date_to: args.to,
        event_types,
        min_level: args.min_level.and_then(SkillLevel::new),
        max_level: args.max_level.and_then(SkillLevel::new),
        age_group: None,
        only_open: args.open_only,
        location_contains: args.location,
        organizer_contains: args.organizer,
    };

    let events = filtered_events(&store, &criteria);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No matching events.");
        return Ok(());
    }
    for event in &events {
        println!("{}", super::format_event(event));
    }
    println!("{} event(s)", events.len());

    Ok(())
}
