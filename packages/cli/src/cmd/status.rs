//! `status`: store and sync-state overview.

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use matchday::{EventStore, SyncState};

use crate::config::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    let store = EventStore::load(config.store_path()).context("failed to load event store")?;
    let state =
        SyncState::load(&config.sync_state_path()).context("failed to load sync state")?;

    let complete = store.all().filter(|e| e.is_complete()).count();
    let today = Local::now().date_naive();
    let upcoming = store
        .all()
        .filter(|e| e.date.is_some_and(|d| d >= today))
        .count();

    println!("Store: {}", config.store_path().display());
    println!(
        "Events: {} total, {} complete, {} provisional, {} upcoming",
        store.len().to_string().bold(),
        complete,
        store.len() - complete,
        upcoming.to_string().green(),
    );
    match state.last_sync {
        Some(at) => println!("Last sync: {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Last sync: {}", "never".dimmed()),
    }
    match &config.model_cmd {
        Some(command) => println!("Model command: {command}"),
        None => println!("Model command: {}", "not configured".dimmed()),
    }

    Ok(())
}
