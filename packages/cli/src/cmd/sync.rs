//! `import` and `sync`: run the pipeline over a chat export.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use colored::Colorize;
use matchday::types::config::SyncOptions;
use matchday::{run_pass, EventStore, ModelClient, SyncContext, SyncState};

use crate::config::AppConfig;
use crate::model::CliModelClient;

pub async fn run(
    config: &AppConfig,
    export: &Path,
    incremental: bool,
    no_model: bool,
    dry_run: bool,
    full: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mut messages = super::load_export(export)?;
    println!("Parsed {} messages from {}", messages.len(), export.display());
    if let Some(limit) = limit {
        // Exports are chronological, so the tail is the newest slice.
        if messages.len() > limit {
            messages.drain(..messages.len() - limit);
            println!("Limited to the newest {limit} messages");
        }
    }

    let mut store =
        EventStore::load(config.store_path()).context("failed to load event store")?;

    let state_path = config.sync_state_path();
    let state = if incremental {
        SyncState::load(&state_path).context("failed to load sync state")?
    } else {
        SyncState::default()
    };

    let since = if incremental && !full {
        state.last_sync
    } else {
        None
    };

    let options = SyncOptions::new(Local::now().date_naive())
        .with_since(since)
        .full_resync(full)
        .dry_run(dry_run);

    let client = match (&config.model_cmd, no_model) {
        (Some(command), false) => Some(CliModelClient::new(command.clone())),
        _ => None,
    };
    if client.is_none() {
        println!("{}", "Model disabled, pattern extraction only".dimmed());
    }
    let context = SyncContext {
        model: client.as_ref().map(|c| c as &dyn ModelClient),
        ocr: None,
    };

    let report = run_pass(&mut store, &messages, &context, &options)
        .await
        .context("sync pass failed")?;

    println!(
        "{} scanned, {} new, {} updated, {} corroborated, {} unchanged, {} degraded",
        report.scanned,
        report.inserted.to_string().green().bold(),
        report.updated.to_string().yellow(),
        report.corroborated,
        report.unchanged,
        report.degraded.to_string().red(),
    );

    if dry_run {
        println!("{}", "Dry run, nothing saved".dimmed());
    } else if incremental {
        let state = SyncState {
            last_sync: Some(Utc::now()),
        };
        state
            .save(&state_path)
            .context("failed to save sync state")?;
    }

    Ok(())
}
