//! `analyze`: inspect extraction output without touching the store.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use matchday::extract::{cross_check, Extractor, ModelExtractor, PatternExtractor};
use matchday::Candidate;

use crate::config::AppConfig;
use crate::model::CliModelClient;

pub async fn run(config: &AppConfig, export: &Path, no_model: bool) -> Result<()> {
    let messages = super::load_export(export)?;
    let reference = Local::now().date_naive();

    let client = match (&config.model_cmd, no_model) {
        (Some(command), false) => Some(CliModelClient::new(command.clone())),
        _ => None,
    };
    let pattern = PatternExtractor::new();

    let mut all: Vec<Candidate> = Vec::new();
    for message in &messages {
        let pattern_candidates = pattern.extract_message(message, reference);
        let candidates = match &client {
            Some(client) => {
                let extractor = ModelExtractor::new(client);
                match extractor.extract(message, reference).await {
                    Ok(model_candidates) => cross_check(model_candidates, pattern_candidates),
                    Err(err) => {
                        eprintln!(
                            "{} {} ({err})",
                            "model failed for".red(),
                            message.id.bold()
                        );
                        pattern_candidates
                    }
                }
            }
            None => pattern_candidates,
        };
        all.extend(candidates);
    }

    println!("{}", serde_json::to_string_pretty(&all).context("serializing candidates")?);
    eprintln!(
        "{} candidates from {} messages",
        all.len(),
        messages.len()
    );
    Ok(())
}
