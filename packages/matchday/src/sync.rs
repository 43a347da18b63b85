//! The sync pass: messages in, reconciled events out.
//!
//! One pass filters and orders the input messages, runs both extractors per
//! message, cross-checks the model against the pattern output, reconciles
//! every candidate into the store, and saves once at the end. Failures of
//! the model or OCR collaborators degrade that message to pattern-only
//! extraction; they never abort the pass.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::extract::{cross_check, Extractor, ModelExtractor, PatternExtractor};
use crate::merge::MergeOutcome;
use crate::store::EventStore;
use crate::traits::{ModelClient, OcrClient};
use crate::types::{config::SyncOptions, message::RawMessage};

/// Optional collaborators for a pass.
///
/// With no model the pass is pattern-only; with no OCR client image
/// attachments contribute nothing.
#[derive(Default)]
pub struct SyncContext<'a> {
    pub model: Option<&'a dyn ModelClient>,
    pub ocr: Option<&'a dyn OcrClient>,
}

/// Counts from one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Messages that passed the cutoff filter
    pub scanned: usize,
    pub inserted: usize,
    pub updated: usize,
    pub corroborated: usize,
    pub unchanged: usize,
    /// Messages where a collaborator failed and extraction degraded
    pub degraded: usize,
}

impl SyncReport {
    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted => self.inserted += 1,
            MergeOutcome::Updated => self.updated += 1,
            MergeOutcome::Corroborated => self.corroborated += 1,
            MergeOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Run one sync pass over `messages`.
///
/// Reconciliation order is deterministic (message timestamp, then id), so
/// the same input always produces the same store. The store is saved once
/// at the end unless `dry_run` is set.
pub async fn run_pass(
    store: &mut EventStore,
    messages: &[RawMessage],
    context: &SyncContext<'_>,
    options: &SyncOptions,
) -> StoreResult<SyncReport> {
    if options.full_resync {
        info!("full resync, clearing store");
        store.clear();
    }

    let mut selected: Vec<&RawMessage> = messages
        .iter()
        .filter(|message| match options.since {
            Some(cutoff) => message.timestamp > cutoff,
            None => true,
        })
        .collect();
    selected.sort_by(|a, b| (a.timestamp, &a.id).cmp(&(b.timestamp, &b.id)));

    let mut report = SyncReport {
        scanned: selected.len(),
        ..Default::default()
    };

    let pattern = PatternExtractor::new();
    let now = Utc::now();

    for message in selected {
        let (enriched, ocr_degraded) = enrich_with_ocr(message, context.ocr).await;
        if ocr_degraded {
            report.degraded += 1;
        }

        let pattern_candidates = pattern.extract_message(&enriched, options.reference);

        let candidates = match context.model {
            Some(client) => {
                let extractor = ModelExtractor::new(client);
                match extractor.extract(&enriched, options.reference).await {
                    Ok(model_candidates) => cross_check(model_candidates, pattern_candidates),
                    Err(err) => {
                        warn!(
                            message_id = %message.id,
                            error = %err,
                            "model extraction failed, falling back to patterns"
                        );
                        report.degraded += 1;
                        pattern_candidates
                    }
                }
            }
            None => pattern_candidates,
        };

        debug!(
            message_id = %message.id,
            candidates = candidates.len(),
            "message extracted"
        );

        for candidate in candidates {
            let outcome = store.reconcile(candidate, now, options.fuzzy_threshold);
            report.record(outcome);
        }
    }

    if options.dry_run {
        info!(?report, "dry run, skipping save");
    } else {
        store.save()?;
    }

    Ok(report)
}

/// Append usable OCR text from a message's image attachments.
///
/// Returns the possibly-extended message and whether any attachment was
/// dropped because OCR failed.
async fn enrich_with_ocr(
    message: &RawMessage,
    ocr: Option<&dyn OcrClient>,
) -> (RawMessage, bool) {
    let mut enriched = message.clone();
    let mut degraded = false;

    let Some(client) = ocr else {
        return (enriched, false);
    };

    for image_ref in &message.image_refs {
        match client.recognize(image_ref).await {
            Ok(ocr_text) if ocr_text.is_usable() => {
                enriched.text.push_str("\n\n");
                enriched.text.push_str(&ocr_text.text);
            }
            Ok(ocr_text) => {
                debug!(
                    image_ref = %image_ref,
                    confidence = ocr_text.confidence,
                    "OCR text below confidence threshold, dropped"
                );
            }
            Err(err) => {
                warn!(image_ref = %image_ref, error = %err, "OCR failed");
                degraded = true;
            }
        }
    }

    (enriched, degraded)
}
