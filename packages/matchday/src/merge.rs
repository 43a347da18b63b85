//! Deduplication and reconciliation.
//!
//! Every candidate is reconciled against the store in three steps:
//!
//! 1. compute its stable identity hash
//! 2. find a matching stored event, by identity first and fuzzily second
//! 3. merge field by field under the confidence rule
//!
//! The merge is confidence-monotone: a resolved field is only replaced by a
//! value of equal or higher confidence, and an event's confidence never
//! drops. Re-running the same candidates is a no-op.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use strsim::normalized_levenshtein;
use tracing::{info, warn};

use crate::normalize::{canonical_key, title_prefix};
use crate::types::{
    candidate::Candidate,
    event::{Event, EventStatus},
};

/// Characters of the identity hash kept as the store key.
const IDENTITY_LEN: usize = 16;

/// Characters of the canonical title that feed the identity hash.
const TITLE_PREFIX_LEN: usize = 16;

/// What a reconciliation did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No matching event existed; a new one was inserted.
    Inserted,
    /// A matching event existed and at least one field changed.
    Updated,
    /// A matching event existed; no field changed but its confidence rose.
    Corroborated,
    /// A matching event existed and the candidate added nothing.
    Unchanged,
}

/// Compute the stable identity of a candidate.
///
/// The hash covers the normalized date, location, and title prefix, so two
/// extractions of the same announcement land on the same key regardless of
/// extractor, casing, or whitespace.
pub fn identity_for(candidate: &Candidate) -> String {
    let date_part = candidate
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let location_part = candidate
        .location
        .as_deref()
        .map(canonical_key)
        .unwrap_or_default();
    let title_part = title_prefix(&candidate.title, TITLE_PREFIX_LEN);

    let mut hasher = Sha256::new();
    hasher.update(date_part.as_bytes());
    hasher.update(b"|");
    hasher.update(location_part.as_bytes());
    hasher.update(b"|");
    hasher.update(title_part.as_bytes());

    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex.chars().take(IDENTITY_LEN).collect()
}

/// Find the stored event a candidate refers to, if any.
///
/// Exact identity match wins. Otherwise a fuzzy pass looks for an event on
/// the same date whose location or title is near-identical (normalized
/// Levenshtein at or above `fuzzy_threshold`, or one string containing the
/// other), which catches re-announcements with reworded venue names.
///
/// When exactly one side has a date the match is held to a stricter bar
/// (location match or identical canonical title). This is how a provisional
/// event gets completed by a later dated announcement, and how a date-less
/// follow-up ("ausgebucht!") reaches the event it talks about.
pub fn find_match(
    events: &IndexMap<String, Event>,
    candidate: &Candidate,
    fuzzy_threshold: f64,
) -> Option<String> {
    let identity = identity_for(candidate);
    if events.contains_key(&identity) {
        return Some(identity);
    }

    let mut matches: Vec<&Event> = Vec::new();
    for (_, event) in events {
        let same_date = match (candidate.date, event.date) {
            (Some(a), Some(b)) => {
                if a != b {
                    continue;
                }
                true
            }
            (None, None) => continue,
            _ => false,
        };

        let location_close = match (candidate.location.as_deref(), event.location.as_deref()) {
            (Some(a), Some(b)) => is_close(a, b, fuzzy_threshold, true),
            _ => false,
        };
        // No containment for titles: "Turnier" is a substring of half of them.
        let title_close = !candidate.title.is_empty()
            && !event.title.is_empty()
            && is_close(&candidate.title, &event.title, fuzzy_threshold, false);
        let title_equal = !candidate.title.is_empty()
            && canonical_key(&candidate.title) == canonical_key(&event.title);

        let matched = if same_date {
            location_close || title_close
        } else {
            location_close || title_equal
        };
        if matched {
            matches.push(event);
        }
    }

    // Ambiguous fuzzy match: merge into the most recently updated event
    // rather than inserting a duplicate, and leave a trace for review.
    if matches.len() > 1 {
        warn!(
            count = matches.len(),
            title = %candidate.title,
            "ambiguous fuzzy match, picking most recently updated"
        );
    }
    matches
        .into_iter()
        .max_by_key(|event| event.last_updated_at)
        .map(|event| {
            info!(
                identity = %event.identity,
                candidate = %candidate.title,
                "fuzzy match, merging as corroboration"
            );
            event.identity.clone()
        })
}

fn is_close(a: &str, b: &str, threshold: f64, allow_containment: bool) -> bool {
    let a = canonical_key(a);
    let b = canonical_key(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if allow_containment && (a.contains(&b) || b.contains(&a)) {
        return true;
    }
    normalized_levenshtein(&a, &b) >= threshold
}

/// Promote a candidate to a stored event.
pub fn event_from_candidate(candidate: Candidate, now: DateTime<Utc>) -> Event {
    Event {
        identity: identity_for(&candidate),
        event_type: candidate.event_type,
        date: candidate.date,
        time_start: candidate.time_start,
        time_end: candidate.time_end,
        location: candidate.location,
        title: candidate.title,
        description: candidate.description,
        skill_level: candidate.skill_level,
        age_group: candidate.age_group,
        organizer: candidate.organizer,
        contact_phone: candidate.contact_phone,
        contact_name: candidate.contact_name,
        status: candidate.status,
        entry_fee: candidate.entry_fee,
        source: candidate.source,
        confidence: candidate.confidence,
        first_seen_at: now,
        last_updated_at: now,
    }
}

/// Merge a candidate into an existing event, field by field.
///
/// A candidate value fills any unresolved field. A resolved field is only
/// overwritten when the candidate's confidence is at least as high as the
/// event's; an equal-confidence disagreement is a conflict, resolved toward
/// the newer source and logged.
pub fn merge_into(event: &mut Event, candidate: &Candidate, now: DateTime<Utc>) -> MergeOutcome {
    let newer = is_newer_source(event, candidate);
    let overwrite = candidate.confidence > event.confidence
        || (candidate.confidence == event.confidence && newer);
    let conflict_possible = candidate.confidence == event.confidence;

    let mut changed = false;
    let identity = event.identity.clone();
    let mut conflicted: Vec<&'static str> = Vec::new();

    macro_rules! merge_field {
        ($name:literal, $field:ident) => {
            match (&event.$field, &candidate.$field) {
                (None, Some(value)) => {
                    event.$field = Some(value.clone());
                    changed = true;
                }
                (Some(old), Some(new)) if old != new && overwrite => {
                    if conflict_possible {
                        conflicted.push($name);
                    }
                    event.$field = Some(new.clone());
                    changed = true;
                }
                _ => {}
            }
        };
    }

    merge_field!("date", date);
    merge_field!("time_start", time_start);
    merge_field!("time_end", time_end);
    merge_field!("location", location);
    merge_field!("description", description);
    merge_field!("skill_level", skill_level);
    merge_field!("age_group", age_group);
    merge_field!("organizer", organizer);
    merge_field!("contact_phone", contact_phone);
    merge_field!("contact_name", contact_name);
    merge_field!("entry_fee", entry_fee);

    if event.title.is_empty() && !candidate.title.is_empty() {
        event.title = candidate.title.clone();
        changed = true;
    }

    // Status only moves forward: an event that filled up stays full.
    if event.status == EventStatus::Open && candidate.status == EventStatus::Full {
        event.status = EventStatus::Full;
        changed = true;
    }

    if !conflicted.is_empty() {
        warn!(
            identity = %identity,
            fields = ?conflicted,
            "equal-confidence conflict, kept newer source"
        );
    }

    let corroborated = candidate.confidence > event.confidence;
    if corroborated {
        event.confidence = candidate.confidence;
    }
    if changed && newer {
        event.source = candidate.source.clone();
    }

    if changed {
        event.last_updated_at = now;
        MergeOutcome::Updated
    } else if corroborated {
        event.last_updated_at = now;
        MergeOutcome::Corroborated
    } else {
        MergeOutcome::Unchanged
    }
}

/// A candidate is the newer source when its message timestamp is at or after
/// the timestamp of the message the event currently cites.
fn is_newer_source(event: &Event, candidate: &Candidate) -> bool {
    match (candidate.source.timestamp, event.source.timestamp) {
        (Some(new), Some(old)) => new >= old,
        (Some(_), None) => true,
        _ => false,
    }
}
