//! Deterministic, rule-based candidate extraction.
//!
//! This is the fallback when the model collaborator is unavailable and the
//! verifier for what the model claims. Everything here is pure: same text in,
//! same candidates out.
//!
//! A message may describe several events (a schedule with one block per
//! match), so the text is segmented on structural cues first: blank-line
//! paragraphs are grouped into segments, and a paragraph carrying its own
//! date anchor starts a new segment once the current one already has a date.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;

use crate::error::ExtractResult;
use crate::normalize::{
    normalize_location, normalize_whitespace, parse_age_group, parse_date, parse_skill_level,
    parse_time_range,
};
use crate::types::{
    candidate::Candidate,
    event::{EventStatus, EventType, SourceRef},
    message::RawMessage,
};

use super::Extractor;

const TOURNAMENT_KEYWORDS: [&str; 7] = [
    "turnier",
    "heimturnier",
    "hallenturnier",
    "fußballturnier",
    "einlad",
    "teams gesucht",
    "mannschaften gesucht",
];

const MATCH_KEYWORDS: [&str; 7] = [
    "testspiel",
    "leistungsvergleich",
    "freundschaftsspiel",
    "gegner gesucht",
    "suchen gegner",
    "spielpartner gesucht",
    "sparring",
];

const TRAINING_KEYWORDS: [&str; 2] = ["probetraining", "gemeinsames training"];

const FULL_KEYWORDS: [&str; 4] = ["voll", "ausgebucht", "belegt", "keine plätze"];

// Date anchors used for segmentation only; actual parsing is in normalize.
static RE_DATE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d{1,2}\.\d{1,2}\.|\d{1,2}\.\s*(?:januar|februar|märz|april|mai|juni|juli|august|september|oktober|november|dezember)",
    )
    .unwrap()
});

static RE_LOCATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"📍\s*([^\n]+)").unwrap());

static RE_LOCATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:spielort|austragungsort|treffpunkt|ort)[:\s]+(?:ist\s+)?(?:die\s+|der\s+|das\s+)?([^.\n]{5,80})")
        .unwrap()
});

static RE_LOCATION_VENUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"((?i:sportplatz|sporthalle|turnhalle|sportanlage|stadion)\s+(?:(?i:der|des|am|an der|im|zur)\s+)?[A-ZÄÖÜ0-9][^,.\n]{1,60})",
    )
    .unwrap()
});

static RE_LOCATION_STREET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-ZÄÖÜ][a-zäöüß]+(?:straße|strasse|str\.|weg|platz|allee|damm)\s*\d+[^,\n]{0,30})")
        .unwrap()
});

static RE_LOCATION_POSTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{5}\s+[A-ZÄÖÜ][a-zäöüß]+)").unwrap());

static RE_ORGANIZER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((?:1\.\s*)?(?:FC|SC|SV|TSV|VfB|BSC|BSV|SG|TuS|SFC|PSV|S\.?D\.?)\s+[A-ZÄÖÜ][A-Za-zäöüß.\-]+(?:\s+[A-ZÄÖÜ][A-Za-zäöüß.\-]+){0,2})",
    )
    .unwrap()
});

static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\+?\d[\d\s\-/]{7,16}\d)").unwrap());

static RE_CONTACT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:sportliche\s+grüße|beste\s+grüße|viele\s+grüße|grüße|gruß|\bvg\b|\blg\b)[,:]?\s*\n?\s*([A-ZÄÖÜ][a-zäöüß]+)")
        .unwrap()
});

static RE_ENTRY_FEE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d{1,2})?)\s*(?:€|euro)").unwrap()
});

/// Deterministic rule-based extractor.
#[derive(Debug, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract candidates from one message.
    pub fn extract_message(&self, message: &RawMessage, reference: NaiveDate) -> Vec<Candidate> {
        let source = SourceRef {
            message_id: message.id.clone(),
            sender: message.sender.clone(),
            timestamp: Some(message.timestamp),
        };
        self.extract_text(&message.text, source, reference)
    }

    /// Extract candidates from raw text (message body, OCR output, or both).
    pub fn extract_text(
        &self,
        text: &str,
        source: SourceRef,
        reference: NaiveDate,
    ) -> Vec<Candidate> {
        segment(text)
            .into_iter()
            .filter_map(|segment| self.extract_segment(&segment, &source, reference))
            .collect()
    }

    fn extract_segment(
        &self,
        segment: &str,
        source: &SourceRef,
        reference: NaiveDate,
    ) -> Option<Candidate> {
        let event_type = detect_event_type(segment)?;
        let lower = segment.to_lowercase();

        let (time_start, time_end) = parse_time_range(segment);
        let location = extract_location(segment);
        let organizer = extract_organizer(segment);

        let mut candidate = Candidate::new(event_type);
        candidate.date = parse_date(segment, reference);
        candidate.time_start = time_start;
        candidate.time_end = time_end;
        candidate.location = location;
        candidate.skill_level = parse_skill_level(segment);
        candidate.age_group = parse_age_group(segment);
        candidate.contact_phone = extract_phone(segment).or_else(|| {
            // Sender numbers double as the contact when the text names none.
            source.sender.starts_with('+').then(|| source.sender.clone())
        });
        candidate.contact_name = extract_contact_name(segment);
        candidate.status = if FULL_KEYWORDS.iter().any(|k| lower.contains(k)) {
            EventStatus::Full
        } else {
            EventStatus::Open
        };
        candidate.entry_fee = extract_entry_fee(segment);
        candidate.title = derive_title(organizer.as_deref(), event_type, segment);
        candidate.organizer = organizer;
        candidate.description = Some(excerpt(segment, 300));
        candidate.source = source.clone();

        Some(candidate.with_policy_confidence())
    }
}

#[async_trait]
impl Extractor for PatternExtractor {
    async fn extract(
        &self,
        message: &RawMessage,
        reference: NaiveDate,
    ) -> ExtractResult<Vec<Candidate>> {
        Ok(self.extract_message(message, reference))
    }
}

/// Split text into per-event segments.
///
/// Paragraphs (blank-line separated) accumulate into the current segment; a
/// paragraph carrying its own date anchor opens a new segment once the
/// current one already has one. A message without structural cues stays one
/// segment.
fn segment(text: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_has_date = false;

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let has_date = RE_DATE_ANCHOR.is_match(paragraph);
        if has_date && current_has_date {
            segments.push(std::mem::take(&mut current));
            current_has_date = false;
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
        current_has_date |= has_date;
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn detect_event_type(text: &str) -> Option<EventType> {
    let lower = text.to_lowercase();
    if TOURNAMENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some(EventType::Tournament);
    }
    if MATCH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some(EventType::FriendlyMatch);
    }
    if TRAINING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Some(EventType::Training);
    }
    None
}

fn extract_location(text: &str) -> Option<String> {
    for re in [
        &*RE_LOCATION_MARKER,
        &*RE_LOCATION_LABEL,
        &*RE_LOCATION_VENUE,
        &*RE_LOCATION_STREET,
        &*RE_LOCATION_POSTAL,
    ] {
        if let Some(caps) = re.captures(text) {
            if let Some(location) = normalize_location(&caps[1]) {
                return Some(location);
            }
        }
    }
    None
}

fn extract_organizer(text: &str) -> Option<String> {
    let caps = RE_ORGANIZER.captures(text)?;
    let organizer = normalize_whitespace(&caps[1]);
    (organizer.len() > 3).then_some(organizer)
}

fn extract_phone(text: &str) -> Option<String> {
    let caps = RE_PHONE.captures(text)?;
    Some(normalize_whitespace(&caps[1]))
}

fn extract_contact_name(text: &str) -> Option<String> {
    let caps = RE_CONTACT_NAME.captures(text)?;
    Some(caps[1].to_string())
}

fn extract_entry_fee(text: &str) -> Option<f64> {
    let caps = RE_ENTRY_FEE.captures(text)?;
    caps[1].replace(',', ".").parse().ok()
}

/// Shared with the model adapter so both extractors derive the same title
/// for the same announcement, which keeps identities aligned.
pub(crate) fn derive_title(organizer: Option<&str>, event_type: EventType, segment: &str) -> String {
    if let Some(organizer) = organizer {
        return format!("{event_type} {organizer}");
    }
    let first_line = segment
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    excerpt(first_line, 60)
}

fn excerpt(text: &str, max_chars: usize) -> String {
    normalize_whitespace(text).chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::event::{AgeGroup, Confidence};
    use chrono::Utc;

    fn reference() -> NaiveDate {
        // A Friday.
        NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
    }

    fn message(text: &str) -> RawMessage {
        RawMessage::new("m-1", Utc::now(), "+49 173 2843016", text)
    }

    #[test]
    fn test_scenario_single_line_announcement() {
        let cands = PatternExtractor::new().extract_message(
            &message("Turnier am Samstag, 14 Uhr, Sportplatz Nord, Jahrgang 2014"),
            reference(),
        );
        assert_eq!(cands.len(), 1);
        let cand = &cands[0];

        assert_eq!(cand.event_type, EventType::Tournament);
        // Upcoming Saturday relative to Friday 2026-01-16.
        assert_eq!(cand.date, NaiveDate::from_ymd_opt(2026, 1, 17));
        assert_eq!(
            cand.time_start,
            chrono::NaiveTime::from_hms_opt(14, 0, 0)
        );
        assert_eq!(cand.location.as_deref(), Some("Sportplatz Nord"));
        assert_eq!(cand.age_group, Some(AgeGroup::BirthYear(2014)));
        assert_eq!(cand.confidence, Confidence::High);
    }

    #[test]
    fn test_full_announcement() {
        let text = "⚽️Guten Abend liebe Trainerkolleginnen und -kollegen,\n\n\
            die 2. D-Jugend von S.D Croatia Berlin lädt euch herzlich zum\n\
            1. Heimturnier in diesem Jahr ein.\n\n\
            📅 Samstag, 01.02.2026\n\
            🕘 Einlass ab 08:00 Uhr\n\n\
            📍 Turnhalle der Paul-Simmel-Grundschule\n\
            Felixstrasse 26, 12099 Berlin\n\n\
            Spielstärke: 2-3 ( 1-10 Skala )\n\
            Startgeld: 30 €\n\n\
            Sportliche Grüße\nTomislav, S.D Croatia Berlin⚽️";

        let cands = PatternExtractor::new().extract_message(&message(text), reference());
        assert_eq!(cands.len(), 1);
        let cand = &cands[0];

        assert_eq!(cand.event_type, EventType::Tournament);
        assert_eq!(cand.date, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(cand.time_start, chrono::NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(
            cand.location.as_deref(),
            Some("Turnhalle der Paul-Simmel-Grundschule")
        );
        assert_eq!(cand.age_group, Some(AgeGroup::Youth('D')));
        assert_eq!(cand.skill_level.unwrap().value(), 2);
        assert_eq!(cand.entry_fee, Some(30.0));
        assert_eq!(cand.organizer.as_deref(), Some("S.D Croatia Berlin"));
        assert_eq!(cand.contact_name.as_deref(), Some("Tomislav"));
        assert_eq!(cand.confidence, Confidence::High);
    }

    #[test]
    fn test_friendly_match_with_range() {
        let text = "Wir suchen für den 25.01. zwei Mannschaften für einen lockeren \
            Leistungsvergleich von 11-14 uhr, Niveau 5. Spielort ist die Sporthalle \
            am Neuendorfer Sand in Brandenburg an der Havel.";

        let cands = PatternExtractor::new().extract_message(&message(text), reference());
        assert_eq!(cands.len(), 1);
        let cand = &cands[0];

        assert_eq!(cand.event_type, EventType::FriendlyMatch);
        assert_eq!(cand.date, NaiveDate::from_ymd_opt(2026, 1, 25));
        assert_eq!(cand.time_start, chrono::NaiveTime::from_hms_opt(11, 0, 0));
        assert_eq!(cand.time_end, chrono::NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(cand.skill_level.unwrap().value(), 5);
        assert!(cand
            .location
            .as_deref()
            .unwrap()
            .starts_with("Sporthalle am Neuendorfer Sand"));
    }

    #[test]
    fn test_multiple_events_in_one_message() {
        let text = "Hallenturnier am 08.02. in der Sporthalle Mitte, ab 9 Uhr.\n\n\
            Hallenturnier am 15.02. in der Sporthalle Mitte, ab 9 Uhr.";

        let cands = PatternExtractor::new().extract_message(&message(text), reference());
        assert_eq!(cands.len(), 2);
        assert_eq!(cands[0].date, NaiveDate::from_ymd_opt(2026, 2, 8));
        assert_eq!(cands[1].date, NaiveDate::from_ymd_opt(2026, 2, 15));
    }

    #[test]
    fn test_no_event_keywords_yields_nothing() {
        let cands = PatternExtractor::new().extract_message(
            &message("Danke an alle fürs Kommen am Samstag!"),
            reference(),
        );
        assert!(cands.is_empty());
    }

    #[test]
    fn test_partial_match_is_low_confidence() {
        // Event keyword but no resolvable date.
        let cands = PatternExtractor::new()
            .extract_message(&message("Gegner gesucht für ein Testspiel, Termin folgt."), reference());
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].confidence, Confidence::Low);
        assert!(cands[0].date.is_none());
    }

    #[test]
    fn test_full_status_detected() {
        let cands = PatternExtractor::new().extract_message(
            &message("Unser Turnier am 01.03. ist leider schon ausgebucht"),
            reference(),
        );
        assert_eq!(cands[0].status, EventStatus::Full);
    }
}
