//! Model-backed extraction.
//!
//! Wraps a [`ModelClient`] behind the [`Extractor`] contract. Model output is
//! untrusted text: it is reduced to a JSON island, parsed into a tolerant
//! response shape, and every field is coerced through the same normalizers
//! the pattern extractor uses. Anything that fails coercion degrades to an
//! unresolved field rather than failing the message.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::normalize::{normalize_location, parse_date};
use crate::types::{
    candidate::Candidate,
    event::{AgeGroup, Confidence, EventStatus, EventType, SkillLevel, SourceRef},
    message::RawMessage,
};

use super::pattern::derive_title;
use super::prompts::format_extraction_prompt;
use super::Extractor;

/// Response envelope the prompt asks the model for.
#[derive(Debug, Default, Deserialize)]
pub struct ModelResponse {
    #[serde(default)]
    pub events: Vec<ModelEvent>,
}

/// One raw event as emitted by the model, everything optional and stringly.
///
/// Numeric fields arrive as `Value` because models alternate between
/// `"skill_level": 5` and `"skill_level": "5"` in otherwise valid output.
#[derive(Debug, Default, Deserialize)]
pub struct ModelEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub skill_level: Option<serde_json::Value>,
    #[serde(default)]
    pub entry_fee: Option<serde_json::Value>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Extractor backed by an AI model collaborator.
pub struct ModelExtractor<'a> {
    client: &'a dyn crate::traits::ModelClient,
}

impl<'a> ModelExtractor<'a> {
    pub fn new(client: &'a dyn crate::traits::ModelClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Extractor for ModelExtractor<'_> {
    async fn extract(
        &self,
        message: &RawMessage,
        reference: NaiveDate,
    ) -> ExtractResult<Vec<Candidate>> {
        let prompt = format_extraction_prompt(reference, &message.text);
        let raw = self.client.complete(&prompt).await?;
        let response = parse_model_response(&raw)?;

        debug!(
            message_id = %message.id,
            count = response.events.len(),
            "model returned events"
        );

        Ok(response
            .events
            .into_iter()
            .map(|event| coerce_candidate(event, message, reference))
            .collect())
    }
}

/// Reduce raw model output to its JSON island and parse it.
///
/// Models wrap JSON in code fences or prose despite instructions; everything
/// before the first `{` and after the last `}` is dropped before parsing.
pub fn parse_model_response(raw: &str) -> ExtractResult<ModelResponse> {
    let stripped = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let start = stripped.find('{');
    let end = stripped.rfind('}');
    let island = match (start, end) {
        (Some(start), Some(end)) if start < end => &stripped[start..=end],
        _ => {
            return Err(ExtractError::Unparseable(format!(
                "no JSON object in model output: {}",
                excerpt(raw, 120)
            )))
        }
    };

    serde_json::from_str(island)
        .map_err(|err| ExtractError::Unparseable(format!("model JSON invalid: {err}")))
}

/// Coerce one raw model event into a normalized candidate.
///
/// Field-level failures never reject the whole event; the field stays
/// unresolved and the confidence policy decides the rest.
fn coerce_candidate(raw: ModelEvent, message: &RawMessage, reference: NaiveDate) -> Candidate {
    let event_type = raw
        .event_type
        .as_deref()
        .map(coerce_event_type)
        .unwrap_or(EventType::Other);

    let mut candidate = Candidate::new(event_type);

    candidate.date = raw.date.as_deref().and_then(|text| {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_date(text, reference))
    });
    candidate.time_start = raw.time_start.as_deref().and_then(coerce_time);
    candidate.time_end = raw.time_end.as_deref().and_then(coerce_time);
    candidate.location = raw.location.as_deref().and_then(normalize_location);
    candidate.organizer = raw
        .organizer
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    candidate.age_group = raw
        .age_group
        .as_deref()
        .and_then(|text| text.parse::<AgeGroup>().ok());
    candidate.skill_level = raw.skill_level.as_ref().and_then(coerce_skill_level);
    candidate.entry_fee = raw.entry_fee.as_ref().and_then(coerce_fee);
    candidate.contact_name = raw
        .contact_name
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    candidate.contact_phone = raw
        .contact_phone
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    candidate.status = match raw.status.as_deref() {
        Some("full") | Some("ausgebucht") | Some("voll") => EventStatus::Full,
        _ => EventStatus::Open,
    };
    candidate.title = derive_title(candidate.organizer.as_deref(), event_type, &message.text);
    candidate.source = SourceRef {
        message_id: message.id.clone(),
        sender: message.sender.clone(),
        timestamp: Some(message.timestamp),
    };

    candidate.with_policy_confidence()
}

fn coerce_event_type(text: &str) -> EventType {
    match text.trim().to_lowercase().as_str() {
        "tournament" | "turnier" => EventType::Tournament,
        "friendly_match" | "friendly" | "testspiel" => EventType::FriendlyMatch,
        "training" => EventType::Training,
        _ => EventType::Other,
    }
}

fn coerce_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text.trim(), "%H:%M:%S"))
        .ok()
}

fn coerce_skill_level(value: &serde_json::Value) -> Option<SkillLevel> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u8::try_from(number).ok().and_then(|n| SkillLevel::try_from(n).ok())
}

fn coerce_fee(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s
            .trim()
            .trim_end_matches('€')
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .ok(),
        _ => None,
    }
}

/// Cross-check model candidates against pattern candidates for the same
/// message.
///
/// A model candidate corroborated by a pattern candidate on the same date
/// keeps `High` confidence and absorbs any field the model left unresolved;
/// an uncorroborated one is demoted to `Low`. Pattern candidates whose date
/// the model missed entirely are appended, so the deterministic path never
/// loses events to a model blind spot.
pub fn cross_check(model: Vec<Candidate>, pattern: Vec<Candidate>) -> Vec<Candidate> {
    if model.is_empty() {
        return pattern;
    }

    let mut checked: Vec<Candidate> = Vec::with_capacity(model.len());
    for mut candidate in model {
        let witness = candidate
            .date
            .and_then(|date| pattern.iter().find(|p| p.date == Some(date)));

        match witness {
            Some(witness) => {
                fill_missing(&mut candidate, witness);
                candidate = candidate.with_policy_confidence();
            }
            None => {
                if candidate.date.is_some() {
                    warn!(
                        title = %candidate.title,
                        date = ?candidate.date,
                        "model candidate has no pattern witness, demoting"
                    );
                }
                candidate.confidence = Confidence::Low;
            }
        }
        checked.push(candidate);
    }

    for extra in pattern {
        let covered = extra
            .date
            .is_some_and(|date| checked.iter().any(|c| c.date == Some(date)));
        if extra.date.is_some() && !covered {
            checked.push(extra);
        }
    }

    checked
}

fn fill_missing(candidate: &mut Candidate, witness: &Candidate) {
    if candidate.time_start.is_none() {
        candidate.time_start = witness.time_start;
    }
    if candidate.time_end.is_none() {
        candidate.time_end = witness.time_end;
    }
    if candidate.location.is_none() {
        candidate.location = witness.location.clone();
    }
    if candidate.organizer.is_none() {
        candidate.organizer = witness.organizer.clone();
    }
    if candidate.age_group.is_none() {
        candidate.age_group = witness.age_group.clone();
    }
    if candidate.skill_level.is_none() {
        candidate.skill_level = witness.skill_level;
    }
    if candidate.entry_fee.is_none() {
        candidate.entry_fee = witness.entry_fee;
    }
    if candidate.contact_name.is_none() {
        candidate.contact_name = witness.contact_name.clone();
    }
    if candidate.contact_phone.is_none() {
        candidate.contact_phone = witness.contact_phone.clone();
    }
    if candidate.description.is_none() {
        candidate.description = witness.description.clone();
    }
}

fn excerpt(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(max).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
    }

    fn message(text: &str) -> RawMessage {
        RawMessage::new(
            "msg-1".to_string(),
            reference().and_hms_opt(13, 0, 0).unwrap().and_utc(),
            "+49 173 2843016".to_string(),
            text.to_string(),
        )
    }

    #[test]
    fn test_parses_fenced_output() {
        let raw = "```json\n{\"events\": [{\"event_type\": \"tournament\", \"date\": \"2026-02-01\"}]}\n```";
        let response = parse_model_response(raw).unwrap();
        assert_eq!(response.events.len(), 1);
        assert_eq!(response.events[0].date.as_deref(), Some("2026-02-01"));
    }

    #[test]
    fn test_parses_prose_wrapped_output() {
        let raw = "Hier ist das Ergebnis:\n{\"events\": []}\nViel Erfolg!";
        let response = parse_model_response(raw).unwrap();
        assert!(response.events.is_empty());
    }

    #[test]
    fn test_rejects_non_json() {
        let err = parse_model_response("Ich kann keine Termine finden.").unwrap_err();
        assert!(matches!(err, ExtractError::Unparseable(_)));
    }

    #[test]
    fn test_coercion_tolerates_stringly_numbers() {
        let raw = ModelEvent {
            event_type: Some("tournament".to_string()),
            date: Some("2026-02-01".to_string()),
            time_start: Some("08:00".to_string()),
            location: Some("Turnhalle der Paul-Simmel-Grundschule".to_string()),
            skill_level: Some(serde_json::Value::String("2".to_string())),
            entry_fee: Some(serde_json::Value::String("30 €".to_string())),
            age_group: Some("D-Jugend".to_string()),
            status: Some("open".to_string()),
            ..Default::default()
        };

        let candidate = coerce_candidate(raw, &message("Turnier"), reference());
        assert_eq!(candidate.date, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(candidate.skill_level.map(u8::from), Some(2));
        assert_eq!(candidate.entry_fee, Some(30.0));
        assert_eq!(candidate.age_group, Some(AgeGroup::Youth('D')));
        assert_eq!(candidate.confidence, Confidence::High);
    }

    #[test]
    fn test_coercion_degrades_invalid_fields() {
        let raw = ModelEvent {
            event_type: Some("quidditch".to_string()),
            date: Some("irgendwann".to_string()),
            skill_level: Some(serde_json::Value::from(15)),
            ..Default::default()
        };

        let candidate = coerce_candidate(raw, &message("Turnier"), reference());
        assert_eq!(candidate.event_type, EventType::Other);
        assert_eq!(candidate.date, None);
        assert_eq!(candidate.skill_level, None);
        assert_eq!(candidate.confidence, Confidence::Low);
    }

    #[test]
    fn test_cross_check_corroborates_and_fills() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1);
        let mut ai = Candidate::new(EventType::Tournament);
        ai.date = date;
        ai.title = "Turnier S.D Croatia Berlin".to_string();
        ai.confidence = Confidence::High;

        let mut witness = Candidate::new(EventType::Tournament);
        witness.date = date;
        witness.location = Some("Turnhalle der Paul-Simmel-Grundschule".to_string());
        witness.entry_fee = Some(30.0);

        let checked = cross_check(vec![ai], vec![witness]);
        assert_eq!(checked.len(), 1);
        assert_eq!(checked[0].confidence, Confidence::High);
        assert_eq!(
            checked[0].location.as_deref(),
            Some("Turnhalle der Paul-Simmel-Grundschule")
        );
        assert_eq!(checked[0].entry_fee, Some(30.0));
    }

    #[test]
    fn test_cross_check_demotes_unwitnessed() {
        let mut ai = Candidate::new(EventType::Tournament);
        ai.date = NaiveDate::from_ymd_opt(2026, 3, 15);
        ai.location = Some("Sportplatz Nord".to_string());
        ai.title = "Turnier".to_string();
        ai.confidence = Confidence::High;

        let checked = cross_check(vec![ai], vec![]);
        assert_eq!(checked[0].confidence, Confidence::Low);
    }

    #[test]
    fn test_cross_check_keeps_pattern_only_dates() {
        let mut ai = Candidate::new(EventType::Tournament);
        ai.date = NaiveDate::from_ymd_opt(2026, 2, 1);

        let mut seen = Candidate::new(EventType::Tournament);
        seen.date = NaiveDate::from_ymd_opt(2026, 2, 1);
        let mut missed = Candidate::new(EventType::FriendlyMatch);
        missed.date = NaiveDate::from_ymd_opt(2026, 2, 8);

        let checked = cross_check(vec![ai], vec![seen, missed]);
        assert_eq!(checked.len(), 2);
        assert_eq!(checked[1].event_type, EventType::FriendlyMatch);
    }

    #[test]
    fn test_cross_check_empty_model_falls_back() {
        let mut pattern = Candidate::new(EventType::Tournament);
        pattern.date = NaiveDate::from_ymd_opt(2026, 2, 1);

        let checked = cross_check(vec![], vec![pattern]);
        assert_eq!(checked.len(), 1);
    }
}
