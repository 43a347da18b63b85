//! The canonical `Event` record.
//!
//! An `Event` is the unit of value of the whole pipeline: a reconciled,
//! deduplicated football announcement. Events are owned exclusively by the
//! [`EventStore`](crate::store::EventStore); everything upstream works on
//! [`Candidate`](super::candidate::Candidate) values instead.
//!
//! The serialized shape is forward-compatible: unknown fields are ignored on
//! read and missing optional fields default to unresolved.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of football event described by an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Tournament,
    FriendlyMatch,
    Training,
    Other,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventType::Tournament => "Turnier",
            EventType::FriendlyMatch => "Testspiel",
            EventType::Training => "Training",
            EventType::Other => "Event",
        };
        f.write_str(label)
    }
}

/// Whether an event still accepts participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Open,
    Full,
}

/// Coarse trust level attached to an extraction.
///
/// `High` means the candidate came from corroborated or unambiguous
/// extraction; `Low` means a partial pattern match or an uncorroborated
/// model claim. The merge rule only lets values move forward in confidence,
/// never backward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[default]
    Low,
    High,
}

/// Skill level on the 1-10 scale used by the source community.
///
/// Values outside 1..=10 are rejected at construction, so a stored level is
/// always meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SkillLevel(u8);

impl SkillLevel {
    /// Create a skill level, rejecting values outside the 1-10 scale.
    pub fn new(value: u8) -> Option<Self> {
        (1..=10).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SkillLevel::new(value).ok_or_else(|| format!("skill level out of range: {value}"))
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Age cohort of the teams an announcement addresses.
///
/// German youth football uses three interchangeable namings, all of which
/// appear in the wild: letter classes ("D-Jugend"), birth-year cohorts
/// ("JG2014" / "Jahrgang 2014"), and under-N brackets ("U12").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AgeGroup {
    /// Letter class A-G, e.g. "D-Jugend"
    Youth(char),
    /// Birth-year cohort, e.g. "JG2014"
    BirthYear(u16),
    /// Under-N bracket, e.g. "U12"
    Under(u8),
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeGroup::Youth(c) => write!(f, "{}-Jugend", c.to_ascii_uppercase()),
            AgeGroup::BirthYear(y) => write!(f, "JG{y}"),
            AgeGroup::Under(n) => write!(f, "U{n}"),
        }
    }
}

impl FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(rest) = trimmed
            .strip_prefix("JG")
            .or_else(|| trimmed.strip_prefix("jg"))
        {
            let year: u16 = rest
                .trim()
                .parse()
                .map_err(|_| format!("invalid birth year: {s}"))?;
            let year = if year < 100 { 2000 + year } else { year };
            return Ok(AgeGroup::BirthYear(year));
        }
        if let Some(rest) = trimmed
            .strip_prefix('U')
            .or_else(|| trimmed.strip_prefix('u'))
        {
            if let Ok(n) = rest.trim().parse::<u8>() {
                return Ok(AgeGroup::Under(n));
            }
        }
        let lower = trimmed.to_lowercase();
        if let Some(class) = lower.strip_suffix("-jugend").or_else(|| lower.strip_suffix("jugend"))
        {
            let c = class.trim_end_matches('-').chars().next_back();
            if let Some(c) = c.filter(|c| ('a'..='g').contains(c)) {
                return Ok(AgeGroup::Youth(c.to_ascii_uppercase()));
            }
        }
        // Bare four-digit year is treated as a birth-year cohort.
        if let Ok(year) = trimmed.parse::<u16>() {
            if (1990..=2100).contains(&year) {
                return Ok(AgeGroup::BirthYear(year));
            }
        }
        Err(format!("unrecognized age group: {s}"))
    }
}

impl From<AgeGroup> for String {
    fn from(group: AgeGroup) -> String {
        group.to_string()
    }
}

impl TryFrom<String> for AgeGroup {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Back-reference to the originating message.
///
/// Identity and lookup only; the event does not own the source message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceRef {
    /// Message identifier from the chat collaborator
    pub message_id: String,

    /// Sender identifier (phone number or display name)
    #[serde(default)]
    pub sender: String,

    /// When the source message was sent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A reconciled football event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Stable identity derived from normalized (date, location, title prefix).
    ///
    /// Re-extraction of the same underlying announcement yields the same
    /// identity, which is what makes the merge idempotent.
    pub identity: String,

    pub event_type: EventType,

    /// Calendar date; `None` while the event is provisional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_start: Option<NaiveTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<NaiveTime>,

    /// Normalized free-text venue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Short label, usually the organizer or the announcement headline
    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,

    #[serde(default)]
    pub status: EventStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_fee: Option<f64>,

    #[serde(default)]
    pub source: SourceRef,

    #[serde(default)]
    pub confidence: Confidence,

    /// Immutable after creation
    pub first_seen_at: DateTime<Utc>,

    /// Advances on every merge that changes any field
    pub last_updated_at: DateTime<Utc>,
}

impl Event {
    /// An event is complete once its date has resolved.
    ///
    /// Incomplete events stay in the store (a later merge may complete them)
    /// but are excluded from the views consumed by notification and calendar
    /// collaborators.
    pub fn is_complete(&self) -> bool {
        self.date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::High);
        assert_eq!(Confidence::High.max(Confidence::Low), Confidence::High);
    }

    #[test]
    fn test_skill_level_range() {
        assert!(SkillLevel::new(0).is_none());
        assert!(SkillLevel::new(11).is_none());
        assert_eq!(SkillLevel::new(5).unwrap().value(), 5);
    }

    #[test]
    fn test_age_group_display_roundtrip() {
        for group in [
            AgeGroup::Youth('D'),
            AgeGroup::BirthYear(2014),
            AgeGroup::Under(12),
        ] {
            let rendered = group.to_string();
            assert_eq!(rendered.parse::<AgeGroup>().unwrap(), group);
        }
        assert_eq!(AgeGroup::Youth('D').to_string(), "D-Jugend");
        assert_eq!(AgeGroup::BirthYear(2014).to_string(), "JG2014");
    }

    #[test]
    fn test_age_group_parses_short_year() {
        assert_eq!("JG15".parse::<AgeGroup>().unwrap(), AgeGroup::BirthYear(2015));
        assert_eq!("2014".parse::<AgeGroup>().unwrap(), AgeGroup::BirthYear(2014));
    }

    #[test]
    fn test_event_schema_tolerates_unknown_fields() {
        let json = r#"{
            "identity": "abc",
            "event_type": "tournament",
            "title": "Hallenturnier",
            "first_seen_at": "2026-01-16T13:32:00Z",
            "last_updated_at": "2026-01-16T13:32:00Z",
            "some_future_field": 42
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Tournament);
        assert!(event.date.is_none());
        assert_eq!(event.status, EventStatus::Open);
        assert!(!event.is_complete());
    }
}
