//! Extraction-stage candidate events.
//!
//! A `Candidate` is what both extractors produce: the same field shape as a
//! stored [`Event`](super::event::Event) but without identity or store
//! timestamps. Candidates are normalized by construction (extractors run
//! every raw fragment through the [`normalize`](crate::normalize) functions)
//! and only gain identity when the merge engine reconciles them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::event::{
    AgeGroup, Confidence, EventStatus, EventType, SkillLevel, SourceRef,
};

/// An unmerged candidate event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub event_type: EventType,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub time_start: Option<NaiveTime>,

    #[serde(default)]
    pub time_end: Option<NaiveTime>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub skill_level: Option<SkillLevel>,

    #[serde(default)]
    pub age_group: Option<AgeGroup>,

    #[serde(default)]
    pub organizer: Option<String>,

    #[serde(default)]
    pub contact_phone: Option<String>,

    #[serde(default)]
    pub contact_name: Option<String>,

    #[serde(default)]
    pub status: EventStatus,

    #[serde(default)]
    pub entry_fee: Option<f64>,

    #[serde(default)]
    pub source: SourceRef,

    #[serde(default)]
    pub confidence: Confidence,
}

impl Candidate {
    /// Create a minimal candidate of the given type.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            date: None,
            time_start: None,
            time_end: None,
            location: None,
            title: String::new(),
            description: None,
            skill_level: None,
            age_group: None,
            organizer: None,
            contact_phone: None,
            contact_name: None,
            status: EventStatus::Open,
            entry_fee: None,
            source: SourceRef::default(),
            confidence: Confidence::Low,
        }
    }

    /// Apply the confidence policy: `High` only if the date AND at least one
    /// of location or organizer resolved.
    ///
    /// The title does not count as an anchor on its own: extractors always
    /// fill it, falling back to a first-line excerpt, so it only carries
    /// signal through the organizer it was derived from.
    pub fn with_policy_confidence(mut self) -> Self {
        let anchored = self.location.is_some() || self.organizer.is_some();
        self.confidence = if self.date.is_some() && anchored {
            Confidence::High
        } else {
            Confidence::Low
        };
        self
    }
}
