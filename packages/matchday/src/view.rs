//! Read views over the store.
//!
//! Downstream collaborators (notification, calendar) only ever see complete
//! events. Incomplete ones stay in the store waiting for a merge to resolve
//! their date, but they never leak out of these views.

use chrono::{DateTime, NaiveDate, Utc};

use crate::store::EventStore;
use crate::types::event::{AgeGroup, Event, EventStatus, EventType, SkillLevel};

/// Filter over the complete-events view.
///
/// All criteria are conjunctive; an unset criterion matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub event_types: Vec<EventType>,
    pub min_level: Option<SkillLevel>,
    pub max_level: Option<SkillLevel>,
    pub age_group: Option<AgeGroup>,
    pub only_open: bool,
    pub location_contains: Option<String>,
    pub organizer_contains: Option<String>,
}

impl FilterCriteria {
    pub fn matches(&self, event: &Event) -> bool {
        let Some(date) = event.date else {
            return false;
        };
        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }
        if !self.event_types.is_empty() && !self.event_types.contains(&event.event_type) {
            return false;
        }
        // Level criteria only exclude events that state a conflicting level;
        // an event without one stays visible.
        if let (Some(min), Some(level)) = (self.min_level, event.skill_level) {
            if level < min {
                return false;
            }
        }
        if let (Some(max), Some(level)) = (self.max_level, event.skill_level) {
            if level > max {
                return false;
            }
        }
        if let Some(wanted) = self.age_group {
            if event.age_group != Some(wanted) {
                return false;
            }
        }
        if self.only_open && event.status != EventStatus::Open {
            return false;
        }
        if let Some(needle) = &self.location_contains {
            let hit = event
                .location
                .as_deref()
                .is_some_and(|loc| loc.to_lowercase().contains(&needle.to_lowercase()));
            if !hit {
                return false;
            }
        }
        if let Some(needle) = &self.organizer_contains {
            let hit = event
                .organizer
                .as_deref()
                .is_some_and(|org| org.to_lowercase().contains(&needle.to_lowercase()));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Complete events on or after `since`, sorted by date then start time.
pub fn complete_events(store: &EventStore, since: Option<NaiveDate>) -> Vec<&Event> {
    let mut events: Vec<&Event> = store
        .all()
        .filter(|event| event.is_complete())
        .filter(|event| match since {
            Some(since) => event.date.is_some_and(|date| date >= since),
            None => true,
        })
        .collect();
    events.sort_by_key(|event| (event.date, event.time_start));
    events
}

/// Complete events inserted or changed after `since`.
///
/// The notification hand-off: a collaborator passes the timestamp of its
/// previous run and only sees events whose last merge happened after it, so
/// unchanged events are never re-announced.
pub fn complete_events_changed_since(store: &EventStore, since: DateTime<Utc>) -> Vec<&Event> {
    let mut events: Vec<&Event> = store
        .all()
        .filter(|event| event.is_complete() && event.last_updated_at > since)
        .collect();
    events.sort_by_key(|event| (event.date, event.time_start));
    events
}

/// Complete events matching `criteria`, sorted by date then start time.
pub fn filtered_events<'a>(store: &'a EventStore, criteria: &FilterCriteria) -> Vec<&'a Event> {
    let mut events: Vec<&Event> = store.all().filter(|event| criteria.matches(event)).collect();
    events.sort_by_key(|event| (event.date, event.time_start));
    events
}
