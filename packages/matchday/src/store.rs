//! JSON-file event store.
//!
//! The on-disk shape is a versioned envelope around the event list. Saves go
//! through a temp file and an atomic rename, so a crash mid-write leaves the
//! previous store intact. A file that exists but cannot be read as a known
//! envelope is reported as [`StoreError::Corrupt`] instead of being silently
//! replaced.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::merge::{self, MergeOutcome};
use crate::types::{candidate::Candidate, event::Event};

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    events: Vec<Event>,
}

/// The single owner of reconciled events.
#[derive(Debug, Default)]
pub struct EventStore {
    path: Option<PathBuf>,
    events: IndexMap<String, Event>,
}

impl EventStore {
    /// A store with no backing file; `save` is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store from `path`.
    ///
    /// A missing file yields an empty store bound to that path. A present
    /// but unreadable file is an error; the caller decides whether to abort
    /// or start over.
    pub fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "no store file, starting empty");
            return Ok(Self {
                path: Some(path),
                events: IndexMap::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let file: StoreFile =
            serde_json::from_str(&content).map_err(|err| StoreError::Corrupt {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        if file.schema_version > SCHEMA_VERSION {
            return Err(StoreError::Corrupt {
                path: path.clone(),
                reason: format!(
                    "schema version {} is newer than supported {}",
                    file.schema_version, SCHEMA_VERSION
                ),
            });
        }

        let events: IndexMap<String, Event> = file
            .events
            .into_iter()
            .map(|event| (event.identity.clone(), event))
            .collect();

        debug!(path = %path.display(), count = events.len(), "store loaded");
        Ok(Self {
            path: Some(path),
            events,
        })
    }

    /// Reconcile one candidate into the store.
    pub fn reconcile(
        &mut self,
        candidate: Candidate,
        now: DateTime<Utc>,
        fuzzy_threshold: f64,
    ) -> MergeOutcome {
        let matched = merge::find_match(&self.events, &candidate, fuzzy_threshold)
            .and_then(|key| self.events.get_mut(&key));
        if let Some(event) = matched {
            return merge::merge_into(event, &candidate, now);
        }

        let event = merge::event_from_candidate(candidate, now);
        info!(identity = %event.identity, title = %event.title, "new event");
        self.events.insert(event.identity.clone(), event);
        MergeOutcome::Inserted
    }

    pub fn get(&self, identity: &str) -> Option<&Event> {
        self.events.get(identity)
    }

    /// All events in insertion order, complete or not.
    pub fn all(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all events, e.g. ahead of a full resync.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist the store, atomically, if it has a backing file.
    pub fn save(&self) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = StoreFile {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            events: self.events.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = path.with_extension("json.tmp");
        fs::write(&temp, json)?;
        fs::rename(&temp, path)?;

        debug!(path = %path.display(), count = self.events.len(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::event::EventType;
    use chrono::NaiveDate;

    fn candidate(title: &str, day: u32) -> Candidate {
        let mut cand = Candidate::new(EventType::Tournament);
        cand.title = title.to_string();
        cand.location = Some("Turnhalle Nord".to_string());
        cand.date = NaiveDate::from_ymd_opt(2026, 2, day);
        cand
    }

    fn now() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2026, 1, 16)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_reconcile_insert_then_merge() {
        let mut store = EventStore::in_memory();
        assert_eq!(
            store.reconcile(candidate("Turnier", 1), now(), 0.8),
            MergeOutcome::Inserted
        );
        assert_eq!(
            store.reconcile(candidate("Turnier", 1), now(), 0.8),
            MergeOutcome::Unchanged
        );
        assert_eq!(store.len(), 1);

        assert_eq!(
            store.reconcile(candidate("Turnier", 8), now(), 0.8),
            MergeOutcome::Inserted
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");

        let mut store = EventStore::load(&path).unwrap();
        assert!(store.is_empty());
        store.reconcile(candidate("Turnier", 1), now(), 0.8);
        store.save().unwrap();

        let reloaded = EventStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        let event = reloaded.all().next().unwrap();
        assert_eq!(event.title, "Turnier");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2026, 2, 1));

        // The temp file never survives a save.
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        fs::write(&path, "{ not json").unwrap();

        let err = EventStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"{"schema_version": 99, "saved_at": "2026-01-16T14:00:00Z", "events": []}"#,
        )
        .unwrap();

        let err = EventStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_in_memory_save_is_noop() {
        let mut store = EventStore::in_memory();
        store.reconcile(candidate("Turnier", 1), now(), 0.8);
        store.save().unwrap();
    }
}
