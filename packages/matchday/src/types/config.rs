//! Sync options and persisted sync state.
//!
//! The last-sync timestamp is explicit configuration: loaded once per
//! invocation from a small JSON state file and passed through the pipeline
//! as an argument, never a process-wide singleton.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default fuzzy-match threshold for location similarity
/// (normalized Levenshtein, so 0.8 means edit distance <= 20%).
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Options for one sync pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Reference date for resolving relative and year-less date expressions.
    pub reference: NaiveDate,

    /// Only process messages newer than this cutoff.
    pub since: Option<DateTime<Utc>>,

    /// Clear the store before rebuilding from the full message history.
    pub full_resync: bool,

    /// Run the full pipeline but suppress the durable save.
    pub dry_run: bool,

    /// Location similarity threshold for fuzzy duplicate detection.
    pub fuzzy_threshold: f64,
}

impl SyncOptions {
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            reference,
            since: None,
            full_resync: false,
            dry_run: false,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    pub fn with_since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }

    pub fn full_resync(mut self, full: bool) -> Self {
        self.full_resync = full;
        self
    }

    pub fn dry_run(mut self, dry: bool) -> Self {
        self.dry_run = dry;
        self
    }
}

/// Persisted sync state, currently just the last successful pass timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncState {
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
}

impl SyncState {
    /// Load state from `path`. A missing file yields the default state;
    /// an unreadable file is an error the caller must decide about.
    pub fn load(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            path: PathBuf::from(path),
            reason: format!("sync state: {e}"),
        })
    }

    /// Persist state atomically (write temp, then rename).
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
