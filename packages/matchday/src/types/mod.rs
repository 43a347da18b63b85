//! Core data types.
//!
//! - [`event`] - The canonical `Event` record and its enums
//! - [`candidate`] - Extraction-stage candidates, not yet reconciled
//! - [`message`] - Boundary records from chat/OCR collaborators
//! - [`config`] - Sync options and persisted sync state

pub mod candidate;
pub mod config;
pub mod event;
pub mod message;

pub use candidate::Candidate;
pub use config::{SyncOptions, SyncState};
pub use event::{AgeGroup, Confidence, Event, EventStatus, EventType, SkillLevel, SourceRef};
pub use message::{OcrText, RawMessage};
