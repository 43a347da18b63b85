//! Football Event Extraction Library
//!
//! Turns free-text chat messages (German amateur football announcements)
//! into a deduplicated, persistent collection of structured events.
//!
//! # Design Philosophy
//!
//! **"Patterns verify, models enrich"**
//!
//! - Deterministic pattern extraction is always available and acts as the
//!   ground truth the model output is cross-checked against
//! - Every candidate passes through the same normalizers, so identity and
//!   deduplication are extractor-independent
//! - Merging is confidence-monotone and idempotent; re-syncing the same
//!   messages never degrades the store
//! - Collaborator failures degrade a single message, never the pass
//!
//! # Usage
//!
//! ```rust,ignore
//! use matchday::store::EventStore;
//! use matchday::sync::{run_pass, SyncContext};
//! use matchday::types::config::SyncOptions;
//! use matchday::view;
//!
//! let mut store = EventStore::load("events.json")?;
//! let messages = matchday::parser::parse_export_text(&export);
//!
//! let options = SyncOptions::new(today);
//! let report = run_pass(&mut store, &messages, &SyncContext::default(), &options).await?;
//!
//! for event in view::complete_events(&store, Some(today)) {
//!     println!("{} {}", event.date.unwrap(), event.title);
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Domain records (events, candidates, messages, options)
//! - [`traits`] - Collaborator abstractions (model, OCR, chat, notifier)
//! - [`parser`] - WhatsApp chat-export parsing
//! - [`normalize`] - German date/time/category/text normalization
//! - [`extract`] - Pattern and model extractors plus cross-checking
//! - [`merge`] - Identity, fuzzy matching, confidence-monotone merge
//! - [`store`] - Durable JSON event store
//! - [`sync`] - The orchestrated sync pass
//! - [`view`] - Complete-events views and filters
//! - [`testing`] - Mock collaborators for downstream tests

pub mod error;
pub mod extract;
pub mod merge;
pub mod normalize;
pub mod parser;
pub mod store;
pub mod sync;
pub mod testing;
pub mod traits;
pub mod types;
pub mod view;

// Re-export core types at crate root
pub use error::{ExtractError, StoreError};
pub use extract::{Extractor, ModelExtractor, PatternExtractor};
pub use merge::MergeOutcome;
pub use store::EventStore;
pub use sync::{run_pass, SyncContext, SyncReport};
pub use traits::{MessageSource, ModelClient, Notifier, OcrClient};
pub use types::{
    AgeGroup, Candidate, Confidence, Event, EventStatus, EventType, RawMessage, SkillLevel,
    SyncOptions, SyncState,
};
pub use view::{complete_events, complete_events_changed_since, filtered_events, FilterCriteria};
