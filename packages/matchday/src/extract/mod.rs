//! Candidate-event extraction.
//!
//! Two independent producers of the same candidate shape, composed by the
//! merge engine's confidence policy:
//!
//! - [`PatternExtractor`] - deterministic regex/rule extraction; always
//!   available, also acts as the verifier for model output
//! - [`ModelExtractor`] - wraps the AI collaborator behind the same contract
//!   and cross-checks its output against the pattern candidates

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ExtractResult;
use crate::types::{candidate::Candidate, message::RawMessage};

pub mod model;
pub mod pattern;
pub mod prompts;

pub use model::{cross_check, ModelExtractor};
pub use pattern::PatternExtractor;

/// A producer of candidate events from raw message text.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extract zero or more candidates from one message.
    ///
    /// `reference` anchors relative and year-less date expressions.
    async fn extract(
        &self,
        message: &RawMessage,
        reference: NaiveDate,
    ) -> ExtractResult<Vec<Candidate>>;
}
