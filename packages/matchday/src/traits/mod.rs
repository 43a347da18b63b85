//! Collaborator boundary traits.
//!
//! The pipeline core never talks to a chat platform, an OCR engine, an AI
//! model, or a calendar directly; it consumes these capability traits. All
//! of them are async and timeout-capable on the implementation side, and the
//! sync pass treats every failure as a degraded contribution for that item,
//! never a pass abort.

use async_trait::async_trait;

use crate::error::ExtractResult;
use crate::types::message::{OcrText, RawMessage};

/// Chat-retrieval collaborator: yields read-only message records.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch up to `limit` most recent messages.
    async fn fetch(&self, limit: usize) -> ExtractResult<Vec<RawMessage>>;
}

/// Image-to-text collaborator.
#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Recognize text in the referenced image.
    ///
    /// Failures and low-confidence results are treated by the caller as "no
    /// text contribution", not as pass failures.
    async fn recognize(&self, image_ref: &str) -> ExtractResult<OcrText>;
}

/// Free-text-to-structured-data collaborator (the AI model).
///
/// Implementations wrap whatever transport the model needs (HTTP API, local
/// CLI subprocess); the core only sees prompt in, raw text out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one completion request.
    async fn complete(&self, prompt: &str) -> ExtractResult<String>;
}

/// Outbound notification collaborator.
///
/// The core hands over a preformatted body produced from the complete-events
/// view; the collaborator owns user-facing formatting and delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, body: &str) -> ExtractResult<()>;
}
