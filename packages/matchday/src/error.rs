//! Typed errors for the matchday library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the durable event store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Durable data exists but cannot be parsed as the expected schema.
    ///
    /// The caller decides whether to abort or reinitialize; the store never
    /// silently discards unreadable data.
    #[error("event store corrupt at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Filesystem operation failed
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the in-memory collection failed
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised on the extraction side.
///
/// Per-source extraction failures are isolated by the sync pass: they
/// degrade that message's contribution, never the whole pass.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The model collaborator failed, timed out, or is not configured.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model returned output that could not be coerced into candidates.
    #[error("unparseable model output: {0}")]
    Unparseable(String),

    /// OCR collaborator failed for an image reference.
    #[error("OCR failed for {image_ref}: {reason}")]
    Ocr { image_ref: String, reason: String },
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
