//! Boundary records from the chat and OCR collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw message as delivered by the chat-retrieval collaborator.
///
/// The pipeline treats these as read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    /// Collaborator-assigned message identifier
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Sender identifier (phone number or display name)
    pub sender: String,

    /// Message body; may be empty for pure media messages
    #[serde(default)]
    pub text: String,

    /// References to attached images, resolvable by the OCR collaborator
    #[serde(default)]
    pub image_refs: Vec<String>,
}

impl RawMessage {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            sender: sender.into(),
            text: text.into(),
            image_refs: Vec::new(),
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_refs.push(image_ref.into());
        self
    }
}

/// OCR output for one image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrText {
    pub text: String,

    /// Recognition confidence (0.0-1.0). Low-confidence text contributes
    /// nothing to the pass rather than polluting extraction.
    pub confidence: f32,
}

impl OcrText {
    /// Threshold below which OCR text is discarded.
    pub const MIN_CONFIDENCE: f32 = 0.5;

    pub fn is_usable(&self) -> bool {
        self.confidence >= Self::MIN_CONFIDENCE && !self.text.trim().is_empty()
    }
}
