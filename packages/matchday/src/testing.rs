//! Testing utilities including mock collaborators.
//!
//! These let applications exercise the sync pipeline without a real chat
//! export, OCR engine, or model behind it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{ExtractError, ExtractResult};
use crate::traits::{MessageSource, ModelClient, Notifier, OcrClient};
use crate::types::message::{OcrText, RawMessage};

/// A mock model client returning scripted completions.
///
/// Responses are matched by substring of the prompt, so a script entry keyed
/// on a message fragment fires for whichever prompt embeds that fragment.
/// With no matching entry the client fails as unavailable, which is also the
/// way to test the degraded path.
#[derive(Default)]
pub struct MockModelClient {
    responses: Arc<RwLock<Vec<(String, String)>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a completion: any prompt containing `fragment` gets `response`.
    pub fn with_response(self, fragment: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .push((fragment.into(), response.into()));
        self
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn complete(&self, prompt: &str) -> ExtractResult<String> {
        self.calls.write().unwrap().push(prompt.to_string());
        let responses = self.responses.read().unwrap();
        responses
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| ExtractError::ModelUnavailable("no scripted response".to_string()))
    }
}

/// A mock OCR client returning scripted text per image reference.
#[derive(Default)]
pub struct MockOcr {
    texts: Arc<RwLock<HashMap<String, OcrText>>>,
}

impl MockOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, image_ref: impl Into<String>, text: impl Into<String>, confidence: f32) -> Self {
        self.texts.write().unwrap().insert(
            image_ref.into(),
            OcrText {
                text: text.into(),
                confidence,
            },
        );
        self
    }
}

#[async_trait]
impl OcrClient for MockOcr {
    async fn recognize(&self, image_ref: &str) -> ExtractResult<OcrText> {
        self.texts
            .read()
            .unwrap()
            .get(image_ref)
            .cloned()
            .ok_or_else(|| ExtractError::Ocr {
                image_ref: image_ref.to_string(),
                reason: "no scripted text".to_string(),
            })
    }
}

/// A mock message source yielding a fixed list.
#[derive(Default)]
pub struct MockMessageSource {
    messages: Vec<RawMessage>,
}

impl MockMessageSource {
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl MessageSource for MockMessageSource {
    async fn fetch(&self, limit: usize) -> ExtractResult<Vec<RawMessage>> {
        Ok(self.messages.iter().take(limit).cloned().collect())
    }
}

/// A mock notifier that records deliveries instead of sending them.
#[derive(Default)]
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, recipient: &str, body: &str) -> ExtractResult<()> {
        self.sent
            .write()
            .unwrap()
            .push((recipient.to_string(), body.to_string()));
        Ok(())
    }
}
