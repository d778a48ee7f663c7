//! OCR Providers
//!
//! Defines the provider trait and the fault boundary every provider call
//! runs behind.

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;

use super::types::{OcrError, ProviderResult, WordSummary};
use super::ProviderResponse;

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Identifier reported as `source` in results
    fn source(&self) -> &str;

    /// Run text detection on raw image bytes
    async fn detect(&self, image_data: &[u8]) -> Result<ProviderResponse, OcrError>;
}

/// Invoke a provider and normalize its response.
///
/// Errors and panics raised by the provider are turned into a failed
/// [`ProviderResult`]; this function never fails.
pub async fn run_provider(provider: &dyn OcrProviderTrait, image_data: &[u8]) -> ProviderResult {
    let source = provider.source();

    let outcome = AssertUnwindSafe(provider.detect(image_data))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(OcrError::Panicked(panic_message(panic.as_ref()))));

    match outcome {
        Ok(response) => {
            let summary = WordSummary::from_detections(&response.detections);
            tracing::debug!(
                source,
                words = summary.word_count,
                confidence = summary.confidence,
                "OCR provider finished"
            );
            ProviderResult::succeeded(source, summary, response.raw)
        }
        Err(e) => {
            tracing::warn!(source, "OCR provider failed: {}", e);
            ProviderResult::failed(source, e.to_string())
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Behaviour of a [`MockProvider`] call
#[cfg(test)]
#[derive(Clone)]
pub enum MockOutcome {
    Respond(ProviderResponse),
    Fail(String),
    Panic,
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub source: String,
    pub outcome: MockOutcome,
    /// Delay before answering, to shuffle completion order
    pub delay: Option<std::time::Duration>,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockProvider {
    pub fn new(source: &str, outcome: MockOutcome) -> Self {
        Self {
            source: source.to_string(),
            outcome,
            delay: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Provider answering with the given word confidences, one word per entry
    pub fn with_words(source: &str, words: &[(&str, f64)]) -> Self {
        let detections = words
            .iter()
            .map(|(text, confidence)| super::Detection::word(*text, *confidence))
            .collect();
        Self::new(
            source,
            MockOutcome::Respond(ProviderResponse {
                detections,
                raw: serde_json::json!({ "mock": source }),
            }),
        )
    }

    pub fn failing(source: &str, message: &str) -> Self {
        Self::new(source, MockOutcome::Fail(message.to_string()))
    }

    pub fn delayed(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn source(&self) -> &str {
        &self.source
    }

    async fn detect(&self, _image_data: &[u8]) -> Result<ProviderResponse, OcrError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            MockOutcome::Respond(response) => Ok(response.clone()),
            MockOutcome::Fail(message) => Err(OcrError::ApiError(message.clone())),
            MockOutcome::Panic => panic!("mock provider exploded"),
        }
    }
}
