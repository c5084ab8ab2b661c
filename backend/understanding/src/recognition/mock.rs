use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{ImagePayload, ProgressSink, RawRecognition, RecognitionError, Recognizer};

/// A recognizer that returns canned text or a canned failure.
#[derive(Debug, Default, Clone)]
pub struct MockRecognizer {
    text: String,
    confidence: Option<f32>,
    failure: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Every call fails with an engine error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Hold each call at the halfway mark until `gate` is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl Recognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(
        &self,
        _image: &ImagePayload,
        _language: &str,
        progress: &ProgressSink,
    ) -> Result<RawRecognition, RecognitionError> {
        progress.report(0.0);
        if let Some(gate) = &self.gate {
            progress.report(0.5);
            gate.notified().await;
        }
        if let Some(message) = &self.failure {
            return Err(RecognitionError::Engine(message.clone()));
        }
        progress.report(1.0);
        Ok(RawRecognition {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}
