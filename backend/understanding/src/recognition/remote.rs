//! Remote recognition endpoint.
//!
//! Uploads the image as multipart form data (`file` + `lang`) and reads back
//! `{ "text": string, "confidence"?: number }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{ImagePayload, ProgressSink, RawRecognition, RecognitionError, Recognizer};

pub struct RemoteRecognizer {
    client: Client,
    endpoint: String,
}

impl RemoteRecognizer {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, RecognitionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Recognizer for RemoteRecognizer {
    fn name(&self) -> &str {
        "remote"
    }

    async fn recognize(
        &self,
        image: &ImagePayload,
        language: &str,
        progress: &ProgressSink,
    ) -> Result<RawRecognition, RecognitionError> {
        progress.report(0.0);
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("file", part).text("lang", language.to_string());

        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RecognitionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;
        if !json.is_object() {
            return Err(RecognitionError::InvalidResponse(
                "expected a JSON object".to_string(),
            ));
        }
        debug!(endpoint = %self.endpoint, status = status.as_u16(), "remote OCR responded");

        progress.report(1.0);
        Ok(RawRecognition {
            text: json["text"].as_str().unwrap_or("").to_string(),
            confidence: json["confidence"].as_f64().map(|c| c as f32),
        })
    }
}
