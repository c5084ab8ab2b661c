//! Recognition adapter: turns an image into raw text.
//!
//! Two real backends sit behind the [`Recognizer`] trait: a remote HTTP
//! recognition endpoint and the local `tesseract` binary. The adapter picks
//! one at construction time, times every call and reports progress.

pub mod mock;
pub mod remote;
pub mod tesseract;

use std::path::PathBuf;
use std::sync::atomic::{AtomicI16, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub use mock::MockRecognizer;
pub use remote::RemoteRecognizer;
pub use tesseract::{parse_tsv, TesseractRecognizer};

/// Language used when the caller gives no hint.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// An in-memory image selected by the user.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: String,
}

impl ImagePayload {
    pub fn new(
        bytes: impl Into<Bytes>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }

    /// Guess the content type from the file extension.
    pub fn from_file_name(bytes: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_for(&file_name).to_string();
        Self::new(bytes, file_name, content_type)
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Output of one successful recognition call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// Newline-preserving text; may be empty.
    pub raw_text: String,
    /// 0-100 when the backend reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub elapsed_ms: u64,
    pub engine: String,
}

/// What a backend hands back before the adapter adds timing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecognition {
    pub text: String,
    pub confidence: Option<f32>,
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("OCR request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR API error: {status}")]
    Status { status: u16, body: String },

    #[error("invalid OCR response: {0}")]
    InvalidResponse(String),

    #[error("OCR engine error: {0}")]
    Engine(String),

    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A backend capable of reading text out of an image.
#[async_trait]
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &str;

    async fn recognize(
        &self,
        image: &ImagePayload,
        language: &str,
        progress: &ProgressSink,
    ) -> Result<RawRecognition, RecognitionError>;
}

type ProgressCallback = Box<dyn Fn(u8) + Send + Sync>;

/// Receives fractional progress from a backend and republishes it as a
/// monotonically non-decreasing 0-100 percentage.
pub struct ProgressSink {
    last: AtomicI16,
    callback: Option<ProgressCallback>,
}

impl ProgressSink {
    /// A sink that only records the latest percentage.
    pub fn new() -> Self {
        Self {
            last: AtomicI16::new(-1),
            callback: None,
        }
    }

    /// A sink that also forwards every increase to `callback`.
    pub fn with_callback(callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            last: AtomicI16::new(-1),
            callback: Some(Box::new(callback)),
        }
    }

    /// Report a fraction in [0, 1]. Out-of-range values are clamped,
    /// NaN and regressions are ignored.
    pub fn report(&self, fraction: f32) {
        if fraction.is_nan() {
            return;
        }
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as i16;
        let previous = self.last.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            if let Some(callback) = &self.callback {
                callback(percent as u8);
            }
        }
    }

    /// Latest reported percentage, if anything was reported yet.
    pub fn percent(&self) -> Option<u8> {
        let last = self.last.load(Ordering::SeqCst);
        (last >= 0).then_some(last as u8)
    }
}

impl Default for ProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSink")
            .field("percent", &self.percent())
            .finish()
    }
}

/// Inputs needed to pick and build a backend.
#[derive(Debug, Clone)]
pub struct RecognitionSettings {
    /// Remote endpoint; when set, the remote backend is used.
    pub api_url: Option<String>,
    pub default_language: String,
    pub tesseract_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            tesseract_path: PathBuf::from("tesseract"),
            timeout: None,
        }
    }
}

/// Times and logs calls into the selected [`Recognizer`].
#[derive(Clone)]
pub struct RecognitionAdapter {
    backend: Arc<dyn Recognizer>,
    default_language: String,
}

impl RecognitionAdapter {
    pub fn new(backend: Arc<dyn Recognizer>, default_language: impl Into<String>) -> Self {
        Self {
            backend,
            default_language: default_language.into(),
        }
    }

    /// Remote backend if an endpoint URL is configured, local engine otherwise.
    pub fn from_settings(settings: &RecognitionSettings) -> Result<Self, RecognitionError> {
        let backend: Arc<dyn Recognizer> = match settings.api_url.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                Arc::new(RemoteRecognizer::new(url.trim(), settings.timeout)?)
            }
            _ => Arc::new(TesseractRecognizer::new(settings.tesseract_path.clone())),
        };
        info!(engine = backend.name(), "recognition backend selected");
        Ok(Self::new(backend, settings.default_language.clone()))
    }

    pub fn engine(&self) -> &str {
        self.backend.name()
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub async fn recognize(
        &self,
        image: &ImagePayload,
        language: Option<&str>,
        progress: &ProgressSink,
    ) -> Result<RecognitionResult, RecognitionError> {
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_language);
        let engine = self.backend.name().to_string();
        info!(
            engine = %engine,
            lang = %language,
            file = %image.file_name,
            bytes = image.bytes.len(),
            "starting recognition"
        );

        let start = Instant::now();
        match self.backend.recognize(image, language, progress).await {
            Ok(raw) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                info!(
                    engine = %engine,
                    elapsed_ms,
                    chars = raw.text.chars().count(),
                    confidence = ?raw.confidence,
                    "recognition finished"
                );
                Ok(RecognitionResult {
                    raw_text: raw.text,
                    confidence: raw.confidence,
                    elapsed_ms,
                    engine,
                })
            }
            Err(e) => {
                warn!(
                    engine = %engine,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "recognition failed"
                );
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for RecognitionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionAdapter")
            .field("engine", &self.engine())
            .field("default_language", &self.default_language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn progress_is_rescaled_and_monotonic() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            ProgressSink::with_callback(move |p| seen.lock().unwrap().push(p))
        };
        sink.report(0.0);
        sink.report(0.456);
        sink.report(0.2);
        sink.report(1.7);
        sink.report(f32::NAN);
        assert_eq!(*seen.lock().unwrap(), vec![0, 46, 100]);
        assert_eq!(sink.percent(), Some(100));
    }

    #[test]
    fn fresh_sink_has_no_percent() {
        assert_eq!(ProgressSink::new().percent(), None);
    }

    #[test]
    fn content_type_is_guessed_from_extension() {
        let image = ImagePayload::from_file_name(vec![1, 2, 3], "scan.JPG");
        assert_eq!(image.content_type, "image/jpeg");
        let image = ImagePayload::from_file_name(Vec::new(), "blob");
        assert_eq!(image.content_type, "application/octet-stream");
    }

    #[test]
    fn status_error_message_names_the_code() {
        let err = RecognitionError::Status {
            status: 503,
            body: "down".into(),
        };
        assert_eq!(err.to_string(), "OCR API error: 503");
    }

    #[test]
    fn settings_without_url_select_tesseract() {
        let adapter = RecognitionAdapter::from_settings(&RecognitionSettings::default()).unwrap();
        assert_eq!(adapter.engine(), "tesseract");
        assert_eq!(adapter.default_language(), DEFAULT_LANGUAGE);

        let settings = RecognitionSettings {
            api_url: Some("http://127.0.0.1:9/ocr".into()),
            ..Default::default()
        };
        let adapter = RecognitionAdapter::from_settings(&settings).unwrap();
        assert_eq!(adapter.engine(), "remote");
    }

    #[tokio::test]
    async fn adapter_times_and_tags_results() {
        let backend = Arc::new(MockRecognizer::new().with_text("Village: Kalahandi").with_confidence(88.0));
        let adapter = RecognitionAdapter::new(backend, "eng");
        let image = ImagePayload::from_file_name(vec![0u8; 4], "claim.png");
        let sink = ProgressSink::new();

        let result = adapter.recognize(&image, None, &sink).await.unwrap();
        assert_eq!(result.raw_text, "Village: Kalahandi");
        assert_eq!(result.confidence, Some(88.0));
        assert_eq!(result.engine, "mock");
        assert_eq!(sink.percent(), Some(100));
    }

    #[tokio::test]
    async fn adapter_passes_failures_through() {
        let backend = Arc::new(MockRecognizer::new().failing("engine crashed"));
        let adapter = RecognitionAdapter::new(backend, "eng");
        let image = ImagePayload::from_file_name(vec![0u8; 4], "claim.png");

        let err = adapter
            .recognize(&image, Some("hin"), &ProgressSink::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("engine crashed"));
    }
}
