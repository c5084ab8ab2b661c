//! `forestclaim ocr`: print the text recognized in one image.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use forestclaim_config::ForestClaimConfig;
use forestclaim_understanding::{ImagePayload, MockRecognizer, ProgressSink, RecognitionAdapter};

use crate::config::recognition_settings;
use crate::terminal_output::{note_info, note_success};

pub async fn run(
    config: &ForestClaimConfig,
    image: &Path,
    lang: Option<&str>,
    save_text: Option<&Path>,
    text_fixture: Option<&Path>,
) -> Result<()> {
    let adapter = build_adapter(config, text_fixture).await?;
    let payload = load_image(image).await?;

    let sink = ProgressSink::with_callback(|percent| eprint!("\rRecognizing... {percent:>3}%"));
    let outcome = adapter.recognize(&payload, lang, &sink).await;
    eprintln!();
    let result = outcome.with_context(|| format!("Recognition failed for {}", image.display()))?;

    match save_text {
        Some(path) => {
            tokio::fs::write(path, &result.raw_text)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            note_success(&format!("Text saved to {}", path.display()));
        }
        None => println!("{}", result.raw_text),
    }

    let confidence = result
        .confidence
        .map(|c| format!("{c:.0}%"))
        .unwrap_or_else(|| "n/a".to_string());
    note_info(&format!(
        "{} engine, {} ms, confidence {confidence}",
        result.engine, result.elapsed_ms
    ));
    Ok(())
}

/// The configured recognition backend, or a canned one that answers every
/// image with the contents of `text_fixture`.
pub async fn build_adapter(
    config: &ForestClaimConfig,
    text_fixture: Option<&Path>,
) -> Result<RecognitionAdapter> {
    let settings = recognition_settings(config);
    let Some(path) = text_fixture else {
        return Ok(RecognitionAdapter::from_settings(&settings)?);
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read text fixture {}", path.display()))?;
    let backend = MockRecognizer::new().with_text(text);
    Ok(RecognitionAdapter::new(Arc::new(backend), settings.default_language))
}

/// Read an image from disk, guessing its type from the extension.
pub async fn load_image(path: &Path) -> Result<ImagePayload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(ImagePayload::from_file_name(bytes, file_name))
}
