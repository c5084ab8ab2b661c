//! Local recognition through the `tesseract` command line tool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{ImagePayload, ProgressSink, RawRecognition, RecognitionError, Recognizer};

/// Runs `tesseract <image> stdout -l <lang> tsv` on a staged copy of the image.
pub struct TesseractRecognizer {
    binary: PathBuf,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(
        &self,
        image: &ImagePayload,
        language: &str,
        progress: &ProgressSink,
    ) -> Result<RawRecognition, RecognitionError> {
        progress.report(0.0);

        let suffix = Path::new(&image.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let staged = tempfile::Builder::new()
            .prefix("forestclaim-ocr-")
            .suffix(&suffix)
            .tempfile()?;
        tokio::fs::write(staged.path(), &image.bytes).await?;
        progress.report(0.1);

        let output = Command::new(&self.binary)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("tsv")
            .output()
            .await
            .map_err(|e| {
                RecognitionError::Engine(format!("failed to run {}: {e}", self.binary.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let (text, confidence) = parse_tsv(&tsv);
        debug!(words = text.split_whitespace().count(), "tesseract tsv parsed");

        progress.report(1.0);
        Ok(RawRecognition { text, confidence })
    }
}

/// Rebuild text from tesseract's TSV word rows and average word confidence.
///
/// Words on one line are joined by a space, a new line starts on a line
/// change, and a blank line separates paragraphs and blocks. Rows with a
/// negative confidence do not count toward the mean.
pub fn parse_tsv(tsv: &str) -> (String, Option<f32>) {
    let mut text = String::new();
    let mut previous: Option<(u32, u32, u32, u32)> = None;
    let mut conf_sum = 0.0f64;
    let mut conf_count = 0u32;

    for row in tsv.lines() {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let word = cols[11].trim();
        if word.is_empty() {
            continue;
        }
        let position = match (
            cols[1].parse::<u32>(),
            cols[2].parse::<u32>(),
            cols[3].parse::<u32>(),
            cols[4].parse::<u32>(),
        ) {
            (Ok(page), Ok(block), Ok(par), Ok(line)) => (page, block, par, line),
            _ => continue,
        };

        if let Some((page, block, par, line)) = previous {
            if page != position.0 || block != position.1 || par != position.2 {
                text.push_str("\n\n");
            } else if line != position.3 {
                text.push('\n');
            } else {
                text.push(' ');
            }
        }
        text.push_str(word);
        previous = Some(position);

        if let Ok(conf) = cols[10].trim().parse::<f64>() {
            if conf >= 0.0 {
                conf_sum += conf;
                conf_count += 1;
            }
        }
    }

    let confidence = (conf_count > 0).then(|| (conf_sum / conf_count as f64) as f32);
    (text, confidence)
}
