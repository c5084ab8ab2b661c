//! `forestclaim extract`: run the field extractor over document text.

use std::path::Path;

use anyhow::{Context, Result};
use forestclaim_autofill::AutofillError;
use forestclaim_understanding::extract_fields;
use tokio::io::AsyncReadExt;

pub async fn run(file: Option<&Path>) -> Result<()> {
    let text = read_text(file).await?;
    if text.trim().is_empty() {
        return Err(AutofillError::EmptyText.into());
    }
    let fields = extract_fields(&text);
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

/// Text from `file`, or all of stdin when no file is given.
pub async fn read_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
