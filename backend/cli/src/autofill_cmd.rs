//! `forestclaim autofill`: fill a claim form from a scan or from text,
//! keeping any field the user already edited.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use forestclaim_autofill::{ClaimForm, MergeReport, OcrSession, SessionState};
use forestclaim_config::ForestClaimConfig;
use forestclaim_core::FieldKey;
use forestclaim_understanding::RecognitionAdapter;
use serde_json::json;

use crate::extract_cmd::read_text;
use crate::ocr_cmd::{build_adapter, load_image};
use crate::terminal_output::{note_success, render_form};

#[derive(Debug, Args)]
pub struct AutofillArgs {
    /// Scanned claim image
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    pub image: Option<PathBuf>,

    /// Parse this text file instead of running OCR
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Recognition language, e.g. `eng` or `eng+hin`
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Answer recognition with this file's text instead of running an engine
    #[arg(long, requires = "image")]
    pub text_fixture: Option<PathBuf>,

    /// Existing form (JSON written by an earlier run) to merge into
    #[arg(long)]
    pub form: Option<PathBuf>,

    /// Fields edited by hand; autofill leaves them alone
    #[arg(long, value_delimiter = ',')]
    pub touched: Vec<String>,

    /// Write the merged form as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config: &ForestClaimConfig, args: AutofillArgs) -> Result<()> {
    let mut form = load_form(args.form.as_deref(), &args.touched).await?;

    let report = match (&args.text, &args.image) {
        (Some(path), _) => {
            let text = read_text(Some(path)).await?;
            form.autofill_from_text(&text)?
        }
        (None, Some(image)) => {
            let adapter = build_adapter(config, args.text_fixture.as_deref()).await?;
            autofill_from_image(adapter, &mut form, image, args.lang.as_deref()).await?
        }
        (None, None) => bail!("an image or --text is required"),
    };

    if let Some(path) = &args.output {
        let body = serde_json::to_string_pretty(&form)?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if args.json {
        let out = json!({ "form": form.state(), "touched": form.touched(), "report": report });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_form(form.state(), &report));
        note_success(&format!(
            "{} field(s) filled, {} kept as edited",
            report.applied.len(),
            report.skipped_touched.len()
        ));
    }
    Ok(())
}

async fn autofill_from_image(
    adapter: RecognitionAdapter,
    form: &mut ClaimForm,
    image: &Path,
    lang: Option<&str>,
) -> Result<MergeReport> {
    let session = OcrSession::new(Arc::new(adapter));
    let payload = load_image(image).await?;

    let mut rx = session.subscribe();
    let progress = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            if let SessionState::Recognizing { progress } = &*rx.borrow() {
                eprint!("\rRecognizing... {progress:>3}%");
            }
        }
    });
    let outcome = session.run_and_autofill(form, &payload, lang).await;
    progress.abort();
    eprintln!();

    let (_, report) =
        outcome.with_context(|| format!("Recognition failed for {}", image.display()))?;
    Ok(report)
}

/// Start from a saved form, or a blank one, then mark `touched` fields.
async fn load_form(path: Option<&Path>, touched: &[String]) -> Result<ClaimForm> {
    let form = match path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read form {}", path.display()))?;
            serde_json::from_str::<ClaimForm>(&raw)
                .with_context(|| format!("Failed to parse form {}", path.display()))?
        }
        None => ClaimForm::new(),
    };
    if touched.is_empty() {
        return Ok(form);
    }

    let mut marks = form.touched().clone();
    for name in touched {
        marks.touch(name.parse::<FieldKey>()?);
    }
    Ok(ClaimForm::from_parts(form.state().clone(), marks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn touched_flags_are_parsed_loosely() {
        let form = load_form(None, &["village".into(), "survey_or_gps".into()])
            .await
            .unwrap();
        assert!(form.touched().contains(FieldKey::Village));
        assert!(form.touched().contains(FieldKey::SurveyOrGps));
    }

    #[tokio::test]
    async fn unknown_touched_field_is_rejected() {
        let err = load_form(None, &["favouriteTree".into()]).await.unwrap_err();
        assert!(err.to_string().contains("favouriteTree"));
    }

    #[tokio::test]
    async fn saved_form_round_trips_through_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("claim.txt");
        let saved = dir.path().join("form.json");
        tokio::fs::write(&text, "Name: Ram Singh\nVillage: Kalahandi\n").await.unwrap();

        let mut seed = ClaimForm::new();
        seed.edit(FieldKey::Village, "Rayagada").unwrap();
        tokio::fs::write(&saved, serde_json::to_string(&seed).unwrap()).await.unwrap();

        let args = AutofillArgs {
            image: None,
            text: Some(text),
            lang: None,
            text_fixture: None,
            form: Some(saved.clone()),
            touched: Vec::new(),
            output: Some(saved.clone()),
            json: true,
        };
        run(&ForestClaimConfig::default(), args).await.unwrap();

        let merged: ClaimForm =
            serde_json::from_str(&tokio::fs::read_to_string(&saved).await.unwrap()).unwrap();
        assert_eq!(merged.state().claimant_name.as_deref(), Some("Ram Singh"));
        assert_eq!(merged.state().village.as_deref(), Some("Rayagada"));
    }

    #[tokio::test]
    async fn image_with_text_fixture_runs_through_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("form-a.png");
        let fixture = dir.path().join("form-a.txt");
        let saved = dir.path().join("form.json");
        tokio::fs::write(&image, b"\x89PNG").await.unwrap();
        tokio::fs::write(&fixture, "Claimant Name: Ram Singh Age: 45\nVillage: Kalahandi")
            .await
            .unwrap();

        let args = AutofillArgs {
            image: Some(image),
            text: None,
            lang: None,
            text_fixture: Some(fixture),
            form: None,
            touched: vec!["village".into()],
            output: Some(saved.clone()),
            json: true,
        };
        run(&ForestClaimConfig::default(), args).await.unwrap();

        let merged: ClaimForm =
            serde_json::from_str(&tokio::fs::read_to_string(&saved).await.unwrap()).unwrap();
        assert_eq!(merged.state().claimant_name.as_deref(), Some("Ram Singh"));
        assert_eq!(merged.state().age.as_deref(), Some("45"));
        assert_eq!(merged.state().village, None);
    }
}
