//! Stateless extraction endpoints: parse text, or merge an extraction into
//! a client-held form.

use axum::Json;
use forestclaim_autofill::{merge_with_report, AutofillError};
use forestclaim_core::{ExtractedFields, FormState, TouchedFields};
use forestclaim_understanding::extract_fields;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    #[serde(default)]
    pub form: FormState,
    pub extracted: ExtractedFields,
    #[serde(default)]
    pub touched: TouchedFields,
}

/// `POST /api/extract`
pub async fn extract(Json(req): Json<TextRequest>) -> Result<Json<ExtractedFields>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(AutofillError::EmptyText.into());
    }
    Ok(Json(extract_fields(&req.text)))
}

/// `POST /api/merge`
pub async fn merge(Json(req): Json<MergeRequest>) -> Json<Value> {
    let (form, report) = merge_with_report(&req.form, &req.extracted, &req.touched);
    Json(json!({ "form": form, "report": report }))
}
