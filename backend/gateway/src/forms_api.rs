//! Claim form endpoints: create, edit, autofill from pasted text, reset and
//! submit.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use forestclaim_autofill::MergeReport;
use forestclaim_core::{ClaimSubmission, FieldKey};
use forestclaim_logging::{ClaimEvent, EventLogger};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::extract_api::TextRequest;
use crate::server::GatewayState;
use crate::session_registry::FormEntry;

/// User ID recorded on submissions that don't name one.
pub const GUEST_USER_ID: &str = "public-guest";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub user_id: Option<String>,
}

pub(crate) async fn lookup(state: &GatewayState, id: &str) -> Result<Arc<FormEntry>, ApiError> {
    state
        .registry
        .get(id)
        .await
        .ok_or_else(|| ApiError::FormNotFound(id.to_string()))
}

/// JSON view of a form: values, touched set and OCR state.
pub(crate) async fn form_view(id: &str, entry: &FormEntry) -> Value {
    let form = entry.form.lock().await;
    json!({
        "id": id,
        "form": form.state(),
        "touched": form.touched(),
        "ocr": entry.session.snapshot(),
    })
}

pub(crate) fn autofilled_event(source: &str, report: &MergeReport) -> ClaimEvent {
    let names = |keys: &[FieldKey]| keys.iter().map(|k| k.to_string()).collect();
    ClaimEvent::Autofilled {
        source: source.to_string(),
        applied: names(&report.applied),
        skipped: names(&report.skipped_touched),
    }
}

/// `POST /api/forms`
pub async fn create_form(
    State(state): State<Arc<GatewayState>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = state.registry.create().await;
    let entry = lookup(&state, &id).await?;
    Ok((StatusCode::CREATED, Json(form_view(&id, &entry).await)))
}

/// `GET /api/forms/:id`
pub async fn get_form(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &id).await?;
    Ok(Json(form_view(&id, &entry).await))
}

/// `DELETE /api/forms/:id`
pub async fn delete_form(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.registry.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::FormNotFound(id))
    }
}

/// `PATCH /api/forms/:id/fields` with a `{ "field": "value" }` map.
///
/// Every edit marks its field touched. The batch is applied all-or-nothing.
pub async fn edit_fields(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    Json(edits): Json<BTreeMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &id).await?;
    let edits = edits
        .into_iter()
        .map(|(name, value)| name.parse::<FieldKey>().map(|key| (key, value)))
        .collect::<Result<Vec<_>, _>>()?;

    {
        let mut form = entry.form.lock().await;
        let mut next = form.clone();
        for (key, value) in &edits {
            next.edit(*key, value)?;
        }
        *form = next;
    }
    Ok(Json(form_view(&id, &entry).await))
}

/// `POST /api/forms/:id/autofill` with pasted document text.
pub async fn autofill_text(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    Json(req): Json<TextRequest>,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &id).await?;
    let report = entry.form.lock().await.autofill_from_text(&req.text)?;
    EventLogger::log_event(&id, autofilled_event("text", &report));

    let mut view = form_view(&id, &entry).await;
    view["report"] = json!(report);
    Ok(Json(view))
}

/// `POST /api/forms/:id/reset`
pub async fn reset_form(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &id).await?;
    {
        // Hold the form while resetting the session so a finishing run
        // cannot autofill in between.
        let mut form = entry.form.lock().await;
        form.reset();
        entry.session.reset();
    }
    info!(form_id = %id, "form reset");
    Ok(Json(form_view(&id, &entry).await))
}

/// `POST /api/forms/:id/submission`
pub async fn submit_form(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    body: Option<Json<SubmitRequest>>,
) -> Result<Json<ClaimSubmission>, ApiError> {
    let entry = lookup(&state, &id).await?;
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let user_id = req
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(GUEST_USER_ID);

    let submission = {
        let mut form = entry.form.lock().await;
        let submission = form.submit(user_id, chrono::Local::now().date_naive())?;
        entry.session.reset();
        submission
    };
    EventLogger::log_event(
        &id,
        ClaimEvent::Submitted {
            ack_id: submission.ack_id.clone(),
        },
    );
    Ok(Json(submission))
}
