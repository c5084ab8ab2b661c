//! OCR endpoints: start a recognition run for a form, read its state, or
//! follow it as server-sent events.
//!
//! A run is accepted with `202` and finishes on a background task. On
//! success the recognized text is extracted and merged into the form.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use forestclaim_autofill::{RunTicket, SessionError, SessionState};
use forestclaim_logging::{ClaimEvent, EventLogger};
use forestclaim_understanding::{extract_fields, ImagePayload};
use serde_json::{json, Value};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

use crate::error::ApiError;
use crate::forms_api::{autofilled_event, lookup};
use crate::server::GatewayState;
use crate::session_registry::{FormEntry, FormId};
use crate::upload::read_upload;

/// `POST /api/forms/:id/ocr` with multipart `file` and optional `lang`.
pub async fn start_ocr(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let entry = lookup(&state, &id).await?;
    let (image, lang) = read_upload(&mut multipart).await?.require_file()?;

    let ticket = entry.session.start()?;
    let ocr = entry.session.snapshot();
    tokio::spawn(run_ocr(id.clone(), entry, ticket, image, lang));

    Ok((StatusCode::ACCEPTED, Json(json!({ "id": id, "ocr": ocr }))))
}

/// `GET /api/forms/:id/ocr`
pub async fn ocr_status(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionState>, ApiError> {
    let entry = lookup(&state, &id).await?;
    Ok(Json(entry.session.snapshot()))
}

/// `GET /api/forms/:id/ocr/events`: the current state, then every change.
pub async fn ocr_events(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let entry = lookup(&state, &id).await?;
    let stream = WatchStream::new(entry.session.subscribe()).map(|state| {
        Ok(Event::default()
            .event("ocr")
            .json_data(&state)
            .unwrap_or_else(|e| Event::default().comment(format!("unserializable state: {e}"))))
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

async fn run_ocr(
    form_id: FormId,
    entry: Arc<FormEntry>,
    ticket: RunTicket,
    image: ImagePayload,
    lang: Option<String>,
) {
    let result = match entry.session.complete(ticket, &image, lang.as_deref()).await {
        Ok(result) => result,
        Err(SessionError::Discarded) => return,
        Err(e) => {
            EventLogger::log_event(&form_id, ClaimEvent::RecognitionFailed { error_msg: e.to_string() });
            return;
        }
    };
    EventLogger::log_event(
        &form_id,
        ClaimEvent::Recognized {
            engine: result.engine.clone(),
            elapsed_ms: result.elapsed_ms,
            confidence: result.confidence,
            preview: ClaimEvent::preview(&result.raw_text),
        },
    );

    let extracted = extract_fields(&result.raw_text);
    let mut form = entry.form.lock().await;
    // A reset between publishing the result and taking the form lock
    // replaces the Succeeded state.
    if !matches!(entry.session.snapshot(), SessionState::Succeeded(ref held) if *held == result) {
        debug!(form_id = %form_id, "form reset before autofill; result dropped");
        return;
    }
    let report = form.apply_extracted(&extracted);
    drop(form);
    EventLogger::log_event(&form_id, autofilled_event("ocr", &report));
}
