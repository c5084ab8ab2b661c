//! Mandatory document attachments.
//!
//! Only file metadata is kept on the form; the bytes are dropped once the
//! upload has been measured.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use forestclaim_core::{AttachmentRef, AttachmentSlot};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::forms_api::{form_view, lookup};
use crate::server::GatewayState;
use crate::upload::read_upload;

/// `POST /api/forms/:id/attachments/:slot` with a multipart `file` part.
pub async fn attach(
    State(state): State<Arc<GatewayState>>,
    Path((id, slot)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &id).await?;
    let slot: AttachmentSlot = slot.parse()?;
    let (file, _) = read_upload(&mut multipart).await?.require_file()?;

    let attachment = AttachmentRef {
        file_name: file.file_name,
        content_type: file.content_type,
        size_bytes: file.bytes.len() as u64,
    };
    info!(
        form_id = %id,
        slot = slot.as_str(),
        file = %attachment.file_name,
        size_bytes = attachment.size_bytes,
        "attachment selected"
    );
    entry.form.lock().await.attach(slot, Some(attachment));
    Ok(Json(form_view(&id, &entry).await))
}

/// `DELETE /api/forms/:id/attachments/:slot`
pub async fn detach(
    State(state): State<Arc<GatewayState>>,
    Path((id, slot)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let entry = lookup(&state, &id).await?;
    let slot: AttachmentSlot = slot.parse()?;
    entry.form.lock().await.attach(slot, None);
    Ok(Json(form_view(&id, &entry).await))
}
