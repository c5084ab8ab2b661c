//! Main HTTP Gateway Router.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use forestclaim_understanding::RecognitionAdapter;

use crate::session_registry::SessionRegistry;
use crate::{attachments, extract_api, forms_api, health_api, ocr_api};

/// Largest accepted multipart body (scanned page or attachment).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across routes.
pub struct GatewayState {
    pub registry: SessionRegistry,
}

impl GatewayState {
    pub fn new(adapter: RecognitionAdapter) -> Self {
        Self {
            registry: SessionRegistry::new(Arc::new(adapter)),
        }
    }
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/api/health", get(health_api::health))
        .route("/api/extract", post(extract_api::extract))
        .route("/api/merge", post(extract_api::merge))
        .route("/api/forms", post(forms_api::create_form))
        .route("/api/forms/:id", get(forms_api::get_form).delete(forms_api::delete_form))
        .route("/api/forms/:id/fields", patch(forms_api::edit_fields))
        .route("/api/forms/:id/autofill", post(forms_api::autofill_text))
        .route("/api/forms/:id/reset", post(forms_api::reset_form))
        .route("/api/forms/:id/submission", post(forms_api::submit_form))
        .route(
            "/api/forms/:id/attachments/:slot",
            post(attachments::attach).delete(attachments::detach),
        )
        .route("/api/forms/:id/ocr", post(ocr_api::start_ocr).get(ocr_api::ocr_status))
        .route("/api/forms/:id/ocr/events", get(ocr_api::ocr_events))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
