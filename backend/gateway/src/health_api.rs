//! Gateway Health API

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::server::GatewayState;

/// Handler for `GET /api/health`
pub async fn health(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    let adapter = state.registry.adapter();
    Json(json!({
        "status": "ok",
        "service": "forestclaim",
        "version": env!("CARGO_PKG_VERSION"),
        "engine": adapter.engine(),
        "defaultLanguage": adapter.default_language(),
        "forms": state.registry.len().await,
    }))
}

#[cfg(test)]
mod tests {
    use crate::testing::{empty, send, state};
    use axum::http::StatusCode;
    use forestclaim_understanding::MockRecognizer;

    #[tokio::test]
    async fn reports_engine_and_form_count() {
        let state = state(MockRecognizer::new());
        crate::testing::create_form(&state).await;

        let (status, body) = send(&state, empty("GET", "/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["engine"], "mock");
        assert_eq!(body["defaultLanguage"], "eng");
        assert_eq!(body["forms"], 1);
    }
}
