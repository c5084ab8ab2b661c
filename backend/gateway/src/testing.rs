//! Request helpers for router tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use forestclaim_understanding::{MockRecognizer, RecognitionAdapter};
use serde_json::Value;
use tower::ServiceExt;

use crate::server::{build_router, GatewayState};

const BOUNDARY: &str = "forestclaim-test-boundary";

pub fn state(recognizer: MockRecognizer) -> Arc<GatewayState> {
    let adapter = RecognitionAdapter::new(Arc::new(recognizer), "eng");
    Arc::new(GatewayState::new(adapter))
}

pub async fn send(state: &Arc<GatewayState>, req: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(state.clone()).oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn multipart_request(uri: &str, file: Option<(&str, &str)>, lang: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    if let Some((name, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(lang) = lang {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"lang\"\r\n\r\n{lang}\r\n").as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

pub async fn create_form(state: &Arc<GatewayState>) -> String {
    let (_, body) = send(state, empty("POST", "/api/forms")).await;
    body["id"].as_str().unwrap().to_string()
}
