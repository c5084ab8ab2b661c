//! Mapping of domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use forestclaim_autofill::{AutofillError, SessionError};
use forestclaim_core::ClaimError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("form not found: {0}")]
    FormNotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Autofill(#[from] AutofillError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::FormNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Autofill(_) => StatusCode::BAD_REQUEST,
            Self::Claim(ClaimError::MissingDocuments(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Claim(ClaimError::Other(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Claim(_) => StatusCode::BAD_REQUEST,
            Self::Session(SessionError::Busy) => StatusCode::CONFLICT,
            Self::Session(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut body = json!({ "error": self.to_string() });
        if let Self::Claim(ClaimError::MissingDocuments(missing)) = &self {
            body["missing"] = json!(missing);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestclaim_core::{AttachmentSlot, FieldKey};

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::FormNotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(AutofillError::EmptyText).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(SessionError::Busy).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(ClaimError::InvalidValue {
                field: FieldKey::Age,
                value: "old".into()
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ClaimError::MissingDocuments(vec![AttachmentSlot::FraFormA])).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
