// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::application::error::WorkflowError;

/// An HTTP error response with a `{ "error": "<message>" }` body.
///
/// Client errors carry their validation message. Server-side failures carry a
/// generic message and are logged with full detail instead.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(message) => Self::bad_request(message),
            WorkflowError::NotFound(id) => {
                debug!(document_id = %id, "Document not found");
                Self::new(StatusCode::NOT_FOUND, "Document not found")
            }
            WorkflowError::Conflict(id) => Self::new(
                StatusCode::CONFLICT,
                format!("Document {} has already been submitted", id),
            ),
            WorkflowError::Upstream(e) => {
                error!(
                    error = %e,
                    provider_payload = e.provider_payload().unwrap_or_default(),
                    "E-sign provider request failed"
                );
                Self::new(StatusCode::BAD_GATEWAY, "E-sign provider request failed")
            }
            WorkflowError::Processing(detail) => {
                error!(error = %detail, "Upload processing failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process and upload file",
                )
            }
            WorkflowError::Registry(e) => {
                error!(error = %e, "Document registry failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::DocumentId;
    use crate::domain::provider::ProviderError;

    #[test]
    fn test_workflow_error_status_mapping() {
        let cases = [
            (WorkflowError::validation("bad"), StatusCode::BAD_REQUEST),
            (WorkflowError::NotFound(DocumentId::new("T1")), StatusCode::NOT_FOUND),
            (WorkflowError::Conflict(DocumentId::new("T1")), StatusCode::CONFLICT),
            (
                WorkflowError::Upstream(ProviderError::Timeout),
                StatusCode::BAD_GATEWAY,
            ),
            (
                WorkflowError::Processing("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_upstream_details_are_not_exposed() {
        let err = ApiError::from(WorkflowError::Upstream(ProviderError::Status {
            status: 401,
            body: "invalid api token sk-123".to_string(),
        }));

        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(!err.message().contains("sk-123"));
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::from(WorkflowError::NotFound(DocumentId::new("missing")));
        assert_eq!(err.message(), "Document not found");
    }
}
