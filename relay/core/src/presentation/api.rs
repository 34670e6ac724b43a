// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, Path, State,
    },
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::application::signing_workflow::SigningWorkflow;
use crate::application::upload_ingest::UploadIngest;
use crate::domain::document::DocumentRecord;
use crate::presentation::error::ApiError;
use crate::presentation::upload::read_upload_form;

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<dyn SigningWorkflow>,
    pub ingest: Arc<UploadIngest>,
    /// Directory receiving staged multipart uploads
    pub upload_dir: PathBuf,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(workflow: Arc<dyn SigningWorkflow>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            ingest: Arc::new(UploadIngest::new(workflow.clone())),
            workflow,
            upload_dir: upload_dir.into(),
            start_time: Instant::now(),
        }
    }
}

pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/esign/upload", post(upload_handler))
        .route("/esign/submit", post(submit_handler))
        .route("/esign/update-role3", put(update_role3_handler))
        .route("/esign/sign-url/{document_id}", get(sign_url_handler))
        .route("/esign/documents", get(list_documents_handler))
        .route("/esign/documents/{document_id}", get(get_document_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub role1_email: String,
    #[serde(default)]
    pub role2_email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole3Request {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub role3_email: String,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let form = read_upload_form(&state.upload_dir, multipart?).await?;
    let template = state.ingest.ingest(form).await?;

    Ok(Json(json!({
        "message": "Template created successfully",
        "template_id": template.template_id,
        "url": template.edit_url,
    })))
}

async fn submit_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let response = state
        .workflow
        .submit(&request.document_id, &request.role1_email, &request.role2_email)
        .await?;
    Ok(Json(response))
}

async fn update_role3_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateRole3Request>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let response = state
        .workflow
        .update_role3_email(&request.document_id, &request.role3_email)
        .await?;
    Ok(Json(response))
}

async fn sign_url_handler(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.workflow.get_sign_url(&document_id).await?))
}

async fn list_documents_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    Ok(Json(state.workflow.list_documents().await?))
}

async fn get_document_handler(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
) -> Result<Json<DocumentRecord>, ApiError> {
    Ok(Json(state.workflow.get_document(&document_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::signing_workflow::StandardSigningWorkflow;
    use crate::application::test_support::RecordingProvider;
    use crate::domain::signer::SignerLayouts;
    use crate::infrastructure::repositories::InMemoryDocumentRegistry;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn router() -> (Router, Arc<RecordingProvider>, tempfile::TempDir) {
        router_with_limit(1024 * 1024)
    }

    fn router_with_limit(
        max_upload_bytes: usize,
    ) -> (Router, Arc<RecordingProvider>, tempfile::TempDir) {
        let provider = Arc::new(RecordingProvider::new());
        let workflow = Arc::new(StandardSigningWorkflow::new(
            provider.clone(),
            Arc::new(InMemoryDocumentRegistry::new()),
            SignerLayouts::default(),
        ));
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(workflow, dir.path());
        (app(state, max_upload_bytes), provider, dir)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _dir) = router();

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_submit_missing_role2_is_bad_request() {
        let (app, provider, _dir) = router();

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/esign/submit",
                json!({"documentId": "T1", "role1Email": "a@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "documentId, role1Email, and role2Email are required"
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _, _dir) = router();

        let response = app
            .oneshot(
                Request::post("/esign/submit")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_unknown_document_is_not_found() {
        let (app, provider, _dir) = router();

        let response = app
            .oneshot(json_request(
                Method::PUT,
                "/esign/update-role3",
                json!({"documentId": "nope", "role3Email": "c@x.com"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Document not found");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_submit_is_conflict() {
        let (app, _, _dir) = router();
        let body = json!({"documentId": "T1", "role1Email": "a@x.com", "role2Email": "b@x.com"});

        let first = app
            .clone()
            .oneshot(json_request(Method::POST, "/esign/submit", body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(json_request(Method::POST, "/esign/submit", body))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let (app, provider, _dir) = router();
        provider.fail_calls(true);

        let response = app
            .oneshot(Request::get("/esign/sign-url/T1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(!body["error"].as_str().unwrap().contains("provider unavailable"));
    }

    #[tokio::test]
    async fn test_upload_without_multipart_is_bad_request() {
        let (app, provider, _dir) = router();

        let response = app
            .oneshot(json_request(Method::POST, "/esign/upload", json!({"title": "x"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_and_not_kept() {
        let (app, provider, dir) = router_with_limit(4096);

        let mut body = Vec::new();
        body.extend_from_slice(
            b"--limit\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nOffer Letter\r\n",
        );
        body.extend_from_slice(
            b"--limit\r\nContent-Disposition: form-data; name=\"file\"; filename=\"offer.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.4\n",
        );
        body.extend(std::iter::repeat(b'0').take(16 * 1024));
        body.extend_from_slice(b"\r\n--limit--\r\n");

        let response = app
            .oneshot(
                Request::post("/esign/upload")
                    .header(header::CONTENT_TYPE, "multipart/form-data; boundary=limit")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_json(response).await["error"].is_string());
        assert_eq!(provider.call_count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_document_lookup() {
        let (app, _, _dir) = router();

        let submit = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/esign/submit",
                json!({"documentId": "T1", "role1Email": "a@x.com", "role2Email": "b@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(submit.status(), StatusCode::OK);

        let found = app
            .clone()
            .oneshot(Request::get("/esign/documents/T1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        let record = body_json(found).await;
        assert_eq!(record["role1Email"], "a@x.com");
        assert_eq!(record["status"], "submitted");

        let missing = app
            .oneshot(Request::get("/esign/documents/T9").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
