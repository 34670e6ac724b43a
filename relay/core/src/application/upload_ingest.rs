// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Upload Ingest
//!
//! Turns a staged multipart upload into a draft-template request. The staged
//! file is owned by [`StagedAttachment`] and removed from disk when it drops,
//! whichever way ingest returns.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::application::error::WorkflowError;
use crate::application::signing_workflow::{SigningWorkflow, UploadRequest};
use crate::domain::provider::DraftTemplate;

const PDF_MIME: &str = "application/pdf";

const MISSING_FILE: &str = "File is required and must be a valid PDF";
const MISSING_FIELDS: &str = "Role1 email and title are required";
const NOT_PDF: &str = "Only PDF files are allowed";

/// A file received from a client and written to the upload directory
pub struct StagedAttachment {
    filename: String,
    content_type: Option<String>,
    file: NamedTempFile,
}

impl StagedAttachment {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, file: NamedTempFile) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            file,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn declares_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(PDF_MIME))
    }
}

/// Fields collected from an upload form
#[derive(Default)]
pub struct UploadForm {
    pub attachment: Option<StagedAttachment>,
    pub title: Option<String>,
    pub role1_email: Option<String>,
    pub description: Option<String>,
    pub note: Option<String>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub struct UploadIngest {
    workflow: Arc<dyn SigningWorkflow>,
}

impl UploadIngest {
    pub fn new(workflow: Arc<dyn SigningWorkflow>) -> Self {
        Self { workflow }
    }

    /// Validate the form, encode the staged PDF and create the draft template.
    pub async fn ingest(&self, form: UploadForm) -> Result<DraftTemplate, WorkflowError> {
        let result = self.ingest_inner(form).await;
        let outcome = match &result {
            Ok(_) => "created",
            Err(WorkflowError::Validation(_)) => "rejected",
            Err(_) => "failed",
        };
        metrics::counter!("esign_uploads_total", "outcome" => outcome).increment(1);
        result
    }

    async fn ingest_inner(&self, form: UploadForm) -> Result<DraftTemplate, WorkflowError> {
        let UploadForm {
            attachment,
            title,
            role1_email,
            description,
            note,
        } = form;

        let Some(attachment) = attachment else {
            return Err(WorkflowError::validation(MISSING_FILE));
        };
        if !filled(&role1_email) || !filled(&title) {
            return Err(WorkflowError::validation(MISSING_FIELDS));
        }
        if !attachment.declares_pdf() {
            warn!(
                filename = %attachment.filename(),
                content_type = ?attachment.content_type(),
                "Rejected non-PDF upload"
            );
            return Err(WorkflowError::validation(NOT_PDF));
        }

        let bytes = tokio::fs::read(attachment.path()).await.map_err(|e| {
            WorkflowError::Processing(format!(
                "Failed to read staged upload {}: {}",
                attachment.path().display(),
                e
            ))
        })?;

        if bytes.is_empty() {
            return Err(WorkflowError::validation(MISSING_FILE));
        }
        if let Some(kind) = infer::get(&bytes) {
            if kind.mime_type() != PDF_MIME {
                warn!(
                    filename = %attachment.filename(),
                    detected = kind.mime_type(),
                    "Upload content does not match declared PDF type"
                );
                return Err(WorkflowError::validation(NOT_PDF));
            }
        }

        debug!(
            filename = %attachment.filename(),
            size = bytes.len(),
            "Encoding staged upload"
        );

        let request = UploadRequest {
            file: STANDARD.encode(&bytes),
            filename: attachment.filename().to_string(),
            role1_email: role1_email.unwrap_or_default(),
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            note: note.unwrap_or_default(),
        };
        drop(attachment);

        self.workflow.upload(request).await.map_err(|e| match e {
            WorkflowError::Upstream(provider) => {
                warn!(
                    error = %provider,
                    provider_payload = provider.provider_payload().unwrap_or_default(),
                    "Draft template creation failed"
                );
                WorkflowError::Processing(format!("Draft template creation failed: {}", provider))
            }
            other => other,
        })
    }
}
