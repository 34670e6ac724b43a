// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Signing Workflow
//!
//! The three-step document-signing sequence:
//!
//! 1. **upload** - create a draft template with two signer positions
//! 2. **submit** - send the document for ordered signing by role 1 and role 2
//!    and start tracking it in the registry
//! 3. **update role 3** - once role 2 has signed, re-send the full signer list
//!    with the third signer attached
//!
//! Provider calls always happen before registry writes, so a failed call
//! never leaves the registry ahead of the provider. Steps touching the same
//! document are serialized through [`DocumentLocks`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::document_locks::DocumentLocks;
use crate::application::error::WorkflowError;
use crate::domain::document::{DocumentId, DocumentRecord};
use crate::domain::provider::{DraftTemplate, DraftTemplateRequest, ESignProvider, SigningRequest};
use crate::domain::repository::{DocumentRegistry, RegistryError};
use crate::domain::signer::SignerLayouts;

#[async_trait]
pub trait SigningWorkflow: Send + Sync {
    /// Create a draft template from a base64-encoded PDF
    async fn upload(&self, request: UploadRequest) -> Result<DraftTemplate, WorkflowError>;

    /// Submit a document for ordered signing by role 1 then role 2
    async fn submit(
        &self,
        document_id: &str,
        role1_email: &str,
        role2_email: &str,
    ) -> Result<Value, WorkflowError>;

    /// Attach the third signer to a submitted document
    async fn update_role3_email(
        &self,
        document_id: &str,
        role3_email: &str,
    ) -> Result<Value, WorkflowError>;

    /// Fetch the provider's signing URL payload
    async fn get_sign_url(&self, document_id: &str) -> Result<Value, WorkflowError>;

    async fn get_document(&self, document_id: &str) -> Result<DocumentRecord, WorkflowError>;

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, WorkflowError>;
}

/// Input for the upload step
#[derive(Clone)]
pub struct UploadRequest {
    /// Base64-encoded PDF bytes
    pub file: String,
    pub filename: String,
    pub role1_email: String,
    pub title: String,
    pub description: String,
    pub note: String,
}

pub struct StandardSigningWorkflow {
    provider: Arc<dyn ESignProvider>,
    registry: Arc<dyn DocumentRegistry>,
    signers: SignerLayouts,
    locks: DocumentLocks,
}

impl StandardSigningWorkflow {
    pub fn new(
        provider: Arc<dyn ESignProvider>,
        registry: Arc<dyn DocumentRegistry>,
        signers: SignerLayouts,
    ) -> Self {
        Self {
            provider,
            registry,
            signers,
            locks: DocumentLocks::new(),
        }
    }
}

fn present(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[async_trait]
impl SigningWorkflow for StandardSigningWorkflow {
    async fn upload(&self, request: UploadRequest) -> Result<DraftTemplate, WorkflowError> {
        let (Some(role1_email), Some(title)) = (present(&request.role1_email), present(&request.title))
        else {
            return Err(WorkflowError::validation("Role1 email and title are required"));
        };
        if request.file.is_empty() {
            return Err(WorkflowError::validation("File is required and must be a valid PDF"));
        }

        let draft = DraftTemplateRequest {
            signers: vec![
                self.signers.role1.signer(Some(role1_email.to_string())),
                self.signers.role2.signer(None),
            ],
            title: title.to_string(),
            filename: request.filename,
            description: request.description,
            note: request.note,
            file: request.file,
            send_in_order: true,
        };

        let template = self.provider.create_draft_template(&draft).await?;

        info!(
            template_id = %template.template_id,
            title = %draft.title,
            "Draft template created"
        );

        Ok(template)
    }

    async fn submit(
        &self,
        document_id: &str,
        role1_email: &str,
        role2_email: &str,
    ) -> Result<Value, WorkflowError> {
        let (Some(document_id), Some(role1_email), Some(role2_email)) =
            (present(document_id), present(role1_email), present(role2_email))
        else {
            return Err(WorkflowError::validation(
                "documentId, role1Email, and role2Email are required",
            ));
        };
        let id = DocumentId::new(document_id);

        let _lock = self.locks.acquire(&id).await;

        if self.registry.find(&id).await?.is_some() {
            return Err(WorkflowError::Conflict(id));
        }

        let request = SigningRequest {
            document_id: id.to_string(),
            signers: vec![
                self.signers.role1.signature_signer(role1_email),
                self.signers.role2.signature_signer(role2_email),
            ],
            send_in_order: true,
        };

        let payload = self.provider.submit_for_signing(&request).await.map_err(|e| {
            warn!(document_id = %id, error = %e, "Submit for signing failed");
            WorkflowError::Upstream(e)
        })?;

        self.registry
            .insert(DocumentRecord::submitted(id.clone(), role1_email, role2_email))
            .await
            .map_err(|e| match e {
                RegistryError::AlreadyExists(id) => WorkflowError::Conflict(id),
                other => WorkflowError::Registry(other),
            })?;

        info!(document_id = %id, "Document submitted for signing");

        Ok(payload)
    }

    async fn update_role3_email(
        &self,
        document_id: &str,
        role3_email: &str,
    ) -> Result<Value, WorkflowError> {
        let (Some(document_id), Some(role3_email)) = (present(document_id), present(role3_email))
        else {
            return Err(WorkflowError::validation("documentId and role3Email are required"));
        };
        let id = DocumentId::new(document_id);

        let _lock = self.locks.acquire(&id).await;

        let Some(mut record) = self.registry.find(&id).await? else {
            return Err(WorkflowError::NotFound(id));
        };

        let request = SigningRequest {
            document_id: id.to_string(),
            signers: vec![
                self.signers.role1.bare_signer(record.role1_email.as_str()),
                self.signers.role2.bare_signer(record.role2_email.as_str()),
                self.signers.role3.signature_signer(role3_email),
            ],
            send_in_order: true,
        };

        let payload = self.provider.update_signers(&request).await.map_err(|e| {
            warn!(document_id = %id, error = %e, "Role 3 signer update failed");
            WorkflowError::Upstream(e)
        })?;

        if let Some(previous) = record.role3_email() {
            info!(document_id = %id, previous = %previous, "Replacing role 3 signer");
        }
        record.assign_role3(role3_email);
        self.registry.save(record).await?;

        info!(document_id = %id, "Role 3 signer attached");

        Ok(payload)
    }

    async fn get_sign_url(&self, document_id: &str) -> Result<Value, WorkflowError> {
        let Some(document_id) = present(document_id) else {
            return Err(WorkflowError::validation("documentId is required"));
        };
        Ok(self.provider.fetch_sign_url(document_id).await?)
    }

    async fn get_document(&self, document_id: &str) -> Result<DocumentRecord, WorkflowError> {
        let Some(document_id) = present(document_id) else {
            return Err(WorkflowError::validation("documentId is required"));
        };
        let id = DocumentId::new(document_id);
        self.registry
            .find(&id)
            .await?
            .ok_or(WorkflowError::NotFound(id))
    }

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, WorkflowError> {
        Ok(self.registry.list_all().await?)
    }
}
