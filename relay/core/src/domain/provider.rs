// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider
//!
//! Domain interface for the remote e-signature provider (Anti-Corruption
//! Layer). The workflow only sees these request/response types; the
//! OpenSign Labs wire details live in `crate::infrastructure::opensign`.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Provider port and its error type

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::signer::Signer;

/// Domain interface for e-signature providers.
///
/// Implementations are stateless request/response mappers: one attempt per
/// call, no caching.
#[async_trait]
pub trait ESignProvider: Send + Sync {
    /// Create a draft template from an uploaded PDF
    async fn create_draft_template(
        &self,
        request: &DraftTemplateRequest,
    ) -> Result<DraftTemplate, ProviderError>;

    /// Submit a document for ordered signing
    async fn submit_for_signing(
        &self,
        request: &SigningRequest,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Replace the signer list of a submitted document
    async fn update_signers(
        &self,
        request: &SigningRequest,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Fetch the signing URL payload for a document
    async fn fetch_sign_url(&self, document_id: &str) -> Result<serde_json::Value, ProviderError>;
}

/// Draft template creation request
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTemplateRequest {
    /// Base64-encoded PDF bytes
    pub file: String,
    pub filename: String,
    pub title: String,
    pub description: String,
    pub note: String,
    pub signers: Vec<Signer>,
    pub send_in_order: bool,
}

// Keeps the base64 payload out of logs.
impl std::fmt::Debug for DraftTemplateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftTemplateRequest")
            .field("file", &format_args!("<{} base64 chars>", self.file.len()))
            .field("filename", &self.filename)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("note", &self.note)
            .field("signers", &self.signers)
            .field("send_in_order", &self.send_in_order)
            .finish()
    }
}

/// Signing request for submit and signer updates
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub document_id: String,
    /// Signers in signing order
    pub signers: Vec<Signer>,
    /// Later signers are blocked until earlier ones complete
    pub send_in_order: bool,
}

/// Identifiers returned for a freshly created draft template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftTemplate {
    pub template_id: String,
    pub edit_url: String,
}

/// Errors that can occur during provider calls
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Error payload returned by the provider, when there was one
    pub fn provider_payload(&self) -> Option<&str> {
        match self {
            ProviderError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}
