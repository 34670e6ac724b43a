// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::document::DocumentId;
use crate::domain::provider::ProviderError;
use crate::domain::repository::RegistryError;

/// Errors surfaced by the signing workflow and upload ingest.
///
/// Callers branch on the variant; the presentation layer maps each one to an
/// HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Missing or malformed caller input
    #[error("{0}")]
    Validation(String),

    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Document already submitted: {0}")]
    Conflict(DocumentId),

    /// Provider call failed or returned a malformed payload
    #[error("Upstream provider error: {0}")]
    Upstream(#[from] ProviderError),

    /// Local failure while handling an uploaded attachment
    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation(message.into())
    }
}
