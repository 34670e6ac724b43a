// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Document Registry Interface
//!
//! Persistence contract for the `DocumentRecord` aggregate, following the DDD
//! Repository pattern: the interface lives in the domain layer and is
//! implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `DocumentRegistry` | `DocumentRecord` | `InMemoryDocumentRegistry` |
//!
//! The in-memory registry only lives as long as the process. Deployments with
//! more than one relay instance need an implementation backed by an external
//! key-value store.

use async_trait::async_trait;

use crate::domain::document::{DocumentId, DocumentRecord};

/// Repository interface for DocumentRecord aggregates
#[async_trait]
pub trait DocumentRegistry: Send + Sync {
    /// Insert a new record; fails if the id is already registered
    async fn insert(&self, record: DocumentRecord) -> Result<(), RegistryError>;

    /// Replace an existing record; fails if the id is unknown
    async fn save(&self, record: DocumentRecord) -> Result<(), RegistryError>;

    /// Find record by document ID
    async fn find(&self, id: &DocumentId) -> Result<Option<DocumentRecord>, RegistryError>;

    /// List all records, oldest first
    async fn list_all(&self) -> Result<Vec<DocumentRecord>, RegistryError>;
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Document already registered: {0}")]
    AlreadyExists(DocumentId),
}
