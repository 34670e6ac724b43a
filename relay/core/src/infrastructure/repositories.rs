// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Registry Implementations
//!
//! Infrastructure implementations of the `DocumentRegistry` abstraction
//! defined in the domain layer.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve document records
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! ## In-Memory Registry
//!
//! - **InMemoryDocumentRegistry** - Thread-safe HashMap-backed storage that
//!   lives as long as the process. The lock is never held across an await.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::document::{DocumentId, DocumentRecord};
use crate::domain::repository::{DocumentRegistry, RegistryError};

#[derive(Clone, Default)]
pub struct InMemoryDocumentRegistry {
    documents: Arc<RwLock<HashMap<DocumentId, DocumentRecord>>>,
}

impl InMemoryDocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRegistry for InMemoryDocumentRegistry {
    async fn insert(&self, record: DocumentRecord) -> Result<(), RegistryError> {
        let mut documents = self.documents.write();
        if documents.contains_key(&record.document_id) {
            return Err(RegistryError::AlreadyExists(record.document_id));
        }
        documents.insert(record.document_id.clone(), record);
        Ok(())
    }

    async fn save(&self, record: DocumentRecord) -> Result<(), RegistryError> {
        let mut documents = self.documents.write();
        match documents.get_mut(&record.document_id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RegistryError::NotFound(record.document_id)),
        }
    }

    async fn find(&self, id: &DocumentId) -> Result<Option<DocumentRecord>, RegistryError> {
        let documents = self.documents.read();
        Ok(documents.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<DocumentRecord>, RegistryError> {
        let documents = self.documents.read();
        let mut records: Vec<DocumentRecord> = documents.values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.document_id.as_str().cmp(b.document_id.as_str()))
        });
        Ok(records)
    }
}
