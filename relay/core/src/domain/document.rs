// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Document
//!
//! The document record tracked between the submit and role-3 update steps.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Document aggregate and its signing status
//!
//! A record is only ever built from a successful submission, so the first two
//! signer emails are always present before a third can be attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned document (template) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a document sits in the upload → submit → update-role3 sequence.
///
/// `Created` only exists for the duration of an upload call and is never
/// stored, so records start out `Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Role 1 and role 2 are on an ordered signing request
    Submitted,
    /// Role 3 has been attached and forwarded to the provider
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub document_id: DocumentId,
    pub role1_email: String,
    pub role2_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    role3_email: Option<String>,
    status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Record a document that the provider accepted for signing.
    pub fn submitted(
        document_id: DocumentId,
        role1_email: impl Into<String>,
        role2_email: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            document_id,
            role1_email: role1_email.into(),
            role2_email: role2_email.into(),
            role3_email: None,
            status: DocumentStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role3_email(&self) -> Option<&str> {
        self.role3_email.as_deref()
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    /// True while the document waits for its third signer.
    pub fn awaiting_role3(&self) -> bool {
        self.status == DocumentStatus::Submitted && self.role3_email.is_none()
    }

    /// Attach (or replace) the third signer's email.
    pub fn assign_role3(&mut self, email: impl Into<String>) {
        self.role3_email = Some(email.into());
        self.status = DocumentStatus::Updated;
        self.updated_at = Utc::now();
    }
}
