// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod document_locks;
pub mod error;
pub mod signing_workflow;
pub mod upload_ingest;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export use cases for convenience
pub use error::WorkflowError;
pub use signing_workflow::{SigningWorkflow, StandardSigningWorkflow, UploadRequest};
pub use upload_ingest::{StagedAttachment, UploadForm, UploadIngest};
