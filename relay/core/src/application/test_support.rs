// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-process provider double shared by the application tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::provider::{
    DraftTemplate, DraftTemplateRequest, ESignProvider, ProviderError, SigningRequest,
};

#[derive(Debug, Clone)]
pub enum ProviderCall {
    DraftTemplate(DraftTemplateRequest),
    Submit(SigningRequest),
    UpdateSigners(SigningRequest),
    SignUrl(String),
}

/// Records every call and answers with canned payloads
#[derive(Default)]
pub struct RecordingProvider {
    calls: Mutex<Vec<ProviderCall>>,
    failing: AtomicBool,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with HTTP 500
    pub fn fail_calls(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: ProviderCall) -> Result<usize, ProviderError> {
        let mut calls = self.calls.lock();
        calls.push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 500,
                body: r#"{"error":"provider unavailable"}"#.to_string(),
            });
        }
        Ok(calls.len())
    }
}

#[async_trait]
impl ESignProvider for RecordingProvider {
    async fn create_draft_template(
        &self,
        request: &DraftTemplateRequest,
    ) -> Result<DraftTemplate, ProviderError> {
        self.record(ProviderCall::DraftTemplate(request.clone()))?;
        Ok(DraftTemplate {
            template_id: "T1".to_string(),
            edit_url: "https://sign/edit/T1".to_string(),
        })
    }

    async fn submit_for_signing(&self, request: &SigningRequest) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Submit(request.clone()))?;
        Ok(json!({"status": "sent", "documentId": request.document_id}))
    }

    async fn update_signers(&self, request: &SigningRequest) -> Result<Value, ProviderError> {
        self.record(ProviderCall::UpdateSigners(request.clone()))?;
        Ok(json!({"status": "updated", "signers": request.signers.len()}))
    }

    async fn fetch_sign_url(&self, document_id: &str) -> Result<Value, ProviderError> {
        let sequence = self.record(ProviderCall::SignUrl(document_id.to_string()))?;
        Ok(json!({"url": format!("https://sign/{}?v={}", document_id, sequence)}))
    }
}
