// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! OpenSign Labs Provider Adapter
//!
//! Anti-Corruption Layer for the OpenSign Labs REST API. Translates the
//! domain's draft-template and signing requests into provider calls and maps
//! provider responses back into domain values.
//!
//! # API Endpoints (defaults, configurable)
//!
//! - `POST /drafttemplate` - Create a draft template from a base64 PDF
//! - `POST /submit-esign` - Submit a document for ordered signing
//! - `POST /update-signers` - Replace the signer list of a document
//! - `GET /sign-url/{documentId}` - Fetch the signing URL payload
//!
//! One attempt per call; there is no retry or backoff.

use async_trait::async_trait;
use metrics::{counter, histogram};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::domain::provider::{
    DraftTemplate, DraftTemplateRequest, ESignProvider, ProviderError, SigningRequest,
};
use crate::domain::relay_config::{
    AuthScheme, ConfigError, ProviderConfig, ProviderEndpoints, ENV_API_KEY, ENV_API_URL,
};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub struct OpenSignClient {
    client: Client,
    base_url: String,
    api_key: String,
    auth_scheme: AuthScheme,
    endpoints: ProviderEndpoints,
}

impl OpenSignClient {
    /// Create a client with default auth scheme, endpoints and timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = ProviderConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..ProviderConfig::default()
        };
        Self::from_config(&config)
    }

    /// Create a client from provider configuration.
    ///
    /// Fails when the base URL or API key is missing.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Missing(ENV_API_URL.to_string()));
        }
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::Missing(ENV_API_KEY.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            auth_scheme: config.auth_scheme,
            endpoints: config.endpoints.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }

    fn sign_url_endpoint(&self, document_id: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint(&self.endpoints.sign_url),
            utf8_percent_encode(document_id, PATH_SEGMENT)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_scheme {
            AuthScheme::ApiToken => request.header("x-api-token", &self.api_key),
            AuthScheme::Bearer => request.bearer_auth(&self.api_key),
        }
    }

    /// Send a request and decode its JSON body, recording call metrics
    async fn send_json(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Value, ProviderError> {
        let started = Instant::now();
        let result = self.dispatch(request).await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        counter!("esign_provider_requests_total", "operation" => operation, "outcome" => outcome)
            .increment(1);
        histogram!("esign_provider_request_duration_seconds", "operation" => operation)
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => debug!(operation, "eSign provider call succeeded"),
            Err(e) => warn!(
                operation,
                error = %e,
                provider_payload = e.provider_payload().unwrap_or(""),
                "eSign provider call failed"
            ),
        }

        result
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Value, ProviderError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }
}

/// Extract the template identifiers from a draft-template response
fn parse_draft_template(payload: &Value) -> Result<DraftTemplate, ProviderError> {
    let field = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::MalformedResponse(format!("Draft template response is missing '{}'", name))
            })
    };

    Ok(DraftTemplate {
        template_id: field("objectId")?,
        edit_url: field("url")?,
    })
}

#[async_trait]
impl ESignProvider for OpenSignClient {
    async fn create_draft_template(
        &self,
        request: &DraftTemplateRequest,
    ) -> Result<DraftTemplate, ProviderError> {
        let url = self.endpoint(&self.endpoints.draft_template);
        let payload = self
            .send_json("create_draft_template", self.client.post(&url).json(request))
            .await?;
        parse_draft_template(&payload)
    }

    async fn submit_for_signing(&self, request: &SigningRequest) -> Result<Value, ProviderError> {
        let url = self.endpoint(&self.endpoints.submit);
        self.send_json("submit_for_signing", self.client.post(&url).json(request))
            .await
    }

    async fn update_signers(&self, request: &SigningRequest) -> Result<Value, ProviderError> {
        let url = self.endpoint(&self.endpoints.update_signers);
        self.send_json("update_signers", self.client.post(&url).json(request))
            .await
    }

    async fn fetch_sign_url(&self, document_id: &str) -> Result<Value, ProviderError> {
        if document_id.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("documentId is required".to_string()));
        }
        let url = self.sign_url_endpoint(document_id);
        self.send_json("fetch_sign_url", self.client.get(&url)).await
    }
}
