// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Relay Configuration Types
//
// Defines the configuration schema for the eSign relay:
// - HTTP server binding and upload staging
// - OpenSign Labs provider endpoint, credentials and auth scheme
// - Signer role labels and widget placements
//
// Values come from an optional YAML file, then environment overrides.
// The provider URL and API key are required; the relay refuses to start
// without them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::signer::{RolePreset, SignerLayouts};

pub const ENV_CONFIG_PATH: &str = "ESIGN_CONFIG_PATH";
pub const ENV_API_URL: &str = "OPENSIGNLABS_API_URL";
pub const ENV_API_KEY: &str = "OPENSIGNLABS_API_KEY";
pub const ENV_AUTH_SCHEME: &str = "OPENSIGNLABS_AUTH_SCHEME";
pub const ENV_ROLE_PRESET: &str = "ESIGN_ROLE_PRESET";
pub const ENV_UPLOAD_DIR: &str = "ESIGN_UPLOAD_DIR";

/// Top-level relay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote e-signature provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Signer labels and widget placements, in signing order
    #[serde(default)]
    pub signers: SignerLayouts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory uploaded attachments are staged in before forwarding
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Maximum accepted request body size for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider API base URL (OPENSIGNLABS_API_URL)
    #[serde(default)]
    pub base_url: String,

    /// Provider API key (OPENSIGNLABS_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// How the API key is attached to requests
    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default)]
    pub endpoints: ProviderEndpoints,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            auth_scheme: AuthScheme::default(),
            timeout_seconds: default_timeout_seconds(),
            endpoints: ProviderEndpoints::default(),
        }
    }
}

/// Header used to present the API key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `x-api-token: <key>`
    #[default]
    ApiToken,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api-token" | "x-api-token" | "token" => Ok(AuthScheme::ApiToken),
            "bearer" => Ok(AuthScheme::Bearer),
            other => Err(format!(
                "unknown auth scheme '{}', expected 'api-token' or 'bearer'",
                other
            )),
        }
    }
}

/// Provider endpoint paths, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
    #[serde(default = "default_draft_template_path")]
    pub draft_template: String,

    #[serde(default = "default_submit_path")]
    pub submit: String,

    #[serde(default = "default_update_signers_path")]
    pub update_signers: String,

    /// The document id is appended as a trailing path segment
    #[serde(default = "default_sign_url_path")]
    pub sign_url: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            draft_template: default_draft_template_path(),
            submit: default_submit_path(),
            update_signers: default_update_signers_path(),
            sign_url: default_sign_url_path(),
        }
    }
}

/// Configuration errors; all of them are fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl RelayConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. ESIGN_CONFIG_PATH environment variable
    /// 2. ./esign-config.yaml (working directory)
    /// 3. /etc/esign-relay/config.yaml
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./esign-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        let system_config = PathBuf::from("/etc/esign-relay/config.yaml");
        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration (explicit path, else discovery, else defaults) and
    /// apply environment overrides. Does not validate.
    pub fn load(cli_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(path)?
        } else if let Some(path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(path)?
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.provider.base_url = url.trim().to_string();
        }

        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.provider.api_key = key.trim().to_string();
        }

        if let Some(val) = lookup(ENV_AUTH_SCHEME) {
            match val.parse::<AuthScheme>() {
                Ok(scheme) => self.provider.auth_scheme = scheme,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_AUTH_SCHEME, e),
            }
        }

        if let Some(val) = lookup(ENV_ROLE_PRESET) {
            match val.parse::<RolePreset>() {
                Ok(preset) => {
                    tracing::info!("Environment override: {}={:?}", ENV_ROLE_PRESET, preset);
                    self.signers.apply_preset(preset);
                }
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_ROLE_PRESET, e),
            }
        }

        if let Some(dir) = lookup(ENV_UPLOAD_DIR).filter(|v| !v.trim().is_empty()) {
            self.server.upload_dir = PathBuf::from(dir.trim());
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let provider = &self.provider;

        if provider.base_url.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_API_URL.to_string()));
        }
        if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "provider.base_url must be an http(s) URL, got '{}'",
                provider.base_url
            )));
        }
        if provider.api_key.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_API_KEY.to_string()));
        }
        if provider.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        let endpoints = &provider.endpoints;
        for (name, path) in [
            ("draft_template", &endpoints.draft_template),
            ("submit", &endpoints.submit),
            ("update_signers", &endpoints.update_signers),
            ("sign_url", &endpoints.sign_url),
        ] {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "provider.endpoints.{} cannot be empty",
                    name
                )));
            }
        }

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.server.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("server.upload_dir cannot be empty".to_string()));
        }

        let mut labels: Vec<&str> = Vec::with_capacity(3);
        for layout in self.signers.iter() {
            let label = layout.label.trim();
            if label.is_empty() {
                return Err(ConfigError::Invalid("Signer label cannot be empty".to_string()));
            }
            if labels.contains(&label) {
                return Err(ConfigError::Invalid(format!("Duplicate signer label: {}", label)));
            }
            if layout.widgets.iter().any(|w| w.page == 0) {
                return Err(ConfigError::Invalid(format!(
                    "Widget pages are 1-based (signer '{}')",
                    label
                )));
            }
            labels.push(label);
        }

        Ok(())
    }

    /// Copy with the API key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.provider.api_key.is_empty() {
            copy.provider.api_key = "********".to_string();
        }
        copy
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_draft_template_path() -> String {
    "/drafttemplate".to_string()
}

fn default_submit_path() -> String {
    "/submit-esign".to_string()
}

fn default_update_signers_path() -> String {
    "/update-signers".to_string()
}

fn default_sign_url_path() -> String {
    "/sign-url".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_require_credentials() {
        let config = RelayConfig::default();
        match config.validate() {
            Err(ConfigError::Missing(name)) => assert_eq!(name, ENV_API_URL),
            other => panic!("Expected missing API URL, got {:?}", other),
        }

        let mut config = RelayConfig::default();
        config.apply_overrides(env(&[(ENV_API_URL, "https://sandbox.opensignlabs.com/api/v1")]));
        match config.validate() {
            Err(ConfigError::Missing(name)) => assert_eq!(name, ENV_API_KEY),
            other => panic!("Expected missing API key, got {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RelayConfig::default();
        config.apply_overrides(env(&[
            (ENV_API_URL, " https://sandbox.opensignlabs.com/api/v1 "),
            (ENV_API_KEY, "test-key"),
            (ENV_AUTH_SCHEME, "bearer"),
            (ENV_ROLE_PRESET, "generic"),
            (ENV_UPLOAD_DIR, "/tmp/esign-uploads"),
        ]));

        assert_eq!(config.provider.base_url, "https://sandbox.opensignlabs.com/api/v1");
        assert_eq!(config.provider.api_key, "test-key");
        assert_eq!(config.provider.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.signers.role1.label, "Role 1");
        assert_eq!(config.server.upload_dir, PathBuf::from("/tmp/esign-uploads"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = RelayConfig::default();
        config.apply_overrides(env(&[(ENV_AUTH_SCHEME, "basic"), (ENV_ROLE_PRESET, "board")]));

        assert_eq!(config.provider.auth_scheme, AuthScheme::ApiToken);
        assert_eq!(config.signers.role1.label, "HR");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
provider:
  base_url: "https://app.opensignlabs.com/api/v1"
  api_key: "yaml-key"
  auth_scheme: bearer
server:
  port: 8080
"#;
        let config = RelayConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.provider.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.provider.timeout_seconds, 30);
        assert_eq!(config.provider.endpoints.draft_template, "/drafttemplate");
        assert_eq!(config.signers, SignerLayouts::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_yaml_credentials() {
        let yaml = r#"
provider:
  base_url: "https://app.opensignlabs.com/api/v1"
  api_key: "yaml-key"
"#;
        let mut config = RelayConfig::from_yaml_str(yaml).unwrap();
        config.apply_overrides(env(&[(ENV_API_KEY, "env-key")]));

        assert_eq!(config.provider.base_url, "https://app.opensignlabs.com/api/v1");
        assert_eq!(config.provider.api_key, "env-key");
    }

    #[test]
    fn test_validation() {
        let mut config = RelayConfig::default();
        config.provider.base_url = "https://sandbox.opensignlabs.com/api/v1".to_string();
        config.provider.api_key = "key".to_string();
        assert!(config.validate().is_ok());

        config.provider.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.provider.base_url = "https://sandbox.opensignlabs.com/api/v1".to_string();

        config.provider.timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.provider.timeout_seconds = 30;

        config.signers.role2.label = "HR".to_string();
        assert!(config.validate().is_err());
        config.signers.role2.label = "Manager".to_string();

        config.signers.role3.widgets[0].page = 0;
        assert!(config.validate().is_err());
        config.signers.role3.widgets[0].page = 3;

        config.provider.endpoints.sign_url = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let mut config = RelayConfig::default();
        config.provider.api_key = "secret".to_string();

        let shown = config.redacted().to_yaml_string().unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("********"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = RelayConfig::from_yaml_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
