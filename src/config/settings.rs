//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::client::{Credentials, DEFAULT_BASE_URL};
use crate::error::ConfigError;
use crate::mcp::http::RESERVED_PATHS;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Tomba API keys.
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,

    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.as_str();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(invalid(format!(
                "api.base_url must be an http(s) URL, got '{base_url}'"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(invalid("api.timeout_secs must be greater than 0"));
        }
        if !self.http.endpoint.starts_with('/') {
            return Err(invalid(format!(
                "http.endpoint must start with '/', got '{}'",
                self.http.endpoint
            )));
        }
        let endpoint = self.http.endpoint.as_str();
        if RESERVED_PATHS.contains(&endpoint) {
            return Err(invalid(format!(
                "http.endpoint '{endpoint}' is reserved by the HTTP transport"
            )));
        }
        if endpoint.contains([':', '*', '{', '}']) {
            return Err(invalid(format!(
                "http.endpoint must be a literal path, got '{endpoint}'"
            )));
        }
        if let Some(credentials) = &self.credentials {
            // Never echo the keys themselves.
            if credentials.api_key.trim().is_empty() {
                return Err(invalid("credentials.api_key must not be empty"));
            }
            if credentials.secret_key.trim().is_empty() {
                return Err(invalid("credentials.secret_key must not be empty"));
            }
        }
        Ok(())
    }

    /// Resolves the API key pair. Keys given on the command line or in the
    /// environment take precedence over the file, one key at a time.
    #[must_use]
    pub fn resolve_credentials(
        &self,
        api_key: Option<String>,
        secret_key: Option<String>,
    ) -> Option<Credentials> {
        let file = self.credentials.as_ref();
        Credentials::from_parts(
            api_key.or_else(|| file.map(|c| c.api_key.clone())),
            secret_key.or_else(|| file.map(|c| c.secret_key.clone())),
        )
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        message: message.into(),
    }
}

/// API keys stored in the configuration file.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Tomba API key (`ta_...`).
    pub api_key: String,
    /// Tomba secret key (`ts_...`).
    pub secret_key: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the Tomba API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the MCP endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            endpoint: default_endpoint(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_endpoint() -> String {
    "/mcp".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
