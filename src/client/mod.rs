//! Tomba API client.
//!
//! The [`RemoteApi`] trait is the seam between the protocol side and the
//! network: [`TombaClient`] turns each validated [`ToolRequest`] into a
//! [`RemoteCall`], and [`HttpApi`] executes those calls over HTTPS. Tests
//! substitute a recording implementation of the trait.
//!
//! [`ToolRequest`]: crate::tools::ToolRequest

mod http;
mod tomba;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::{HttpApi, DEFAULT_BASE_URL};
pub use tomba::TombaClient;

/// API key pair for the Tomba API.
///
/// # Security Note
///
/// The `Debug` implementation never prints the keys, and the keys are never
/// logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    /// Creates a key pair.
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Builds credentials from optional parts.
    ///
    /// Returns `None` unless both keys are present and non-blank.
    #[must_use]
    pub fn from_parts(api_key: Option<String>, secret_key: Option<String>) -> Option<Self> {
        let api_key = api_key.filter(|k| !k.trim().is_empty())?;
        let secret_key = secret_key.filter(|k| !k.trim().is_empty())?;
        Some(Self::new(api_key.trim(), secret_key.trim()))
    }

    /// The API key (`X-Tomba-Key`).
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The secret key (`X-Tomba-Secret`).
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// HTTP method of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single request to the Tomba API.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    /// Operation name used in error messages, e.g. "Domain search".
    pub operation: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL.
    pub path: &'static str,
    /// Query parameters. Only parameters with a value are included.
    pub query: Vec<(String, String)>,
    /// JSON body, for POST calls.
    pub body: Option<Value>,
}

impl RemoteCall {
    /// Creates a GET call with no parameters.
    #[must_use]
    pub const fn get(operation: &'static str, path: &'static str) -> Self {
        Self {
            operation,
            method: Method::Get,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST call with a JSON body.
    #[must_use]
    pub const fn post(operation: &'static str, path: &'static str, body: Value) -> Self {
        Self {
            operation,
            method: Method::Post,
            path,
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Adds a query parameter when `value` is present.
    #[must_use]
    pub fn param<T: ToString>(mut self, name: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Returns the value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request could not be sent or the response not received.
    #[error("{0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("Invalid response from API: {0}")]
    Decode(String),
}

/// Executes calls against the Tomba API.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Executes `call` and returns the response body.
    async fn execute(&self, call: RemoteCall) -> Result<Value, RemoteError>;
}

/// Error returned by [`TombaClient`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A remote call failed.
    #[error("{operation} failed: {source}")]
    Remote {
        /// Operation name, e.g. "Domain search".
        operation: &'static str,
        /// Underlying failure.
        source: RemoteError,
    },
}
