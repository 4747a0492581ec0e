//! HTTPS implementation of [`RemoteApi`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Credentials, Method, RemoteApi, RemoteCall, RemoteError};

/// Default Tomba API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.tomba.io/v1";

const KEY_HEADER: &str = "X-Tomba-Key";
const SECRET_HEADER: &str = "X-Tomba-Secret";

/// Executes remote calls with `reqwest`.
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpApi {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation failure).
    pub fn new(
        credentials: Credentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tomba-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl RemoteApi for HttpApi {
    async fn execute(&self, call: RemoteCall) -> Result<Value, RemoteError> {
        let url = self.url(call.path);
        tracing::debug!(operation = call.operation, %url, "Calling Tomba API");

        let mut request = match call.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        }
        .header(KEY_HEADER, self.credentials.api_key())
        .header(SECRET_HEADER, self.credentials.secret_key());

        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(
                operation = call.operation,
                status = status.as_u16(),
                "Tomba API error"
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Extracts the human-readable message from an API error body.
///
/// Looks at `errors.message`, `error.message` and `message` in that order,
/// falling back to the raw body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let extracted = parsed.as_ref().and_then(|json| {
        ["/errors/message", "/error/message", "/message"]
            .iter()
            .find_map(|pointer| json.pointer(pointer).and_then(Value::as_str))
    });

    match extracted {
        Some(message) => message.to_string(),
        None if body.trim().is_empty() => "Unknown error".to_string(),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_errors_object() {
        let body = r#"{"errors":{"status":401,"message":"Invalid API key"}}"#;
        assert_eq!(error_message(body), "Invalid API key");
    }

    #[test]
    fn error_message_fallbacks() {
        assert_eq!(error_message(r#"{"error":{"message":"nope"}}"#), "nope");
        assert_eq!(error_message(r#"{"message":"Rate limited"}"#), "Rate limited");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(""), "Unknown error");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let api = HttpApi::new(
            Credentials::new("k", "s"),
            "https://api.tomba.io/v1/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(api.url("domain-search"), "https://api.tomba.io/v1/domain-search");
    }
}
