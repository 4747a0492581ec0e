//! JSON-RPC 2.0 envelopes shared by the stdio and HTTP transports.
//!
//! A message with an `id` member is a request and gets exactly one reply;
//! a message without one is a notification and is never answered. Request
//! IDs are strings or integers. Batches are not accepted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The MCP protocol version this implementation supports.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name for capability negotiation.
pub const SERVER_NAME: &str = "tomba-mcp-server";

const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(i64),
    /// String request ID.
    String(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// A request from the client. The envelope version has already been
/// checked by [`parse_message`].
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// Identifier echoed in the reply.
    pub id: RequestId,

    /// The method to invoke.
    pub method: String,

    /// Method parameters, if any.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A notification from the client. Its parameters are not inspected.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcNotification {
    /// The notification method.
    pub method: String,
}

/// A parsed client message.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A request expecting a reply.
    Request(JsonRpcRequest),
    /// A notification.
    Notification(JsonRpcNotification),
}

/// A server-to-client notification.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingNotification {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The notification method.
    pub method: &'static str,

    /// Notification payload.
    pub params: Value,
}

impl OutgoingNotification {
    /// Creates a progress notification echoing the client's token.
    ///
    /// `total` and `message` are omitted from the payload when absent.
    #[must_use]
    pub fn progress(
        progress_token: &Value,
        progress: u32,
        total: Option<u32>,
        message: Option<&str>,
    ) -> Self {
        let mut params = Map::new();
        params.insert("progressToken".to_string(), progress_token.clone());
        params.insert("progress".to_string(), progress.into());
        if let Some(total) = total {
            params.insert("total".to_string(), total.into());
        }
        if let Some(message) = message {
            params.insert("message".to_string(), message.into());
        }
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: "notifications/progress",
            params: Value::Object(params),
        }
    }
}

/// A successful reply.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request this reply answers.
    pub id: RequestId,

    /// The method's result.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a success reply.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// JSON-RPC 2.0 error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The message is not JSON, or not a single JSON object.
    ParseError,
    /// The object is not a valid request, or arrived in the wrong state.
    InvalidRequest,
    /// The method does not exist.
    MethodNotFound,
    /// Missing or malformed method parameters.
    InvalidParams,
    /// Failure while producing the result.
    InternalError,
    /// A code from the server-defined range.
    ServerError(i32),
}

impl ErrorCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ServerError(code) => code,
        }
    }
}

/// The `error` member of an error reply.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,
}

impl JsonRpcErrorData {
    /// Creates an error with a message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }
}

/// An error reply. `id` is `null` when the request could not be
/// identified.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request this reply answers, if known.
    pub id: Option<RequestId>,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates an error reply.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }

    fn parse_error(message: impl Into<String>) -> Self {
        Self::new(
            None,
            JsonRpcErrorData::with_message(ErrorCode::ParseError, message),
        )
    }

    fn invalid_request(id: Option<RequestId>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, message),
        )
    }

    /// Replies that `method` is not served.
    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(
                ErrorCode::MethodNotFound,
                format!("Method not found: {method}"),
            ),
        )
    }

    /// Replies that the parameters were missing or malformed.
    #[must_use]
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(ErrorCode::InvalidParams, message),
        )
    }

    /// Replies that the server failed while producing the result.
    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(ErrorCode::InternalError, message),
        )
    }
}

/// Parses one serialised message.
///
/// # Errors
///
/// Returns the error reply to send: a parse error for anything that is not
/// a single JSON object, an invalid request for a bad envelope. The reply
/// carries the request id whenever one could be read.
pub fn parse_message(json: &str) -> Result<IncomingMessage, JsonRpcError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| JsonRpcError::parse_error(format!("Parse error: {e}")))?;

    let Value::Object(object) = value else {
        return Err(JsonRpcError::parse_error(
            "Parse error: expected a single JSON-RPC object",
        ));
    };

    let id = match object.get("id") {
        None => None,
        Some(raw) => Some(RequestId::deserialize(raw).map_err(|_| {
            JsonRpcError::invalid_request(None, "Invalid Request: id must be a string or integer")
        })?),
    };

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(JsonRpcError::invalid_request(
            id,
            "Invalid Request: jsonrpc must be \"2.0\"",
        ));
    }

    if !matches!(object.get("method"), Some(Value::String(method)) if !method.is_empty()) {
        return Err(JsonRpcError::invalid_request(
            id,
            "Invalid Request: method must be a non-empty string",
        ));
    }

    let value = Value::Object(object);
    if id.is_some() {
        JsonRpcRequest::deserialize(value)
            .map(IncomingMessage::Request)
            .map_err(|e| JsonRpcError::invalid_request(id, format!("Invalid Request: {e}")))
    } else {
        JsonRpcNotification::deserialize(value)
            .map(IncomingMessage::Notification)
            .map_err(|e| JsonRpcError::invalid_request(None, format!("Invalid Request: {e}")))
    }
}
