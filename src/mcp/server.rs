//! MCP protocol state machine, independent of the transport.
//!
//! The server follows the MCP lifecycle:
//!
//! 1. **Initialisation**: capability negotiation and version agreement
//! 2. **Operation**: list, call, read and get requests routed to the
//!    [`Dispatcher`]
//! 3. **Shutdown**: the transport stops feeding messages
//!
//! Every handled message produces an [`Outbound`]: the notifications to send
//! first, then at most one reply. The stdio and HTTP transports only move
//! bytes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dispatch::{DispatchError, Dispatcher};
use crate::mcp::protocol::{
    parse_message, ErrorCode, IncomingMessage, JsonRpcError, JsonRpcErrorData,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, OutgoingNotification, RequestId,
    MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::types::{GetPromptParams, ReadResourceParams, ToolCallParams};

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Capabilities advertised during initialisation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    pub tools: ListCapability,
    /// Resource-related capabilities.
    pub resources: ListCapability,
    /// Prompt-related capabilities.
    pub prompts: ListCapability,
}

/// A capability whose list may or may not change during the session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCapability {
    /// Whether the list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "crate::mcp::types::is_false")]
    pub list_changed: bool,
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// The single reply to a request, or to a message that failed to parse.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// A result.
    Success(JsonRpcResponse),
    /// An error.
    Error(JsonRpcError),
}

impl Reply {
    /// Whether this reply is an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<JsonRpcError> for Reply {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

impl From<Result<JsonRpcResponse, JsonRpcError>> for Reply {
    fn from(result: Result<JsonRpcResponse, JsonRpcError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(error) => Self::Error(error),
        }
    }
}

/// Everything a handled message asks the transport to send.
#[derive(Debug, Clone, Default)]
pub struct Outbound {
    /// Server-to-client notifications, sent before the reply.
    pub notifications: Vec<OutgoingNotification>,
    /// The reply, absent for notifications.
    pub reply: Option<Reply>,
}

impl Outbound {
    fn reply(reply: impl Into<Reply>) -> Self {
        Self {
            notifications: Vec::new(),
            reply: Some(reply.into()),
        }
    }
}

/// One MCP session's protocol state.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Routes catalogue requests.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Creates a server awaiting initialisation.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            protocol_version: None,
            dispatcher,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Marks the session as shutting down.
    pub fn shut_down(&mut self) {
        self.state = ServerState::ShuttingDown;
    }

    /// Parses and handles one serialised message.
    pub async fn handle_line(&mut self, line: &str) -> Outbound {
        match parse_message(line) {
            Ok(message) => self.handle_message(message).await,
            Err(error) => {
                tracing::debug!(code = error.error.code, "Rejected malformed message");
                Outbound::reply(Reply::Error(error))
            }
        }
    }

    /// Handles a parsed incoming message.
    pub async fn handle_message(&mut self, message: IncomingMessage) -> Outbound {
        match message {
            IncomingMessage::Request(req) => self.handle_request(&req).await,
            IncomingMessage::Notification(ref notif) => {
                self.handle_notification(notif);
                Outbound::default()
            }
        }
    }

    async fn handle_request(&mut self, req: &JsonRpcRequest) -> Outbound {
        tracing::debug!(method = %req.method, id = %req.id, "Handling request");

        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "ping" => Ok(Self::handle_ping(req)),
            "tools/list" => self.handle_tools_list(req),
            "tools/call" => return self.handle_tools_call(req).await,
            "resources/list" => self.handle_resources_list(req),
            "resources/read" => self.handle_resources_read(req).await,
            "prompts/list" => self.handle_prompts_list(req),
            "prompts/get" => self.handle_prompts_get(req),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        Outbound::reply(response)
    }

    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            self.state = ServerState::Running;
            tracing::info!("Client initialised");
        } else {
            tracing::debug!(method = %notif.method, "Ignoring notification");
        }
    }

    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::new(
                Some(req.id.clone()),
                JsonRpcErrorData::with_message(
                    ErrorCode::InvalidRequest,
                    "Server already initialised",
                ),
            ));
        }

        let params: InitializeParams = parse_params(req, "initialize")?;
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                version = client.version.as_deref().unwrap_or("unknown"),
                requested = %params.protocol_version,
                "Initialising session"
            );
        }

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();
        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_initialised(&req.id)?;
        success(&req.id, &json!({ "tools": self.dispatcher.list_tools() }))
    }

    async fn handle_tools_call(&self, req: &JsonRpcRequest) -> Outbound {
        if let Err(error) = self.require_initialised(&req.id) {
            return Outbound::reply(error);
        }
        let params: ToolCallParams = match parse_params(req, "tool call") {
            Ok(params) => params,
            Err(error) => return Outbound::reply(error),
        };

        let result = self
            .dispatcher
            .call_tool(&params.name, &params.arguments)
            .await;

        let notifications = params
            .meta
            .and_then(|meta| meta.progress_token)
            .map(|token| {
                let message = format!("Completed {}", params.name);
                OutgoingNotification::progress(&token, 1, Some(1), Some(&message))
            })
            .into_iter()
            .collect();

        Outbound {
            notifications,
            reply: Some(success(&req.id, &result).into()),
        }
    }

    fn handle_resources_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_initialised(&req.id)?;
        success(
            &req.id,
            &json!({ "resources": self.dispatcher.list_resources() }),
        )
    }

    async fn handle_resources_read(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_initialised(&req.id)?;
        let params: ReadResourceParams = parse_params(req, "resource read")?;

        match self.dispatcher.read_resource(&params.uri).await {
            Ok(result) => success(&req.id, &result),
            Err(error) => {
                tracing::warn!(uri = %params.uri, error = %error, "Resource read failed");
                Err(dispatch_error(&req.id, &error))
            }
        }
    }

    fn handle_prompts_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_initialised(&req.id)?;
        success(&req.id, &json!({ "prompts": self.dispatcher.list_prompts() }))
    }

    fn handle_prompts_get(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_initialised(&req.id)?;
        let params: GetPromptParams = parse_params(req, "prompt")?;

        match self.dispatcher.get_prompt(&params.name, &params.arguments) {
            Ok(result) => success(&req.id, &result),
            Err(error) => {
                tracing::warn!(prompt = %params.name, error = %error, "Prompt expansion failed");
                Err(dispatch_error(&req.id, &error))
            }
        }
    }

    /// Rejects catalogue requests before `initialize`.
    fn require_initialised(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        match self.state {
            ServerState::Initialising | ServerState::Running => Ok(()),
            ServerState::AwaitingInit | ServerState::ShuttingDown => Err(JsonRpcError::new(
                Some(id.clone()),
                JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
            )),
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    req: &JsonRpcRequest,
    what: &str,
) -> Result<T, JsonRpcError> {
    req.params
        .as_ref()
        .map(|p| serde_json::from_value(p.clone()))
        .transpose()
        .map_err(|e| {
            JsonRpcError::invalid_params(req.id.clone(), format!("Invalid {what} params: {e}"))
        })?
        .ok_or_else(|| {
            JsonRpcError::invalid_params(req.id.clone(), format!("Missing {what} params"))
        })
}

fn success<T: Serialize>(id: &RequestId, result: &T) -> Result<JsonRpcResponse, JsonRpcError> {
    let value = serde_json::to_value(result).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialise result");
        JsonRpcError::internal_error(id.clone(), "Internal error: failed to serialise result")
    })?;
    Ok(JsonRpcResponse::success(id.clone(), value))
}

fn dispatch_error(id: &RequestId, error: &DispatchError) -> JsonRpcError {
    JsonRpcError::new(
        Some(id.clone()),
        JsonRpcErrorData::with_message(error.code(), error.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn send(server: &mut McpServer, message: Value) -> Outbound {
        server.handle_line(&message.to_string()).await
    }

    fn request(id: i64, method: &str, params: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
    }

    fn reply_value(outbound: &Outbound) -> Value {
        serde_json::to_value(outbound.reply.as_ref().unwrap()).unwrap()
    }

    async fn initialised() -> McpServer {
        let mut server = McpServer::new(Dispatcher::new(None));
        let params = json!({"protocolVersion": "2024-11-05", "capabilities": {}});
        send(&mut server, request(1, "initialize", params)).await;
        let initialized = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        send(&mut server, initialized).await;
        server
    }

    #[test]
    fn server_initial_state() {
        let server = McpServer::new(Dispatcher::new(None));
        assert_eq!(server.state(), ServerState::AwaitingInit);
        assert!(server.protocol_version().is_none());
    }

    #[tokio::test]
    async fn initialize_advertises_three_capabilities() {
        let mut server = McpServer::new(Dispatcher::new(None));
        let params = json!({"protocolVersion": "2024-11-05"});
        let outbound = send(&mut server, request(1, "initialize", params)).await;
        let value = reply_value(&outbound);
        assert_eq!(value["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(value["result"]["serverInfo"]["name"], "tomba-mcp-server");
        let capabilities = &value["result"]["capabilities"];
        assert_eq!(capabilities, &json!({"tools": {}, "resources": {}, "prompts": {}}));
        assert_eq!(server.state(), ServerState::Initialising);
    }

    #[tokio::test]
    async fn initialized_notification_has_no_reply() {
        let server = initialised().await;
        assert_eq!(server.state(), ServerState::Running);
    }

    #[tokio::test]
    async fn second_initialize_is_rejected() {
        let mut server = initialised().await;
        let params = json!({"protocolVersion": "2024-11-05"});
        let outbound = send(&mut server, request(2, "initialize", params)).await;
        assert!(outbound.reply.unwrap().is_error());
    }

    #[tokio::test]
    async fn list_before_initialize_is_rejected() {
        let mut server = McpServer::new(Dispatcher::new(None));
        let outbound = send(&mut server, request(1, "tools/list", json!({}))).await;
        let value = reply_value(&outbound);
        assert_eq!(value["error"]["code"], ErrorCode::InvalidRequest.code());
    }

    #[tokio::test]
    async fn ping_works_before_initialize() {
        let mut server = McpServer::new(Dispatcher::new(None));
        let ping = json!({"jsonrpc": "2.0", "id": "p", "method": "ping"});
        let outbound = send(&mut server, ping).await;
        assert_eq!(reply_value(&outbound)["result"], json!({}));
    }

    #[tokio::test]
    async fn notification_produces_nothing() {
        let mut server = initialised().await;
        let cancelled = json!({"jsonrpc": "2.0", "method": "notifications/cancelled"});
        let outbound = send(&mut server, cancelled).await;
        assert!(outbound.reply.is_none());
        assert!(outbound.notifications.is_empty());
    }

    #[tokio::test]
    async fn unknown_method() {
        let mut server = initialised().await;
        let outbound = send(&mut server, request(3, "sampling/createMessage", json!({}))).await;
        let value = reply_value(&outbound);
        assert_eq!(value["error"]["code"], ErrorCode::MethodNotFound.code());
    }

    #[tokio::test]
    async fn tool_call_with_progress_token_emits_notification() {
        let mut server = initialised().await;
        let params = json!({
            "name": "email_count",
            "arguments": {"domain": "stripe.com"},
            "_meta": {"progressToken": "t-1"}
        });
        let outbound = send(&mut server, request(4, "tools/call", params)).await;
        assert_eq!(outbound.notifications.len(), 1);
        let notification = serde_json::to_value(&outbound.notifications[0]).unwrap();
        assert_eq!(notification["params"]["progressToken"], "t-1");

        let value = reply_value(&outbound);
        assert_eq!(value["result"]["isError"], true);
    }

    #[tokio::test]
    async fn resource_errors_become_protocol_errors() {
        let mut server = initialised().await;
        let params = json!({"uri": "tomba://nowhere"});
        let outbound = send(&mut server, request(5, "resources/read", params)).await;
        let value = reply_value(&outbound);
        assert_eq!(value["error"]["code"], ErrorCode::InvalidParams.code());
        assert_eq!(value["error"]["message"], "Unknown resource URI: tomba://nowhere");
    }

    #[tokio::test]
    async fn missing_prompt_argument_is_invalid_params() {
        let mut server = initialised().await;
        let params = json!({"name": "research_company", "arguments": {}});
        let outbound = send(&mut server, request(6, "prompts/get", params)).await;
        let value = reply_value(&outbound);
        assert_eq!(value["error"]["code"], ErrorCode::InvalidParams.code());
    }

    #[tokio::test]
    async fn malformed_line_yields_parse_error() {
        let mut server = McpServer::new(Dispatcher::new(None));
        let outbound = server.handle_line("{not json").await;
        let value = reply_value(&outbound);
        assert_eq!(value["error"]["code"], ErrorCode::ParseError.code());
        assert_eq!(value["id"], Value::Null);
    }
}
