//! Integration tests for MCP protocol handling.
//!
//! These tests verify the MCP server's JSON-RPC 2.0 protocol implementation,
//! including request/response handling, error responses, and lifecycle management.

use serde_json::{json, Value};

use tomba_mcp::dispatch::Dispatcher;
use tomba_mcp::mcp::protocol::{parse_message, IncomingMessage, RequestId};
use tomba_mcp::mcp::server::{McpServer, ServerState};

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "initialize");
        assert_eq!(req.id, RequestId::Number(1));
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_tools_list_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/list",
        "params": {}
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "tools/list");
        assert_eq!(req.id, RequestId::Number(2));
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_notification() {
    let json = r#"{
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Notification(notif) = result.unwrap() {
        assert_eq!(notif.method, "notifications/initialized");
    } else {
        panic!("Expected Notification");
    }
}

#[test]
fn test_parse_invalid_json() {
    let json = "not valid json";

    let result = parse_message(json);
    assert!(result.is_err());
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    let json = r#"{
        "id": 1,
        "method": "test"
    }"#;

    let result = parse_message(json);
    assert!(result.is_err());
}

// =============================================================================
// Session Lifecycle Tests
// =============================================================================

async fn send(server: &mut McpServer, message: Value) -> Value {
    let outbound = server.handle_line(&message.to_string()).await;
    outbound
        .reply
        .map_or(Value::Null, |reply| serde_json::to_value(reply).unwrap())
}

async fn initialised_server() -> McpServer {
    let mut server = McpServer::new(Dispatcher::new(None));
    let reply = send(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "1.0.0"}
            }
        }),
    )
    .await;
    assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");

    let reply = send(
        &mut server,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;
    assert_eq!(reply, Value::Null);
    assert_eq!(server.state(), ServerState::Running);
    server
}

#[tokio::test]
async fn test_full_lifecycle_lists_catalogues() {
    let mut server = initialised_server().await;

    let tools = send(&mut server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
    assert_eq!(tools["result"]["tools"].as_array().unwrap().len(), 12);

    let resources = send(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}),
    )
    .await;
    assert_eq!(resources["result"]["resources"].as_array().unwrap().len(), 7);

    let prompts = send(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 4, "method": "prompts/list"}),
    )
    .await;
    assert_eq!(prompts["result"]["prompts"].as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn test_tools_list_is_stable() {
    let mut server = initialised_server().await;
    let request = json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"});
    let first = send(&mut server, request.clone()).await;
    let second = send(&mut server, request).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_listed_tools_are_all_routed() {
    let mut server = initialised_server().await;
    let tools = send(&mut server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;

    for tool in tools["result"]["tools"].as_array().unwrap() {
        let name = tool["name"].as_str().unwrap();
        let reply = send(
            &mut server,
            json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": {"name": name, "arguments": {}}
            }),
        )
        .await;
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        assert!(!text.contains("Unknown tool"), "{name} was not routed");
        assert!(text.contains("not initialized"));
    }
}

#[tokio::test]
async fn test_unknown_tool_is_an_error_result_not_a_protocol_error() {
    let mut server = initialised_server().await;
    let reply = send(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": {"name": "delete_everything"}
        }),
    )
    .await;

    assert!(reply.get("error").is_none());
    assert_eq!(reply["result"]["isError"], true);
    assert_eq!(
        reply["result"]["content"][0]["text"],
        "Unknown tool: delete_everything"
    );
}

#[tokio::test]
async fn test_static_resource_read_without_credentials() {
    let mut server = initialised_server().await;
    let reply = send(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "resources/read",
            "params": {"uri": "tomba://docs/api"}
        }),
    )
    .await;

    let contents = &reply["result"]["contents"][0];
    assert_eq!(contents["mimeType"], "text/markdown");
    assert!(contents["text"].as_str().unwrap().starts_with("# Tomba API Documentation"));
}

#[tokio::test]
async fn test_prompt_get_returns_user_message() {
    let mut server = initialised_server().await;
    let reply = send(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "prompts/get",
            "params": {"name": "research_company", "arguments": {"domain": "stripe.com"}}
        }),
    )
    .await;

    let message = &reply["result"]["messages"][0];
    assert_eq!(message["role"], "user");
    assert_eq!(message["content"]["type"], "text");
    assert!(message["content"]["text"].as_str().unwrap().contains("stripe.com"));
}

#[tokio::test]
async fn test_requests_before_initialize_are_rejected() {
    let mut server = McpServer::new(Dispatcher::new(None));
    let reply = send(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "prompts/list"}),
    )
    .await;
    assert_eq!(reply["error"]["code"], -32600);
}
