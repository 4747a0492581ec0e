//! Integration tests for the streamable HTTP transport.
//!
//! The router is driven in-process; no socket is opened.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tomba_mcp::dispatch::Dispatcher;
use tomba_mcp::mcp::http::{router, SessionManager, SESSION_HEADER};

const ENDPOINT: &str = "/mcp";

fn app() -> (Router, SessionManager) {
    let sessions = SessionManager::new(Dispatcher::new(None));
    (router(sessions.clone(), ENDPOINT), sessions)
}

fn post(session: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::post(ENDPOINT).header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = session {
        builder = builder.header(SESSION_HEADER, id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn with_session(method: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(ENDPOINT);
    if let Some(id) = session {
        builder = builder.header(SESSION_HEADER, id);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn initialize() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {"protocolVersion": "2024-11-05", "capabilities": {}}
    })
}

async fn open_session(app: &Router) -> String {
    let response = app.clone().oneshot(post(None, &initialize())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response
        .headers()
        .get(SESSION_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_session_lifecycle() {
    let (app, sessions) = app();

    let id = open_session(&app).await;
    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert_eq!(sessions.len(), 1);

    let response = app
        .clone()
        .oneshot(post(
            Some(&id),
            &json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .clone()
        .oneshot(post(
            Some(&id),
            &json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 12);

    let response = app
        .clone()
        .oneshot(with_session("GET", Some(&id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    drop(response);

    let response = app
        .clone()
        .oneshot(with_session("DELETE", Some(&id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["sessionId"], id.as_str());
    assert!(sessions.is_empty());

    let response = app
        .clone()
        .oneshot(with_session("GET", Some(&id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_each_initialize_opens_a_fresh_session() {
    let (app, sessions) = app();
    let first = open_session(&app).await;
    let second = open_session(&app).await;
    assert_ne!(first, second);
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn test_failed_initialize_does_not_leave_a_session() {
    let (app, sessions) = app();
    let response = app
        .clone()
        .oneshot(post(
            None,
            &json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
        ))
        .await
        .unwrap();

    assert!(response.headers().get(SESSION_HEADER).is_none());
    assert_eq!(json_body(response).await["error"]["code"], -32602);
    assert!(sessions.is_empty());
}

// =============================================================================
// Session errors
// =============================================================================

#[tokio::test]
async fn test_post_without_session_must_initialize() {
    let (app, sessions) = app();
    let response = app
        .oneshot(post(
            None,
            &json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["error"]["code"], -32000);
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (app, _) = app();
    let stale = "00000000-0000-4000-8000-000000000000";

    for request in [
        post(
            Some(stale),
            &json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
        ),
        with_session("GET", Some(stale)),
        with_session("DELETE", Some(stale)),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], -32001);
    }
}

#[tokio::test]
async fn test_get_and_delete_require_session_header() {
    let (app, _) = app();
    for method in ["GET", "DELETE"] {
        let response = app.clone().oneshot(with_session(method, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
    }
}

// =============================================================================
// Auxiliary endpoints
// =============================================================================

#[tokio::test]
async fn test_health_and_session_listing() {
    let (app, _) = app();
    let id = open_session(&app).await;

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let health = json_body(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["sessions"], 1);

    let response = app
        .clone()
        .oneshot(Request::get("/sessions").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["sessions"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_close_all_ends_every_session() {
    let (app, sessions) = app();
    let id = open_session(&app).await;
    sessions.close_all();

    let response = app
        .oneshot(post(
            Some(&id),
            &json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
