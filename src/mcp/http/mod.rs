//! Streamable HTTP transport.
//!
//! | Route              | Purpose                                         |
//! |--------------------|-------------------------------------------------|
//! | `POST <endpoint>`  | JSON-RPC message; `initialize` opens a session  |
//! | `GET <endpoint>`   | SSE stream of the session's notifications       |
//! | `DELETE <endpoint>`| closes the session                              |
//! | `GET /health`      | liveness and session count                      |
//! | `GET /sessions`    | live session ids                                |
//!
//! Sessions are identified by the `Mcp-Session-Id` header. The transport
//! performs no authentication; bind it to a trusted interface.

pub mod session;

pub use session::{Session, SessionError, SessionManager, SessionSummary, SESSION_HEADER};

use std::convert::Infallible;
use std::io;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{future, Stream, StreamExt};
use serde_json::{json, Value};
use tokio_stream::wrappers::BroadcastStream;
use tower_http::trace::TraceLayer;

use crate::config::HttpSettings;
use crate::dispatch::Dispatcher;
use crate::mcp::protocol::{parse_message, IncomingMessage, SERVER_NAME};
use crate::mcp::server::Reply;
use crate::mcp::transport::shutdown_signal;

const HEALTH_PATH: &str = "/health";
const SESSIONS_PATH: &str = "/sessions";

/// Paths served next to the MCP endpoint. The endpoint may not reuse them.
pub const RESERVED_PATHS: [&str; 2] = [HEALTH_PATH, SESSIONS_PATH];

/// Builds the router serving MCP at `endpoint`.
///
/// `endpoint` must be a literal path outside [`RESERVED_PATHS`], as
/// enforced by [`Config::validate`](crate::config::Config::validate).
pub fn router(sessions: SessionManager, endpoint: &str) -> Router {
    Router::new()
        .route(
            endpoint,
            post(handle_post).get(handle_events).delete(handle_delete),
        )
        .route(HEALTH_PATH, get(health))
        .route(SESSIONS_PATH, get(list_sessions))
        .layer(TraceLayer::new_for_http())
        .with_state(sessions)
}

/// Serves MCP over HTTP until a shutdown signal, then closes every session.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or serving fails.
pub async fn serve(dispatcher: Dispatcher, settings: &HttpSettings) -> io::Result<()> {
    let sessions = SessionManager::new(dispatcher);
    let app = router(sessions.clone(), &settings.endpoint);

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        endpoint = %settings.endpoint,
        "Serving MCP over HTTP"
    );

    let shutdown_sessions = sessions.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = shutdown_signal().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signals");
            }
            // Open SSE streams end here, letting the server drain.
            shutdown_sessions.close_all();
        })
        .await?;

    sessions.close_all();
    tracing::info!("HTTP transport closed");
    Ok(())
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn is_initialize_request(body: &str) -> bool {
    matches!(
        parse_message(body),
        Ok(IncomingMessage::Request(ref req)) if req.method == "initialize"
    )
}

/// Runs one message through the session. Notifications are published to
/// the session's event stream; the reply, if any, is returned.
async fn exchange(session: &Session, body: &str) -> Option<Reply> {
    let outbound = session.handle(body).await;
    if !outbound.notifications.is_empty() {
        let delivered = session.publish(outbound.notifications);
        tracing::debug!(session_id = %session.id(), delivered, "Published notifications");
    }
    outbound.reply
}

fn reply_response(reply: Option<Reply>) -> Response {
    match reply {
        Some(reply) => (StatusCode::OK, Json(reply)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn handle_post(
    State(sessions): State<SessionManager>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, SessionError> {
    if let Some(id) = session_id(&headers) {
        let session = sessions
            .get(id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
        return Ok(reply_response(exchange(&session, &body).await));
    }

    if !is_initialize_request(&body) {
        return Err(SessionError::NotInitializeRequest);
    }

    let session = sessions.create();
    let reply = exchange(&session, &body).await;
    if !matches!(reply, Some(Reply::Success(_))) {
        session.close();
        return Ok(reply_response(reply));
    }

    let mut response = reply_response(reply);
    if let Ok(value) = HeaderValue::from_str(session.id()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    Ok(response)
}

async fn handle_events(
    State(sessions): State<SessionManager>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, SessionError> {
    let id = session_id(&headers).ok_or(SessionError::MissingSessionId)?;
    let receiver = sessions
        .get(id)
        .and_then(|session| session.subscribe())
        .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
    tracing::debug!(session_id = %id, "Event stream opened");

    let session_id = id.to_string();
    let stream = BroadcastStream::new(receiver).filter_map(move |item| {
        let event = match item {
            Ok(notification) => Event::default()
                .event("message")
                .json_data(&notification)
                .map_err(|e| tracing::error!(error = %e, "Failed to encode event"))
                .ok(),
            Err(lagged) => {
                tracing::warn!(session_id = %session_id, error = %lagged, "Event stream lagged");
                None
            }
        };
        future::ready(event.map(Ok))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

async fn handle_delete(
    State(sessions): State<SessionManager>,
    headers: HeaderMap,
) -> Result<Json<Value>, SessionError> {
    let id = session_id(&headers).ok_or(SessionError::MissingSessionId)?;
    if !sessions.close(id) {
        return Err(SessionError::UnknownSession(id.to_string()));
    }
    Ok(Json(json!({ "status": "closed", "sessionId": id })))
}

async fn health(State(sessions): State<SessionManager>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions.len(),
    }))
}

async fn list_sessions(State(sessions): State<SessionManager>) -> Json<Value> {
    let summaries = sessions.summaries();
    Json(json!({ "count": summaries.len(), "sessions": summaries }))
}
