//! Session map for the streamable HTTP transport.
//!
//! A session owns one [`McpServer`] state machine and a broadcast channel
//! feeding its SSE stream. Closing a session is idempotent: the first
//! close ends the stream and runs the close hook, which removes the map
//! entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::dispatch::Dispatcher;
use crate::mcp::protocol::{ErrorCode, JsonRpcError, JsonRpcErrorData, OutgoingNotification};
use crate::mcp::server::{McpServer, Outbound};

/// Header carrying the session identifier.
pub const SESSION_HEADER: &str = "mcp-session-id";

const EVENT_BUFFER: usize = 64;

type SessionMap = HashMap<String, Arc<Session>>;
type CloseHook = Box<dyn FnOnce(&str) + Send>;

/// Why an HTTP request could not be attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// GET or DELETE without the session header.
    #[error("Bad Request: Mcp-Session-Id header is required")]
    MissingSessionId,

    /// POST without a session whose body is not an initialize request.
    #[error("Bad Request: No valid session ID provided")]
    NotInitializeRequest,

    /// The header names no live session.
    #[error("Session not found: {0}")]
    UnknownSession(String),
}

impl SessionError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingSessionId | Self::NotInitializeRequest => StatusCode::BAD_REQUEST,
            Self::UnknownSession(_) => StatusCode::NOT_FOUND,
        }
    }

    /// JSON-RPC error code carried in the body.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingSessionId | Self::NotInitializeRequest => ErrorCode::ServerError(-32000),
            Self::UnknownSession(_) => ErrorCode::ServerError(-32001),
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let body = JsonRpcError::new(
            None,
            JsonRpcErrorData::with_message(self.code(), self.to_string()),
        );
        (self.status(), Json(body)).into_response()
    }
}

/// One live MCP session.
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    server: tokio::sync::Mutex<McpServer>,
    events: Mutex<Option<broadcast::Sender<OutgoingNotification>>>,
    closed: AtomicBool,
    on_close: Mutex<Option<CloseHook>>,
}

impl Session {
    fn new(id: String, dispatcher: Dispatcher) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            id,
            created_at: Utc::now(),
            server: tokio::sync::Mutex::new(McpServer::new(dispatcher)),
            events: Mutex::new(Some(events)),
            closed: AtomicBool::new(false),
            on_close: Mutex::new(None),
        }
    }

    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the session was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Handles one serialised message. Requests of the same session are
    /// handled one at a time.
    pub async fn handle(&self, body: &str) -> Outbound {
        let mut server = self.server.lock().await;
        server.handle_line(body).await
    }

    /// Sends notifications to the session's SSE subscribers. Returns how
    /// many subscribers received them; zero when nobody listens.
    pub fn publish(&self, notifications: Vec<OutgoingNotification>) -> usize {
        let guard = self.events.lock();
        let Some(sender) = guard.as_ref() else {
            return 0;
        };
        let mut delivered = 0;
        for notification in notifications {
            delivered = sender.send(notification).unwrap_or(0);
        }
        delivered
    }

    /// Subscribes to server-to-client notifications, or `None` once closed.
    #[must_use]
    pub fn subscribe(&self) -> Option<broadcast::Receiver<OutgoingNotification>> {
        self.events.lock().as_ref().map(broadcast::Sender::subscribe)
    }

    /// Closes the session. Later calls do nothing.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // Dropping the sender ends every SSE stream.
        self.events.lock().take();
        if let Ok(mut server) = self.server.try_lock() {
            server.shut_down();
        }

        let hook = self.on_close.lock().take();
        if let Some(hook) = hook {
            hook(&self.id);
        }
        tracing::info!(session_id = %self.id, "Session closed");
    }

    fn set_on_close(&self, hook: CloseHook) {
        *self.on_close.lock() = Some(hook);
    }
}

/// Listing entry for `GET /sessions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session identifier.
    pub id: String,
    /// RFC 3339 creation time.
    pub created_at: String,
}

/// Owns every live session.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<SessionMap>>,
    dispatcher: Dispatcher,
}

impl SessionManager {
    /// Creates an empty manager whose sessions share `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            dispatcher,
        }
    }

    /// Creates a session under a fresh identifier.
    #[must_use]
    pub fn create(&self) -> Arc<Session> {
        let session = loop {
            let id = uuid::Uuid::new_v4().to_string();
            let mut sessions = self.sessions.lock();
            if sessions.contains_key(&id) {
                continue;
            }
            let session = Arc::new(Session::new(id.clone(), self.dispatcher.clone()));
            sessions.insert(id, Arc::clone(&session));
            break session;
        };

        let map: Weak<Mutex<SessionMap>> = Arc::downgrade(&self.sessions);
        session.set_on_close(Box::new(move |id| {
            if let Some(map) = map.upgrade() {
                map.lock().remove(id);
            }
        }));

        tracing::info!(session_id = %session.id(), "Session created");
        session
    }

    /// Looks up a live session.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.lock().get(id).cloned()
    }

    /// Closes the session with `id`. Returns whether it existed.
    pub fn close(&self, id: &str) -> bool {
        let Some(session) = self.get(id) else {
            return false;
        };
        session.close();
        true
    }

    /// Closes every live session.
    pub fn close_all(&self) {
        let sessions: Vec<Arc<Session>> = self.sessions.lock().values().cloned().collect();
        if !sessions.is_empty() {
            tracing::info!(count = sessions.len(), "Closing all sessions");
        }
        for session in sessions {
            session.close();
        }
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Whether no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Live sessions, oldest first.
    #[must_use]
    pub fn summaries(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<Arc<Session>> = self.sessions.lock().values().cloned().collect();
        sessions.sort_by_key(|s| s.created_at());
        sessions
            .iter()
            .map(|s| SessionSummary {
                id: s.id().to_string(),
                created_at: s.created_at().to_rfc3339_opts(SecondsFormat::Millis, true),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Dispatcher::new(None))
    }

    #[test]
    fn created_sessions_have_distinct_uuid_ids() {
        let manager = manager();
        let a = manager.create();
        let b = manager.create();
        assert_ne!(a.id(), b.id());
        assert!(uuid::Uuid::parse_str(a.id()).is_ok());
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn close_removes_entry_once() {
        let manager = manager();
        let session = manager.create();
        let id = session.id().to_string();

        assert!(manager.close(&id));
        assert!(session.is_closed());
        assert!(manager.get(&id).is_none());
        assert!(!manager.close(&id));

        session.close();
        assert!(manager.is_empty());
    }

    #[test]
    fn closing_the_session_itself_removes_the_entry() {
        let manager = manager();
        let session = manager.create();
        session.close();
        assert!(manager.is_empty());
        assert!(session.subscribe().is_none());
    }

    #[test]
    fn close_all_empties_the_map() {
        let manager = manager();
        let first = manager.create();
        let _second = manager.create();
        manager.close_all();
        assert!(manager.is_empty());
        assert!(first.is_closed());
    }

    #[tokio::test]
    async fn published_notifications_reach_subscribers() {
        let manager = manager();
        let session = manager.create();
        let mut receiver = session.subscribe().unwrap();

        let token = serde_json::json!(1);
        let delivered =
            session.publish(vec![OutgoingNotification::progress(&token, 1, Some(1), None)]);
        assert_eq!(delivered, 1);
        assert_eq!(receiver.recv().await.unwrap().method, "notifications/progress");

        session.close();
        assert!(receiver.recv().await.is_err());
    }

    #[test]
    fn session_errors_map_to_statuses() {
        assert_eq!(SessionError::MissingSessionId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(SessionError::NotInitializeRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            SessionError::UnknownSession("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
