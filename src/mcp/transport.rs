//! stdio transport for the MCP server.
//!
//! - Messages are UTF-8 encoded JSON-RPC
//! - Messages are delimited by newlines and contain no embedded newlines
//! - stdin: receives messages from client
//! - stdout: sends messages to client
//! - stderr: logging only, never MCP messages
//!
//! The loop ends on EOF, SIGINT or SIGTERM (Ctrl+C on Windows).

use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::mcp::protocol::OutgoingNotification;
use crate::mcp::server::{McpServer, Outbound, Reply, ServerState};

/// A newline-delimited MCP transport over any reader/writer pair.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// The transport on the process's stdin and stdout.
pub type StdioTransport = LineTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdioTransport {
    /// Creates a new stdio transport.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a transport reading messages from `reader` and writing
    /// them to `writer`.
    #[must_use]
    pub const fn from_parts(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Reads the next message line.
    ///
    /// Returns `None` at EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }

    /// Writes the notifications of `outbound`, then its reply.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_outbound(&mut self, outbound: &Outbound) -> io::Result<()> {
        for notification in &outbound.notifications {
            self.write_notification(notification).await?;
        }
        if let Some(reply) = &outbound.reply {
            self.write_reply(reply).await?;
        }
        Ok(())
    }

    /// Writes a JSON-RPC reply.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_reply(&mut self, reply: &Reply) -> io::Result<()> {
        self.write_message(reply).await
    }

    /// Writes a JSON-RPC notification.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub async fn write_notification(
        &mut self,
        notification: &OutgoingNotification,
    ) -> io::Result<()> {
        self.write_message(notification).await
    }

    async fn write_message<T: Serialize>(&mut self, message: &T) -> io::Result<()> {
        let json = encode_line(message)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// Serialises a message to a single line.
fn encode_line<T: Serialize>(message: &T) -> io::Result<String> {
    let json =
        serde_json::to_string(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    debug_assert!(
        !json.contains('\n'),
        "JSON message must not contain embedded newlines"
    );
    Ok(json)
}

/// Serves one session over stdin/stdout until EOF or a shutdown signal.
///
/// # Errors
///
/// Returns an error if transport I/O fails or signal handlers cannot be
/// installed.
pub async fn run_stdio(mut server: McpServer) -> io::Result<()> {
    let mut transport = StdioTransport::new();
    tracing::info!("Serving MCP over stdio");
    run_until_shutdown(&mut server, &mut transport).await?;
    server.shut_down();
    tracing::info!("stdio transport closed");
    Ok(())
}

/// Handles the result from a transport read.
///
/// Returns `true` if the loop should stop.
async fn handle_read<R, W>(
    server: &mut McpServer,
    transport: &mut LineTransport<R, W>,
    line_result: io::Result<Option<String>>,
) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(line) = line_result? else {
        tracing::info!("Input closed");
        return Ok(true);
    };

    if line.trim().is_empty() {
        return Ok(false);
    }

    let outbound = server.handle_line(&line).await;
    transport.write_outbound(&outbound).await?;

    Ok(server.state() == ServerState::ShuttingDown)
}

/// Answers messages until EOF or until the server shuts down.
async fn serve_lines<R, W>(
    server: &mut McpServer,
    transport: &mut LineTransport<R, W>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let line_result = transport.read_line().await;
        if handle_read(server, transport, line_result).await? {
            return Ok(());
        }
    }
}

async fn run_until_shutdown(
    server: &mut McpServer,
    transport: &mut StdioTransport,
) -> io::Result<()> {
    tokio::select! {
        result = shutdown_signal() => result,
        result = serve_lines(server, transport) => result,
    }
}

/// Resolves once the process is asked to stop.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be installed.
#[cfg(unix)]
pub async fn shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown"),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
    Ok(())
}

/// Resolves once the process is asked to stop.
///
/// # Errors
///
/// Returns an error if the Ctrl+C handler cannot be installed.
#[cfg(windows)]
pub async fn shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Dispatcher;
    use crate::mcp::protocol::{JsonRpcError, JsonRpcResponse, RequestId};
    use serde_json::{json, Value};

    fn written_lines(writer: Vec<u8>) -> Vec<Value> {
        String::from_utf8(writer)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn transport_default() {
        let _transport = StdioTransport::default();
    }

    #[test]
    fn pretty_tool_output_still_encodes_to_one_line() {
        let response = JsonRpcResponse::success(
            RequestId::Number(1),
            serde_json::json!({
                "content": [{"type": "text", "text": "{\n  \"data\": {}\n}"}]
            }),
        );

        let json = encode_line(&Reply::Success(response)).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains(r"\n"));
    }

    #[test]
    fn error_reply_encodes_to_one_line() {
        let error = JsonRpcError::method_not_found(RequestId::Number(1), "test/method");
        let json = encode_line(&Reply::Error(error)).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains(r#""code":-32601"#));
    }

    #[tokio::test]
    async fn messages_split_across_reads_are_framed_by_newline() {
        let reader = tokio_test::io::Builder::new()
            .read(br#"{"jsonrpc":"2.0","id":1,"#)
            .read(b"\"method\":\"ping\"}\r\n\n")
            .read(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n")
            .build();
        let mut transport = LineTransport::from_parts(BufReader::new(reader), Vec::new());
        let mut server = McpServer::new(Dispatcher::new(None));

        serve_lines(&mut server, &mut transport).await.unwrap();

        let lines = written_lines(transport.writer);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[0]["result"], json!({}));
        assert_eq!(lines[1]["id"], 2);
        assert_eq!(lines[1]["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn unparseable_line_is_answered_and_the_loop_continues() {
        let reader = tokio_test::io::Builder::new()
            .read(b"not json\n")
            .read(b"{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n")
            .build();
        let mut transport = LineTransport::from_parts(BufReader::new(reader), Vec::new());
        let mut server = McpServer::new(Dispatcher::new(None));

        serve_lines(&mut server, &mut transport).await.unwrap();

        let lines = written_lines(transport.writer);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["error"]["code"], -32700);
        assert_eq!(lines[1]["id"], 7);
    }
}
