//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the Tomba tools, resources and prompts to AI assistants over
//! JSON-RPC 2.0, on stdio or streamable HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          MCP Server                          │
//! │                                                              │
//! │   ┌──────────────┐    ┌─────────────┐    ┌──────────────┐    │
//! │   │  Transport   │───▶│   Server    │───▶│  Dispatcher  │    │
//! │   │ (stdio/HTTP) │    │ (lifecycle) │    │ (catalogue)  │    │
//! │   └──────────────┘    └─────────────┘    └──────────────┘    │
//! │          │                  │                   │            │
//! │          ▼                  ▼                   ▼            │
//! │   ┌──────────────────────────────────────────────────┐       │
//! │   │                JSON-RPC Messages                 │       │
//! │   └──────────────────────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod http;
pub mod protocol;
pub mod server;
pub mod transport;
pub mod types;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::{McpServer, Outbound, Reply};
pub use transport::{run_stdio, LineTransport, StdioTransport};
