//! tomba-mcp-server: MCP server for the Tomba email and contact discovery API
//!
//! Twelve read-only tools (domain search, email finder and verifier, phone
//! lookups, company search and more), seven resources and sixteen workflow
//! prompts, served over stdio or streamable HTTP.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Configuration error types
//! - [`schema`] — Declarative argument schemas and validation
//! - [`tools`] — Tool names, schemas and typed requests
//! - [`client`] — Tomba API client
//! - [`catalog`] — Tool, resource and prompt catalogues
//! - [`dispatch`] — Request routing
//! - [`mcp`] — MCP protocol implementation

pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod mcp;
pub mod schema;
pub mod tools;
