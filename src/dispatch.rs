//! Routes list, call, read and get requests to the catalogue and client.
//!
//! Every request reaches exactly one outcome: a success payload or a
//! [`DispatchError`]. Tool calls fold errors into an error-flagged
//! [`ToolCallResult`]; resources and prompts return them to the protocol
//! layer, which renders a JSON-RPC error.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::catalog::prompts::{self, PromptError};
use crate::catalog::resources::{self, ResourceTarget, JSON_MIME, MARKDOWN_MIME};
use crate::catalog::tool_definitions;
use crate::client::{ClientError, TombaClient};
use crate::mcp::protocol::ErrorCode;
use crate::mcp::types::{
    GetPromptResult, PromptDescriptor, ReadResourceResult, ResourceContents, ResourceDescriptor,
    ToolCallResult, ToolDefinition,
};
use crate::schema::ValidationError;
use crate::tools::{ToolName, ToolRequest};

/// Why a request could not be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Arguments violated the operation's schema.
    #[error("{}", .0.to_user_message())]
    Validation(#[from] ValidationError),

    /// Prompt arguments were incomplete, or the prompt does not exist.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// No credentials were configured, so there is no client.
    #[error("Tomba client not initialized. Please set API credentials first.")]
    NotInitialized,

    /// The remote call failed.
    #[error("Error: {0}")]
    Remote(#[from] ClientError),

    /// The tool name is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The resource URI matches no descriptor.
    #[error("Unknown resource URI: {0}")]
    UnknownResource(String),
}

impl DispatchError {
    /// JSON-RPC error code used when this error is returned as a protocol
    /// error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_)
            | Self::Prompt(_)
            | Self::UnknownTool(_)
            | Self::UnknownResource(_) => ErrorCode::InvalidParams,
            Self::NotInitialized | Self::Remote(_) => ErrorCode::InternalError,
        }
    }
}

/// Serves the MCP catalogue methods.
#[derive(Clone)]
pub struct Dispatcher {
    client: Option<TombaClient>,
}

impl Dispatcher {
    /// Creates a dispatcher. Without a client, only the static catalogue and
    /// static resources are available.
    #[must_use]
    pub const fn new(client: Option<TombaClient>) -> Self {
        Self { client }
    }

    /// Whether a client is configured.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.client.is_some()
    }

    /// Advertised tools.
    #[must_use]
    pub fn list_tools(&self) -> &'static [ToolDefinition] {
        tool_definitions()
    }

    /// Advertised resources.
    #[must_use]
    pub fn list_resources(&self) -> &'static [ResourceDescriptor] {
        resources::resource_list()
    }

    /// Advertised prompts.
    #[must_use]
    pub fn list_prompts(&self) -> Vec<&'static PromptDescriptor> {
        prompts::prompt_list().collect()
    }

    /// Calls a tool, rendering any failure as an error-flagged result.
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> ToolCallResult {
        match self.try_call_tool(name, arguments).await {
            Ok(value) => ToolCallResult::text(pretty(&value)),
            Err(error) => {
                tracing::warn!(tool = name, error = %error, "Tool call failed");
                ToolCallResult::error(error.to_string())
            }
        }
    }

    /// Calls a tool, returning the raw response.
    ///
    /// # Errors
    ///
    /// Fails with [`DispatchError::UnknownTool`] for an unregistered name,
    /// [`DispatchError::NotInitialized`] without credentials (before the
    /// arguments are looked at), [`DispatchError::Validation`] for invalid
    /// arguments and [`DispatchError::Remote`] when the API call fails.
    pub async fn try_call_tool(
        &self,
        name: &str,
        arguments: &Value,
    ) -> Result<Value, DispatchError> {
        let tool =
            ToolName::parse(name).ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;
        let client = self.client.as_ref().ok_or(DispatchError::NotInitialized)?;
        let request = ToolRequest::validate(tool, arguments)?;

        tracing::debug!(tool = name, "Calling tool");
        Ok(client.execute(&request).await?)
    }

    /// Reads a resource.
    ///
    /// Static documents are served without credentials. Templated resources
    /// validate their identifier with the matching tool's schema and then
    /// call the API.
    ///
    /// # Errors
    ///
    /// Fails with [`DispatchError::UnknownResource`] for an unknown URI, and
    /// otherwise as [`Dispatcher::try_call_tool`] does.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, DispatchError> {
        let target = ResourceTarget::resolve(uri)
            .ok_or_else(|| DispatchError::UnknownResource(uri.to_string()))?;
        tracing::debug!(uri, "Reading resource");

        let (mime_type, text) = match target.tool_call() {
            None => match target {
                ResourceTarget::ApiDocs => (MARKDOWN_MIME, resources::API_DOCS.to_string()),
                ResourceTarget::ToolDocs => (MARKDOWN_MIME, resources::tool_docs().to_string()),
                _ => (
                    JSON_MIME,
                    pretty(&resources::status_document(self.is_authenticated())),
                ),
            },
            Some((tool, arguments)) => {
                let client = self.client.as_ref().ok_or(DispatchError::NotInitialized)?;
                let request = ToolRequest::validate(tool, &arguments).map_err(|e| {
                    ValidationError {
                        context: format!("Invalid resource URI '{uri}'"),
                        issue: e.issue,
                    }
                })?;
                (JSON_MIME, pretty(&client.execute(&request).await?))
            }
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type,
                text,
            }],
        })
    }

    /// Expands a prompt.
    ///
    /// # Errors
    ///
    /// Fails with [`DispatchError::Prompt`] for an unknown prompt or missing
    /// arguments.
    pub fn get_prompt(
        &self,
        name: &str,
        arguments: &HashMap<String, String>,
    ) -> Result<GetPromptResult, DispatchError> {
        tracing::debug!(prompt = name, "Expanding prompt");
        Ok(prompts::get_prompt(name, arguments)?)
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_tool_is_reported_before_credentials() {
        let dispatcher = Dispatcher::new(None);
        let result = dispatcher.call_tool("send_email", &json!({})).await;
        assert!(result.is_error);
        assert_eq!(result.first_text(), "Unknown tool: send_email");
    }

    #[tokio::test]
    async fn missing_client_fails_before_validation() {
        let dispatcher = Dispatcher::new(None);
        let result = dispatcher.call_tool("email_count", &json!({})).await;
        assert!(result.is_error);
        assert!(result.first_text().contains("not initialized"));
    }

    #[tokio::test]
    async fn static_resources_need_no_credentials() {
        let dispatcher = Dispatcher::new(None);
        let status = dispatcher.read_resource("tomba://api/status").await.unwrap();
        let document: Value = serde_json::from_str(&status.contents[0].text).unwrap();
        assert_eq!(document["authenticated"], false);

        let docs = dispatcher.read_resource("tomba://docs/tools").await.unwrap();
        assert_eq!(docs.contents[0].mime_type, "text/markdown");
    }

    #[tokio::test]
    async fn templated_resources_need_credentials() {
        let dispatcher = Dispatcher::new(None);
        let error = dispatcher
            .read_resource("tomba://domain/stripe.com")
            .await
            .unwrap_err();
        assert_eq!(error, DispatchError::NotInitialized);
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn unknown_resource() {
        let error = Dispatcher::new(None)
            .read_resource("tomba://nothing")
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Unknown resource URI: tomba://nothing");
        assert_eq!(error.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn prompt_errors_pass_through() {
        let error = Dispatcher::new(None)
            .get_prompt("nope", &HashMap::new())
            .unwrap_err();
        assert_eq!(error.to_string(), "Unknown prompt: nope");
    }
}
