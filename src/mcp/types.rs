//! MCP request parameters and result payloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
pub(crate) const fn is_false(b: &bool) -> bool {
    !*b
}

/// Behavioural hints attached to a tool definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// The tool does not modify its environment.
    pub read_only_hint: bool,
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
    /// Behavioural hints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
    /// Request metadata, carrying the optional progress token.
    #[serde(default, rename = "_meta")]
    pub meta: Option<RequestMeta>,
}

/// The `_meta` object of a request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    /// Token to echo in progress notifications.
    #[serde(default)]
    pub progress_token: Option<Value>,
}

/// Content item in a tool call response or prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

impl ToolContent {
    /// Returns the text of the item.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Returns the text of the first content item.
    #[must_use]
    pub fn first_text(&self) -> &str {
        self.content.first().map_or("", ToolContent::as_text)
    }
}

/// A resource descriptor for resources/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Resource URI, possibly templated (`tomba://domain/{domain}`).
    pub uri: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// MIME type of the contents.
    pub mime_type: &'static str,
}

/// Parameters for resources/read request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    /// URI to read.
    pub uri: String,
}

/// One item of a resources/read response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// The URI that was read.
    pub uri: String,
    /// MIME type of `text`.
    pub mime_type: &'static str,
    /// The contents.
    pub text: String,
}

/// Result of resources/read.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    /// Resource contents.
    pub contents: Vec<ResourceContents>,
}

/// A named prompt argument.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Whether the argument must be supplied.
    pub required: bool,
}

/// A prompt descriptor for prompts/list response.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDescriptor {
    /// Prompt name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Declared arguments.
    pub arguments: Vec<PromptArgument>,
}

/// Parameters for prompts/get request.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPromptParams {
    /// Prompt name.
    pub name: String,
    /// Argument values.
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}

/// A message of an expanded prompt.
#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    /// Message author role (always `user`).
    pub role: &'static str,
    /// Message content.
    pub content: ToolContent,
}

/// Result of prompts/get.
#[derive(Debug, Clone, Serialize)]
pub struct GetPromptResult {
    /// Prompt description.
    pub description: &'static str,
    /// Expanded messages.
    pub messages: Vec<PromptMessage>,
}

impl GetPromptResult {
    /// Returns the text of the first message.
    #[must_use]
    pub fn text(&self) -> &str {
        self.messages.first().map_or("", |m| m.content.as_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_result_serialises_is_error() {
        let value = serde_json::to_value(ToolCallResult::error("Unknown tool: x")).unwrap();
        assert_eq!(
            value,
            json!({"content": [{"type": "text", "text": "Unknown tool: x"}], "isError": true})
        );
    }

    #[test]
    fn success_result_omits_is_error() {
        let value = serde_json::to_value(ToolCallResult::text("{}")).unwrap();
        assert!(value.get("isError").is_none());
    }

    #[test]
    fn tool_call_params_read_progress_token() {
        let params: ToolCallParams = serde_json::from_value(json!({
            "name": "email_count",
            "arguments": {"domain": "stripe.com"},
            "_meta": {"progressToken": 7}
        }))
        .unwrap();
        assert_eq!(params.meta.unwrap().progress_token, Some(json!(7)));
    }

    #[test]
    fn resource_descriptor_uses_camel_case() {
        let value = serde_json::to_value(ResourceDescriptor {
            uri: "tomba://docs/api",
            name: "API Documentation",
            description: "docs",
            mime_type: "text/markdown",
        })
        .unwrap();
        assert_eq!(value["mimeType"], "text/markdown");
    }
}
