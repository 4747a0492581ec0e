//! Static catalogues answered by the list methods.
//!
//! The arrays are built once and never change for the lifetime of the
//! process, so repeated list calls return identical results.

pub mod prompts;
pub mod resources;

use once_cell::sync::Lazy;

use crate::mcp::types::{ToolAnnotations, ToolDefinition};
use crate::tools::all_specs;

static TOOL_DEFINITIONS: Lazy<Vec<ToolDefinition>> = Lazy::new(|| {
    all_specs()
        .iter()
        .map(|spec| ToolDefinition {
            name: spec.name.as_str().to_string(),
            description: Some(spec.description.to_string()),
            input_schema: spec.schema.to_json_schema(),
            annotations: Some(ToolAnnotations {
                read_only_hint: true,
            }),
        })
        .collect()
});

/// Returns the advertised tool definitions.
#[must_use]
pub fn tool_definitions() -> &'static [ToolDefinition] {
    &TOOL_DEFINITIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolName;

    #[test]
    fn every_tool_is_advertised_read_only() {
        let names: Vec<&str> = tool_definitions().iter().map(|t| t.name.as_str()).collect();
        let expected: Vec<&str> = ToolName::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, expected);
        assert!(tool_definitions()
            .iter()
            .all(|t| t.annotations.as_ref().is_some_and(|a| a.read_only_hint)));
    }

    #[test]
    fn phone_finder_schema_advertises_alternatives() {
        let phone_finder = tool_definitions()
            .iter()
            .find(|t| t.name == "phone_finder")
            .unwrap();
        assert_eq!(phone_finder.input_schema["anyOf"].as_array().unwrap().len(), 3);
    }
}
