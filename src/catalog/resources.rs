//! Resource descriptors, URI resolution and static documents.

use std::fmt::Write as _;

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::mcp::protocol::SERVER_NAME;
use crate::mcp::types::ResourceDescriptor;
use crate::schema::{FieldKind, Rule};
use crate::tools::{all_specs, ToolName};

/// MIME type of JSON resources.
pub const JSON_MIME: &str = "application/json";

/// MIME type of markdown resources.
pub const MARKDOWN_MIME: &str = "text/markdown";

const DOMAIN_PREFIX: &str = "tomba://domain/";
const EMAIL_PREFIX: &str = "tomba://email/";
const SIMILAR_PREFIX: &str = "tomba://similar/";
const TECHNOLOGY_PREFIX: &str = "tomba://technology/";

/// URI of the status document.
pub const STATUS_URI: &str = "tomba://api/status";
/// URI of the API guide.
pub const API_DOCS_URI: &str = "tomba://docs/api";
/// URI of the generated tool reference.
pub const TOOL_DOCS_URI: &str = "tomba://docs/tools";

static RESOURCES: &[ResourceDescriptor] = &[
    ResourceDescriptor {
        uri: STATUS_URI,
        name: "API Status",
        description: "Current Tomba API status and account information",
        mime_type: JSON_MIME,
    },
    ResourceDescriptor {
        uri: "tomba://domain/{domain}",
        name: "Domain Information",
        description: "Get complete information about a specific domain",
        mime_type: JSON_MIME,
    },
    ResourceDescriptor {
        uri: "tomba://email/{email}",
        name: "Email Information",
        description: "Get complete information about a specific email address",
        mime_type: JSON_MIME,
    },
    ResourceDescriptor {
        uri: API_DOCS_URI,
        name: "API Documentation",
        description: "Tomba API documentation and usage guide",
        mime_type: MARKDOWN_MIME,
    },
    ResourceDescriptor {
        uri: TOOL_DOCS_URI,
        name: "Available Tools",
        description: "List and description of all available Tomba tools",
        mime_type: MARKDOWN_MIME,
    },
    ResourceDescriptor {
        uri: "tomba://similar/{domain}",
        name: "Similar Domains",
        description: "Find similar domains based on a specific domain",
        mime_type: JSON_MIME,
    },
    ResourceDescriptor {
        uri: "tomba://technology/{domain}",
        name: "Domain Technology Stack",
        description: "Get technology stack information for a specific domain",
        mime_type: JSON_MIME,
    },
];

/// Returns the advertised resources.
#[must_use]
pub fn resource_list() -> &'static [ResourceDescriptor] {
    RESOURCES
}

/// What a resource URI refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceTarget {
    /// The server status document.
    Status,
    /// The API guide.
    ApiDocs,
    /// The generated tool reference.
    ToolDocs,
    /// Domain search for the identifier.
    Domain(String),
    /// Email enrichment for the identifier.
    Email(String),
    /// Similar domains for the identifier.
    Similar(String),
    /// Technology stack for the identifier.
    Technology(String),
}

impl ResourceTarget {
    /// Resolves a URI. Templated URIs match by literal prefix and the
    /// remainder is taken verbatim.
    #[must_use]
    pub fn resolve(uri: &str) -> Option<Self> {
        match uri {
            STATUS_URI => return Some(Self::Status),
            API_DOCS_URI => return Some(Self::ApiDocs),
            TOOL_DOCS_URI => return Some(Self::ToolDocs),
            _ => {}
        }

        if let Some(id) = uri.strip_prefix(DOMAIN_PREFIX) {
            Some(Self::Domain(id.to_string()))
        } else if let Some(id) = uri.strip_prefix(EMAIL_PREFIX) {
            Some(Self::Email(id.to_string()))
        } else if let Some(id) = uri.strip_prefix(SIMILAR_PREFIX) {
            Some(Self::Similar(id.to_string()))
        } else {
            uri.strip_prefix(TECHNOLOGY_PREFIX)
                .map(|id| Self::Technology(id.to_string()))
        }
    }

    /// For templated targets, the tool and raw arguments that serve it.
    #[must_use]
    pub fn tool_call(&self) -> Option<(ToolName, Value)> {
        match self {
            Self::Status | Self::ApiDocs | Self::ToolDocs => None,
            Self::Domain(domain) => Some((
                ToolName::DomainSearch,
                json!({ "domain": domain, "limit": 10 }),
            )),
            Self::Email(email) => Some((ToolName::EmailEnrichment, json!({ "email": email }))),
            Self::Similar(domain) => Some((ToolName::SimilarFinder, json!({ "domain": domain }))),
            Self::Technology(domain) => {
                Some((ToolName::TechnologyFinder, json!({ "domain": domain })))
            }
        }
    }
}

/// Builds the status document.
#[must_use]
pub fn status_document(authenticated: bool) -> Value {
    json!({
        "status": "operational",
        "server": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": authenticated,
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

/// The API guide.
pub const API_DOCS: &str = "# Tomba API Documentation

## Overview
Tomba is an email finding and verification service that helps you discover and validate email addresses.

## Authentication
Requests are authenticated with an API key and a secret key, sent as the
`X-Tomba-Key` and `X-Tomba-Secret` headers. Set them with `--api-key` and
`--secret-key`, the `TOMBA_API_KEY` and `TOMBA_SECRET_KEY` environment
variables, or the `credentials` section of the configuration file.

## Rate Limits
- Free tier: 50 requests per month
- Paid tiers: Varies by plan

## API Endpoints
- Domain Search: Find all email addresses for a domain
- Email Finder: Find specific email addresses
- Email Verifier: Verify email deliverability
- Email Enrichment: Get additional data about an email
- Author Finder: Find author emails from articles
- LinkedIn Finder: Find emails from LinkedIn profiles
- Phone Finder: Find phone numbers
- Phone Validator: Validate phone numbers
- Email Count: Count the addresses known for a domain
- Similar Finder: Find domains similar to a domain
- Technology Finder: Reveal the technology stack of a website
- Companies Search: Find companies with natural language and filters

## Support
Visit https://tomba.io for more information.
";

static TOOL_DOCS: Lazy<String> = Lazy::new(render_tool_docs);

/// The tool reference, generated from the tool registry.
#[must_use]
pub fn tool_docs() -> &'static str {
    &TOOL_DOCS
}

fn render_tool_docs() -> String {
    let mut doc = String::from("# Available Tomba Tools\n");

    for (i, spec) in all_specs().iter().enumerate() {
        let schema = &spec.schema;
        let _ = write!(doc, "\n## {}. {}\n{}\n", i + 1, spec.name, spec.description);

        let mut required: Vec<String> = schema
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.to_string())
            .collect();
        for rule in schema.rules() {
            let Rule::AnyGroup { groups, .. } = rule;
            let alternatives: Vec<String> = groups.iter().map(|g| g.join(" + ")).collect();
            required.push(format!("one of ({})", alternatives.join(", ")));
        }

        let in_rule = |name: &str| {
            schema.rules().iter().any(|rule| {
                let Rule::AnyGroup { groups, .. } = rule;
                groups.iter().flatten().any(|field| *field == name)
            })
        };
        let optional: Vec<String> = schema
            .fields()
            .iter()
            .filter(|f| !f.required && !in_rule(f.name))
            .map(|f| match &f.kind {
                FieldKind::Object(nested) => {
                    let keys: Vec<&str> = nested.fields().iter().map(|n| n.name).collect();
                    format!("{} ({})", f.name, keys.join(", "))
                }
                _ => f.name.to_string(),
            })
            .collect();

        if !required.is_empty() {
            let _ = writeln!(doc, "- **Required**: {}", required.join("; "));
        }
        if !optional.is_empty() {
            let _ = writeln!(doc, "- **Optional**: {}", optional.join(", "));
        }
    }

    doc
}
