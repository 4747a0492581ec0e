//! Typed tool requests.
//!
//! These are deserialised from the normalised output of the validator, so
//! constructing one from raw arguments always goes through
//! [`ToolRequest::validate`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{spec, ToolName};
use crate::schema::{validate_one, FieldError, IssueCode, ValidationError};

/// Arguments of `domain_search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSearchRequest {
    pub domain: Option<String>,
    pub company: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub department: Option<String>,
    pub country: Option<String>,
}

/// Arguments of `email_finder`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailFinderRequest {
    pub domain: Option<String>,
    pub company: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub enrich_mobile: Option<bool>,
}

/// Arguments of `email_verifier` and `email_enrichment`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLookupRequest {
    pub email: String,
    pub enrich_mobile: Option<bool>,
}

/// Arguments of `author_finder`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorFinderRequest {
    pub url: String,
}

/// Arguments of `linkedin_finder`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedinFinderRequest {
    pub url: String,
    pub enrich_mobile: Option<bool>,
}

/// Arguments of `phone_finder`. At least one lookup key is present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhoneFinderRequest {
    pub email: Option<String>,
    pub domain: Option<String>,
    pub linkedin: Option<String>,
    pub full: Option<bool>,
}

/// Arguments of `phone_validator`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhoneValidatorRequest {
    pub phone: String,
    pub country: Option<String>,
}

/// Arguments of the tools keyed by a single domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainRequest {
    pub domain: String,
}

/// An include/exclude pair for one companies search dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeExclude {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

/// Companies search filters, one optional bucket per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompaniesFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_city: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_state: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_country: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<IncludeExclude>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub company_type: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sic: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naics: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded: Option<IncludeExclude>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar: Option<IncludeExclude>,
}

/// Arguments of `companies_search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompaniesSearchRequest {
    pub query: Option<String>,
    pub filters: Option<CompaniesFilters>,
    pub page: u32,
    pub limit: Option<u32>,
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    DomainSearch(DomainSearchRequest),
    EmailFinder(EmailFinderRequest),
    EmailVerifier(EmailLookupRequest),
    EmailEnrichment(EmailLookupRequest),
    AuthorFinder(AuthorFinderRequest),
    LinkedinFinder(LinkedinFinderRequest),
    PhoneFinder(PhoneFinderRequest),
    PhoneValidator(PhoneValidatorRequest),
    EmailCount(DomainRequest),
    SimilarFinder(DomainRequest),
    TechnologyFinder(DomainRequest),
    CompaniesSearch(CompaniesSearchRequest),
}

impl ToolRequest {
    /// Validates raw call arguments for `tool`.
    ///
    /// # Errors
    ///
    /// Returns the first schema violation, in the context of the tool name.
    pub fn validate(tool: ToolName, raw: &Value) -> Result<Self, ValidationError> {
        let object = validate_one(&spec(tool).schema, raw).map_err(|issue| ValidationError {
            context: context(tool),
            issue,
        })?;

        Ok(match tool {
            ToolName::DomainSearch => Self::DomainSearch(typed(tool, object)?),
            ToolName::EmailFinder => Self::EmailFinder(typed(tool, object)?),
            ToolName::EmailVerifier => Self::EmailVerifier(typed(tool, object)?),
            ToolName::EmailEnrichment => Self::EmailEnrichment(typed(tool, object)?),
            ToolName::AuthorFinder => Self::AuthorFinder(typed(tool, object)?),
            ToolName::LinkedinFinder => Self::LinkedinFinder(typed(tool, object)?),
            ToolName::PhoneFinder => Self::PhoneFinder(typed(tool, object)?),
            ToolName::PhoneValidator => Self::PhoneValidator(typed(tool, object)?),
            ToolName::EmailCount => Self::EmailCount(typed(tool, object)?),
            ToolName::SimilarFinder => Self::SimilarFinder(typed(tool, object)?),
            ToolName::TechnologyFinder => Self::TechnologyFinder(typed(tool, object)?),
            ToolName::CompaniesSearch => Self::CompaniesSearch(typed(tool, object)?),
        })
    }

    /// The tool this request is for.
    #[must_use]
    pub const fn tool(&self) -> ToolName {
        match self {
            Self::DomainSearch(_) => ToolName::DomainSearch,
            Self::EmailFinder(_) => ToolName::EmailFinder,
            Self::EmailVerifier(_) => ToolName::EmailVerifier,
            Self::EmailEnrichment(_) => ToolName::EmailEnrichment,
            Self::AuthorFinder(_) => ToolName::AuthorFinder,
            Self::LinkedinFinder(_) => ToolName::LinkedinFinder,
            Self::PhoneFinder(_) => ToolName::PhoneFinder,
            Self::PhoneValidator(_) => ToolName::PhoneValidator,
            Self::EmailCount(_) => ToolName::EmailCount,
            Self::SimilarFinder(_) => ToolName::SimilarFinder,
            Self::TechnologyFinder(_) => ToolName::TechnologyFinder,
            Self::CompaniesSearch(_) => ToolName::CompaniesSearch,
        }
    }
}

fn context(tool: ToolName) -> String {
    format!("Invalid arguments for tool '{tool}'")
}

fn typed<T: DeserializeOwned>(
    tool: ToolName,
    object: Map<String, Value>,
) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| ValidationError {
        context: context(tool),
        issue: FieldError {
            path: String::new(),
            message: e.to_string(),
            code: IssueCode::InvalidType,
        },
    })
}
