//! The tool catalogue: names, argument schemas and typed requests.
//!
//! Every tool has an entry in the [registry](registry::spec) holding its
//! description and [`Schema`](crate::schema::Schema). A call's raw arguments
//! are validated against that schema and then deserialised into a
//! [`ToolRequest`], which is the only input the remote client accepts.

mod registry;
mod requests;

use std::fmt;

pub use registry::{all_specs, spec, ToolSpec};
pub use requests::{
    AuthorFinderRequest, CompaniesFilters, CompaniesSearchRequest, DomainRequest,
    DomainSearchRequest, EmailFinderRequest, EmailLookupRequest, IncludeExclude,
    LinkedinFinderRequest, PhoneFinderRequest, PhoneValidatorRequest, ToolRequest,
};

/// Names of the tools exposed to protocol clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Search emails by domain or company.
    DomainSearch,
    /// Find a person's email address.
    EmailFinder,
    /// Verify an email address.
    EmailVerifier,
    /// Enrich an email address with profile data.
    EmailEnrichment,
    /// Find the authors of an article.
    AuthorFinder,
    /// Find the email behind a LinkedIn profile.
    LinkedinFinder,
    /// Find phone numbers.
    PhoneFinder,
    /// Validate a phone number.
    PhoneValidator,
    /// Count the addresses known for a domain.
    EmailCount,
    /// Find domains similar to one.
    SimilarFinder,
    /// Reveal a website's technology stack.
    TechnologyFinder,
    /// Search companies with free text and filters.
    CompaniesSearch,
}

impl ToolName {
    /// Every tool, in advertised order.
    pub const ALL: [Self; 12] = [
        Self::DomainSearch,
        Self::EmailFinder,
        Self::EmailVerifier,
        Self::EmailEnrichment,
        Self::AuthorFinder,
        Self::LinkedinFinder,
        Self::PhoneFinder,
        Self::PhoneValidator,
        Self::EmailCount,
        Self::SimilarFinder,
        Self::TechnologyFinder,
        Self::CompaniesSearch,
    ];

    /// Wire name of the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DomainSearch => "domain_search",
            Self::EmailFinder => "email_finder",
            Self::EmailVerifier => "email_verifier",
            Self::EmailEnrichment => "email_enrichment",
            Self::AuthorFinder => "author_finder",
            Self::LinkedinFinder => "linkedin_finder",
            Self::PhoneFinder => "phone_finder",
            Self::PhoneValidator => "phone_validator",
            Self::EmailCount => "email_count",
            Self::SimilarFinder => "similar_finder",
            Self::TechnologyFinder => "technology_finder",
            Self::CompaniesSearch => "companies_search",
        }
    }

    /// Looks a tool up by wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    /// Position of the tool in [`ToolName::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
