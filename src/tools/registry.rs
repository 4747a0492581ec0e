//! Argument schemas for every tool.

use once_cell::sync::Lazy;
use serde_json::json;

use super::ToolName;
use crate::schema::enums::{
    COMPANY_SIZES, COMPANY_TYPES, DEPARTMENTS, DOMAIN_SEARCH_LIMITS, INDUSTRIES, REVENUE_RANGES,
};
use crate::schema::{Field, FieldKind, IntegerRules, Pattern, Rule, Schema, StringRules};

/// A tool's advertised description and argument schema.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// The tool.
    pub name: ToolName,
    /// Human-readable description.
    pub description: &'static str,
    /// Argument schema.
    pub schema: Schema,
}

static REGISTRY: Lazy<Vec<ToolSpec>> = Lazy::new(|| ToolName::ALL.into_iter().map(build).collect());

/// Returns the spec for `tool`.
#[must_use]
pub fn spec(tool: ToolName) -> &'static ToolSpec {
    &REGISTRY[tool.index()]
}

/// Returns every spec, in advertised order.
#[must_use]
pub fn all_specs() -> &'static [ToolSpec] {
    &REGISTRY
}

fn build(name: ToolName) -> ToolSpec {
    let (description, schema) = match name {
        ToolName::DomainSearch => ("Search emails based on domain name", domain_search()),
        ToolName::EmailFinder => (
            "Find email address from domain, first name and last name",
            email_finder(),
        ),
        ToolName::EmailVerifier => (
            "Verify email address deliverability",
            email_lookup("Email address to verify"),
        ),
        ToolName::EmailEnrichment => (
            "Enrich email with additional data",
            email_lookup("Email address to enrich"),
        ),
        ToolName::AuthorFinder => (
            "Find email addresses of article authors",
            Schema::new().field(
                Field::new("url", "URL of the article", url(Pattern::Url)).required(),
            ),
        ),
        ToolName::LinkedinFinder => (
            "Find email addresses from LinkedIn URLs",
            Schema::new()
                .field(
                    Field::new("url", "LinkedIn profile URL", url(Pattern::LinkedinUrl))
                        .required(),
                )
                .field(enrich_mobile()),
        ),
        ToolName::PhoneFinder => (
            "Search phone numbers based on email, domain, or LinkedIn",
            phone_finder(),
        ),
        ToolName::PhoneValidator => (
            "Validate phone numbers and check carrier information",
            Schema::new()
                .field(
                    Field::new(
                        "phone",
                        "Phone number to validate",
                        StringRules::default()
                            .strip_whitespace()
                            .pattern(Pattern::Phone),
                    )
                    .required(),
                )
                .field(Field::new(
                    "country",
                    "Country code in ISO 3166-1 alpha-2 format (e.g., 'US')",
                    country(),
                )),
        ),
        ToolName::EmailCount => (
            "Get the total number of email addresses for a domain",
            domain_only("Domain name to count emails for"),
        ),
        ToolName::SimilarFinder => (
            "Find similar domains based on a specific domain",
            domain_only("Domain name to find similar domains for"),
        ),
        ToolName::TechnologyFinder => (
            "Instantly reveal the technology stack of any website",
            domain_only("Domain name to analyze technology stack for"),
        ),
        ToolName::CompaniesSearch => (
            "Search for companies using natural language queries with advanced filters",
            companies_search(),
        ),
    };

    ToolSpec {
        name,
        description,
        schema,
    }
}

fn domain() -> StringRules {
    StringRules::default().lowercase().pattern(Pattern::Domain)
}

fn email() -> StringRules {
    StringRules::default().lowercase().pattern(Pattern::Email)
}

fn url(pattern: Pattern) -> StringRules {
    StringRules::default().pattern(pattern)
}

fn country() -> StringRules {
    StringRules::default().pattern(Pattern::CountryCode)
}

fn company() -> StringRules {
    StringRules::default().length(1, 100)
}

/// Page numbers are carried as `u32` once validated.
fn page_rules() -> IntegerRules {
    IntegerRules::default().range(1, i64::from(u32::MAX))
}

fn page() -> Field {
    Field::new("page", "Page number for pagination", page_rules()).default_value(json!(1))
}

fn enrich_mobile() -> Field {
    Field::new(
        "enrichMobile",
        "Whether to enrich with mobile phone data",
        FieldKind::Boolean,
    )
}

fn domain_only(description: &'static str) -> Schema {
    Schema::new().field(Field::new("domain", description, domain()).required())
}

fn email_lookup(description: &'static str) -> Schema {
    Schema::new()
        .field(Field::new("email", description, email()).required())
        .field(enrich_mobile())
}

fn domain_search() -> Schema {
    Schema::new()
        .field(Field::new(
            "domain",
            "The domain name to search for emails",
            domain(),
        ))
        .field(Field::new(
            "company",
            "The company name to search for",
            company(),
        ))
        .field(
            Field::new(
                "limit",
                "Maximum number of results to return",
                IntegerRules::default().one_of(DOMAIN_SEARCH_LIMITS),
            )
            .default_value(json!(10)),
        )
        .field(page())
        .field(Field::new(
            "department",
            "Filter by department",
            StringRules::default().one_of(DEPARTMENTS),
        ))
        .field(Field::new(
            "country",
            "Filter by country code (ISO 3166-1 alpha-2)",
            country(),
        ))
        .rule(Rule::at_least_one_of(&["domain", "company"]))
}

fn email_finder() -> Schema {
    Schema::new()
        .field(Field::new("domain", "The domain name", domain()))
        .field(Field::new("company", "The company name", company()))
        .field(Field::new(
            "fullName",
            "Full name of the person",
            StringRules::default().length(1, 200),
        ))
        .field(Field::new(
            "firstName",
            "First name of the person",
            StringRules::default().length(1, 100),
        ))
        .field(Field::new(
            "lastName",
            "Last name of the person",
            StringRules::default().length(1, 100),
        ))
        .field(enrich_mobile())
        .rule(Rule::at_least_one_of(&["domain", "company"]))
        .rule(Rule::any_group(
            &[&["fullName"], &["firstName", "lastName"]],
            "fullName",
            "Either fullName or both firstName and lastName are required",
        ))
}

fn phone_finder() -> Schema {
    Schema::new()
        .field(Field::new("email", "Email address", email()))
        .field(Field::new("domain", "Domain name", domain()))
        .field(Field::new(
            "linkedin",
            "LinkedIn profile URL",
            url(Pattern::LinkedinUrl),
        ))
        .field(Field::new(
            "full",
            "Whether to return full phone details",
            FieldKind::Boolean,
        ))
        .rule(Rule::at_least_one_of(&["email", "domain", "linkedin"]))
}

fn bucket(
    include: &'static str,
    exclude: &'static str,
    include_kind: StringRules,
    exclude_kind: StringRules,
) -> Schema {
    Schema::new()
        .field(Field::new(
            "include",
            include,
            FieldKind::array_of(include_kind),
        ))
        .field(Field::new(
            "exclude",
            exclude,
            FieldKind::array_of(exclude_kind),
        ))
}

fn text_bucket(include: &'static str, exclude: &'static str) -> Schema {
    bucket(include, exclude, StringRules::default(), StringRules::default())
}

fn companies_filters() -> Schema {
    let types = StringRules::default().one_of(COMPANY_TYPES);
    let sizes = StringRules::default().one_of(COMPANY_SIZES);
    let revenues = StringRules::default().one_of(REVENUE_RANGES);
    let year = StringRules::default().pattern(Pattern::Year);

    Schema::new()
        .field(Field::new(
            "location_city",
            "Filter by city",
            text_bucket("Cities to include", "Cities to exclude"),
        ))
        .field(Field::new(
            "location_state",
            "Filter by state",
            text_bucket("States to include", "States to exclude"),
        ))
        .field(Field::new(
            "location_country",
            "Filter by country",
            text_bucket("Countries to include", "Countries to exclude"),
        ))
        .field(Field::new(
            "industry",
            "Filter by industry (based on LinkedIn Industry Codes V2). Use keywords filter if industry not listed.",
            bucket(
                "Industries to include (based on LinkedIn Industry Codes V2)",
                "Industries to exclude",
                StringRules::default().one_of(INDUSTRIES),
                StringRules::default(),
            ),
        ))
        .field(Field::new(
            "type",
            "Filter by company type: education, government, nonprofit, private, public, personal",
            bucket(
                "Company types to include",
                "Company types to exclude",
                types.clone(),
                types,
            ),
        ))
        .field(Field::new(
            "size",
            "Filter by company size range: 1-10 (Micro), 11-50 (Small), 51-250 (Mid-sized), 251-1K (Medium-large), 1K-5K (Large), 5K-10K (Very large), 10K-50K (Enterprise), 50K-100K (Massive), 100K+ (Global)",
            bucket(
                "Company sizes to include",
                "Company sizes to exclude",
                sizes.clone(),
                sizes,
            ),
        ))
        .field(Field::new(
            "revenue",
            "Filter by annual revenue range",
            bucket(
                "Revenue ranges to include",
                "Revenue ranges to exclude",
                revenues.clone(),
                revenues,
            ),
        ))
        .field(Field::new(
            "sic",
            "Filter by SIC codes",
            text_bucket("SIC codes to include", "SIC codes to exclude"),
        ))
        .field(Field::new(
            "naics",
            "Filter by NAICS codes",
            text_bucket("NAICS codes to include", "NAICS codes to exclude"),
        ))
        .field(Field::new(
            "keywords",
            "Filter by keywords (use this if your target industry is not in the industry list)",
            text_bucket("Keywords to include", "Keywords to exclude"),
        ))
        .field(Field::new(
            "founded",
            "Filter by founding year",
            bucket(
                "Founding years to include",
                "Founding years to exclude",
                year.clone(),
                year,
            ),
        ))
        .field(Field::new(
            "similar",
            "Filter by similar domains",
            bucket(
                "Similar domains to include",
                "Similar domains to exclude",
                domain(),
                domain(),
            ),
        ))
}

fn companies_search() -> Schema {
    Schema::new()
        .field(Field::new(
            "query",
            "Natural language description of the companies to find",
            StringRules::default().length(1, 500),
        ))
        .field(Field::new(
            "filters",
            "Advanced filters for company search",
            companies_filters(),
        ))
        .field(
            Field::new(
                "page",
                "Page number for pagination (default: 1)",
                page_rules(),
            )
            .default_value(json!(1)),
        )
        .field(Field::new(
            "limit",
            "Maximum number of companies to return",
            IntegerRules::default().range(1, 100),
        ))
        .rule(Rule::at_least_one_of(&["query", "filters"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_one;

    #[test]
    fn registry_is_in_advertised_order() {
        let names: Vec<ToolName> = all_specs().iter().map(|s| s.name).collect();
        assert_eq!(names, ToolName::ALL.to_vec());
        for tool in ToolName::ALL {
            assert_eq!(spec(tool).name, tool);
        }
    }

    #[test]
    fn domain_search_defaults() {
        let object = validate_one(
            &spec(ToolName::DomainSearch).schema,
            &json!({"domain": "Stripe.com"}),
        )
        .unwrap();
        assert_eq!(object["domain"], "stripe.com");
        assert_eq!(object["limit"], 10);
        assert_eq!(object["page"], 1);
    }

    #[test]
    fn email_finder_needs_names() {
        let schema = &spec(ToolName::EmailFinder).schema;
        let error = validate_one(schema, &json!({"domain": "stripe.com", "firstName": "Jane"}))
            .unwrap_err();
        assert_eq!(error.path, "fullName");

        assert!(validate_one(
            schema,
            &json!({"domain": "stripe.com", "firstName": "Jane", "lastName": "Doe"})
        )
        .is_ok());
        assert!(
            validate_one(schema, &json!({"company": "Stripe", "fullName": "Jane Doe"})).is_ok()
        );
    }

    #[test]
    fn phone_validator_strips_whitespace() {
        let object = validate_one(
            &spec(ToolName::PhoneValidator).schema,
            &json!({"phone": " +1 415 555 0123 "}),
        )
        .unwrap();
        assert_eq!(object["phone"], "+14155550123");
    }

    #[test]
    fn companies_search_filters() {
        let schema = &spec(ToolName::CompaniesSearch).schema;
        let object = validate_one(
            schema,
            &json!({
                "filters": {
                    "industry": {"include": ["Computer Software"]},
                    "size": {"include": ["11-50"], "exclude": []},
                    "founded": {"include": ["2015"]}
                }
            }),
        )
        .unwrap();
        assert_eq!(object["page"], 1);
        assert!(object["filters"]["size"].get("exclude").is_none());

        let error = validate_one(
            schema,
            &json!({"filters": {"founded": {"exclude": ["20x5"]}}}),
        )
        .unwrap_err();
        assert_eq!(error.path, "filters.founded.exclude.0");

        let error = validate_one(schema, &json!({"filters": {}})).unwrap_err();
        assert_eq!(error.path, "query");
    }
}
