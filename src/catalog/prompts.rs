//! Prompt descriptors and their expansion.
//!
//! A prompt expands into a single user message: step-by-step instructions
//! naming the tools to call and in which order. Expansion is deterministic
//! and has no side effects.
//!
//! Argument conventions:
//!
//! - blank values count as absent
//! - `include_*` and `get_*` flags are enabled only by the literal `"true"`
//! - list arguments (`emails`, `urls`, `domains`, `company_sizes`, ...) are
//!   comma-separated

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::mcp::types::{
    GetPromptResult, PromptArgument, PromptDescriptor, PromptMessage, ToolContent,
};

/// Failure to expand a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// No prompt has this name.
    #[error("Unknown prompt: {0}")]
    Unknown(String),

    /// Required arguments were not supplied.
    #[error("Missing required argument(s) for prompt '{prompt}': {}", missing.join(", "))]
    Missing {
        /// Prompt name.
        prompt: &'static str,
        /// Missing argument names, in declaration order.
        missing: Vec<&'static str>,
    },

    /// None of a set of alternative arguments was supplied.
    #[error("Prompt '{prompt}' requires at least one of: {}", any_of.join(", "))]
    NeedsOneOf {
        /// Prompt name.
        prompt: &'static str,
        /// Alternative argument names.
        any_of: &'static [&'static str],
    },
}

type Render = fn(&Args<'_>) -> String;

struct PromptSpec {
    descriptor: PromptDescriptor,
    /// At least one of these must be present, in addition to the required ones.
    any_of: &'static [&'static str],
    render: Render,
}

const fn arg(name: &'static str, description: &'static str, required: bool) -> PromptArgument {
    PromptArgument {
        name,
        description,
        required,
    }
}

fn prompt(
    name: &'static str,
    description: &'static str,
    arguments: Vec<PromptArgument>,
    render: Render,
) -> PromptSpec {
    PromptSpec {
        descriptor: PromptDescriptor {
            name,
            description,
            arguments,
        },
        any_of: &[],
        render,
    }
}

const SIZE_HELP: &str = "Company size range: 1-10 (Micro), 11-50 (Small), 51-250 (Mid-sized), 251-1K (Medium-large), 1K-5K (Large), 5K-10K (Very large), 10K-50K (Enterprise), 50K-100K (Massive), 100K+ (Global)";
const REVENUE_HELP: &str = "Revenue range: $0-$1M, $1M-$10M, $10M-$50M, $50M-$100M, $100M-$250M, $250M-$500M, $500M-$1B, $1B-$10B, $10B+";
const TYPE_HELP: &str =
    "Company type: education, government, nonprofit, private, public, or personal";

static PROMPTS: Lazy<Vec<PromptSpec>> = Lazy::new(|| {
    vec![
        prompt(
            "find_contact",
            "Find contact information for a person at a company",
            vec![
                arg("firstName", "First name of the person", true),
                arg("lastName", "Last name of the person", true),
                arg("company", "Company domain or name", true),
            ],
            find_contact,
        ),
        prompt(
            "verify_email_list",
            "Verify a list of email addresses for deliverability",
            vec![arg(
                "emails",
                "Comma-separated list of email addresses to verify",
                true,
            )],
            verify_email_list,
        ),
        prompt(
            "research_company",
            "Research a company's contact information and structure",
            vec![
                arg("domain", "Company domain name", true),
                arg(
                    "department",
                    "Specific department to focus on (optional)",
                    false,
                ),
            ],
            research_company,
        ),
        PromptSpec {
            any_of: &["email", "linkedin"],
            ..prompt(
                "enrich_lead",
                "Enrich a lead with all available information",
                vec![
                    arg("email", "Email address of the lead", false),
                    arg("linkedin", "LinkedIn profile URL of the lead", false),
                ],
                enrich_lead,
            )
        },
        prompt(
            "find_journalists",
            "Find contact information for journalists who wrote specific articles",
            vec![arg("urls", "Comma-separated list of article URLs", true)],
            find_journalists,
        ),
        prompt(
            "finder_phone",
            "Find phone numbers for a contact",
            vec![
                arg("email", "Email address of the contact", true),
                arg("linkedin", "LinkedIn profile URL of the contact", false),
            ],
            finder_phone,
        ),
        prompt(
            "validate_phone",
            "Validate a phone number",
            vec![
                arg("phone", "Phone number to validate", true),
                arg(
                    "country",
                    "Country code for the phone number (optional)",
                    false,
                ),
            ],
            validate_phone,
        ),
        prompt(
            "competitor_analysis",
            "Analyze competitors using similar domain finder and technology stack",
            vec![
                arg("domain", "Target domain to analyze competitors for", true),
                arg(
                    "include_technology",
                    "Include technology stack analysis (true/false)",
                    false,
                ),
            ],
            competitor_analysis,
        ),
        prompt(
            "technology_audit",
            "Comprehensive technology audit of a website",
            vec![
                arg("domain", "Domain to audit technology stack for", true),
                arg(
                    "include_similar",
                    "Include similar domains analysis (true/false)",
                    false,
                ),
            ],
            technology_audit,
        ),
        prompt(
            "domain_insights",
            "Get comprehensive insights about a domain including email count and technology",
            vec![
                arg("domain", "Domain to analyze", true),
                arg(
                    "include_samples",
                    "Include sample email addresses (true/false)",
                    false,
                ),
            ],
            domain_insights,
        ),
        prompt(
            "bulk_domain_research",
            "Research multiple domains for email counts and basic information",
            vec![
                arg("domains", "Comma-separated list of domains to research", true),
                arg(
                    "include_technology",
                    "Include technology stack for each domain (true/false)",
                    false,
                ),
            ],
            bulk_domain_research,
        ),
        PromptSpec {
            any_of: &["query", "location", "industry", "size", "type", "revenue"],
            ..prompt(
                "find_target_companies",
                "Find companies matching specific criteria using advanced filters",
                vec![
                    arg(
                        "query",
                        "Natural language description of the companies to find",
                        false,
                    ),
                    arg("location", "Target location (city, state, or country)", false),
                    arg(
                        "industry",
                        "Industry sector (e.g., 'Computer Software', 'Financial Services', 'Hospital & Health Care'). Based on LinkedIn Industry Codes V2",
                        false,
                    ),
                    arg("size", SIZE_HELP, false),
                    arg("type", TYPE_HELP, false),
                    arg("revenue", REVENUE_HELP, false),
                ],
                find_target_companies,
            )
        },
        prompt(
            "market_research",
            "Research companies in a specific market segment with comprehensive filtering",
            vec![
                arg(
                    "industry",
                    "Industry to research (e.g., 'Computer Software', 'Financial Services', 'Retail'). Based on LinkedIn Industry Codes V2",
                    true,
                ),
                arg(
                    "location",
                    "Geographic location (city, state, or country)",
                    true,
                ),
                arg("size_range", SIZE_HELP, false),
                arg("revenue_range", REVENUE_HELP, false),
                arg("company_type", TYPE_HELP, false),
                arg(
                    "include_contacts",
                    "Include contact information for companies (true/false)",
                    false,
                ),
            ],
            market_research,
        ),
        prompt(
            "lead_generation",
            "Generate leads by finding companies and their contacts",
            vec![
                arg("company_query", "Search query for target companies", true),
                arg(
                    "target_department",
                    "Department to find contacts in (optional)",
                    false,
                ),
                arg(
                    "contact_role",
                    "Role or position to target (optional)",
                    false,
                ),
            ],
            lead_generation,
        ),
        prompt(
            "prospect_enrichment",
            "Enrich company prospects with comprehensive data",
            vec![
                arg("company_name", "Name of the company to enrich", true),
                arg("location", "Company location (optional)", false),
                arg(
                    "get_technology",
                    "Include technology stack analysis (true/false)",
                    false,
                ),
                arg(
                    "get_contacts",
                    "Include contact information (true/false)",
                    false,
                ),
            ],
            prospect_enrichment,
        ),
        prompt(
            "industry_analysis",
            "Analyze companies within a specific industry and location with detailed segmentation",
            vec![
                arg(
                    "industry",
                    "Industry to analyze (e.g., 'Computer Software', 'Hospital & Health Care', 'Banking'). Based on LinkedIn Industry Codes V2",
                    true,
                ),
                arg(
                    "location",
                    "Geographic location (city, state, or country)",
                    true,
                ),
                arg(
                    "company_sizes",
                    "Comma-separated sizes: 1-10, 11-50, 51-250, 251-1K, 1K-5K, 5K-10K, 10K-50K, 50K-100K, 100K+",
                    false,
                ),
                arg(
                    "revenue_ranges",
                    "Comma-separated revenue: $0-$1M, $1M-$10M, $10M-$50M, $50M-$100M, $100M-$250M, $250M-$500M, $500M-$1B, $1B-$10B, $10B+",
                    false,
                ),
                arg(
                    "company_types",
                    "Comma-separated types: education, government, nonprofit, private, public, personal",
                    false,
                ),
                arg(
                    "include_technology",
                    "Include technology analysis (true/false)",
                    false,
                ),
            ],
            industry_analysis,
        ),
    ]
});

/// Returns the advertised prompts.
pub fn prompt_list() -> impl Iterator<Item = &'static PromptDescriptor> {
    PROMPTS.iter().map(|p| &p.descriptor)
}

/// Expands the prompt `name` with `arguments`.
///
/// # Errors
///
/// Returns [`PromptError::Unknown`] for an unknown name, and
/// [`PromptError::Missing`] or [`PromptError::NeedsOneOf`] when the
/// arguments do not satisfy the prompt's declaration.
pub fn get_prompt(
    name: &str,
    arguments: &HashMap<String, String>,
) -> Result<GetPromptResult, PromptError> {
    let spec = PROMPTS
        .iter()
        .find(|p| p.descriptor.name == name)
        .ok_or_else(|| PromptError::Unknown(name.to_string()))?;
    let args = Args(arguments);
    let prompt = spec.descriptor.name;

    let missing: Vec<&'static str> = spec
        .descriptor
        .arguments
        .iter()
        .filter(|a| a.required && !args.present(a.name))
        .map(|a| a.name)
        .collect();
    if !missing.is_empty() {
        return Err(PromptError::Missing { prompt, missing });
    }
    if !spec.any_of.is_empty() && !spec.any_of.iter().any(|a| args.present(a)) {
        return Err(PromptError::NeedsOneOf {
            prompt,
            any_of: spec.any_of,
        });
    }

    Ok(GetPromptResult {
        description: spec.descriptor.description,
        messages: vec![PromptMessage {
            role: "user",
            content: ToolContent::Text {
                text: (spec.render)(&args),
            },
        }],
    })
}

/// View over the supplied argument values.
struct Args<'a>(&'a HashMap<String, String>);

impl Args<'_> {
    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn present(&self, name: &str) -> bool {
        if LIST_ARGUMENTS.contains(&name) {
            !self.list(name).is_empty()
        } else {
            self.get(name).is_some()
        }
    }

    /// Value of an argument that passed the required check.
    fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    fn flag(&self, name: &str) -> bool {
        self.get(name) == Some("true")
    }

    fn list(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

const LIST_ARGUMENTS: &[&str] = &[
    "emails",
    "urls",
    "domains",
    "company_sizes",
    "revenue_ranges",
    "company_types",
];

/// Builds a numbered instruction list.
struct Instructions {
    text: String,
    steps: usize,
}

impl Instructions {
    fn new(intro: impl fmt::Display) -> Self {
        Self {
            text: format!("{intro}\n\nPlease:\n"),
            steps: 0,
        }
    }

    fn step(&mut self, text: impl fmt::Display) -> &mut Self {
        self.steps += 1;
        let _ = writeln!(self.text, "{}. {text}", self.steps);
        self
    }

    fn step_if(&mut self, condition: bool, text: impl fmt::Display) -> &mut Self {
        if condition {
            self.step(text);
        }
        self
    }

    fn detail(&mut self, text: impl fmt::Display) -> &mut Self {
        let _ = writeln!(self.text, "   - {text}");
        self
    }

    fn section(&mut self, heading: impl fmt::Display) -> &mut Self {
        let _ = write!(self.text, "\n{heading}\n");
        self
    }

    fn bullet(&mut self, text: impl fmt::Display) -> &mut Self {
        let _ = writeln!(self.text, "- {text}");
        self
    }

    fn bullet_if(&mut self, condition: bool, text: impl fmt::Display) -> &mut Self {
        if condition {
            self.bullet(text);
        }
        self
    }

    fn line(&mut self, text: impl fmt::Display) -> &mut Self {
        let _ = writeln!(self.text, "{text}");
        self
    }

    fn build(&self) -> String {
        self.text.trim_end().to_string()
    }
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds a companies search `filters` object from `(dimension, values)`
/// pairs, skipping dimensions with no values.
fn filters(entries: &[(&str, Vec<&str>)]) -> Option<String> {
    let mut object = Map::new();
    for (dimension, values) in entries {
        if !values.is_empty() {
            object.insert(
                (*dimension).to_string(),
                serde_json::json!({ "include": values }),
            );
        }
    }
    if object.is_empty() {
        return None;
    }
    let value = Value::Object(object);
    Some(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
}

fn one(value: Option<&str>) -> Vec<&str> {
    value.into_iter().collect()
}

fn find_contact(args: &Args<'_>) -> String {
    let first = args.value("firstName");
    let last = args.value("lastName");
    let company = args.value("company");

    Instructions::new(format!(
        "I need to find contact information for {first} {last} who works at {company}."
    ))
    .step("Use the email_finder tool to find their email address")
    .step("Use the email_verifier tool to verify the email is valid")
    .step("Use the email_enrichment tool to get additional information")
    .step("If possible, use the phone_finder tool to find their phone number")
    .step("Provide a summary of all the information found")
    .section(format!("Company: {company}"))
    .line(format!("First name: {first}"))
    .line(format!("Last name: {last}"))
    .build()
}

fn verify_email_list(args: &Args<'_>) -> String {
    let emails = args.list("emails");

    Instructions::new(format!(
        "I need to verify the following email addresses for deliverability:\n\n{}",
        numbered(&emails)
    ))
    .step("Use the email_verifier tool for each email address")
    .step("Create a summary table showing:")
    .detail("Email address")
    .detail("Status (valid/invalid)")
    .detail("Deliverability score")
    .detail("Any issues found")
    .step("Provide recommendations for any problematic emails")
    .build()
}

fn research_company(args: &Args<'_>) -> String {
    let domain = args.value("domain");
    let department = args.get("department");

    let mut p = Instructions::new(format!("I need to research the company at domain: {domain}"));
    match department {
        Some(dept) => p.step(format!(
            "Use the domain_search tool with department \"{dept}\" to find the relevant email addresses"
        )),
        None => p.step("Use the domain_search tool to find all available email addresses"),
    };
    p.step("Analyze the email patterns and organizational structure")
        .step("Identify key departments and roles");
    if let Some(dept) = department {
        p.step(format!("Focus specifically on the {dept} department"));
    }
    p.step("Provide insights about:")
        .detail("Company size (estimated from email count)")
        .detail("Common email patterns")
        .detail("Department structure")
        .detail("Key contacts")
        .section(format!("Domain: {domain}"));
    if let Some(dept) = department {
        p.line(format!("Department: {dept}"));
    }
    p.build()
}

fn enrich_lead(args: &Args<'_>) -> String {
    let mut p = Instructions::new("I need to enrich a lead with all available information.");
    if let Some(email) = args.get("email") {
        p.step(format!("Use the email_verifier tool to verify: {email}"))
            .step("Use the email_enrichment tool to get detailed information")
            .step("Use the phone_finder tool with the email to find phone numbers");
    }
    if let Some(linkedin) = args.get("linkedin") {
        p.step(format!(
            "Use the linkedin_finder tool to find email from: {linkedin}"
        ))
        .step("Use the phone_finder tool with the LinkedIn URL");
    }
    p.section("Provide a comprehensive profile including:")
        .bullet("Contact information (email, phone)")
        .bullet("Professional details")
        .bullet("Social media presence")
        .bullet("Verification status")
        .build()
}

fn find_journalists(args: &Args<'_>) -> String {
    let urls = args.list("urls");

    Instructions::new(format!(
        "I need to find contact information for journalists who wrote the following articles:\n\n{}",
        numbered(&urls)
    ))
    .step("Use the author_finder tool for each article URL")
    .step("For each author found, use the email_verifier tool to verify their email")
    .step("Try to find phone numbers using the phone_finder tool")
    .step("Create a summary table with:")
    .detail("Article URL")
    .detail("Author name")
    .detail("Email address")
    .detail("Phone number (if found)")
    .detail("Verification status")
    .step("Provide any additional insights about the journalists")
    .build()
}

fn finder_phone(args: &Args<'_>) -> String {
    let email = args.value("email");
    let linkedin = args.get("linkedin");

    let mut p = Instructions::new(format!(
        "I need to find phone numbers for the contact: {email}"
    ));
    p.step(format!("Use the phone_finder tool with the email: {email}"));
    if let Some(url) = linkedin {
        p.step(format!("Use the phone_finder tool with the LinkedIn URL: {url}"));
    }
    p.step("Use the phone_validator tool to validate each phone number found")
        .step("Summarize the results with:")
        .detail("Phone number")
        .detail("Line type (mobile/landline)")
        .detail("Carrier")
        .detail("Validation status")
        .build()
}

fn validate_phone(args: &Args<'_>) -> String {
    let phone = args.value("phone");

    let mut p = Instructions::new(format!("I need to validate the phone number: {phone}"));
    match args.get("country") {
        Some(country) => p.step(format!(
            "Use the phone_validator tool with phone: {phone} and country: {country}"
        )),
        None => p.step(format!("Use the phone_validator tool with phone: {phone}")),
    };
    p.step("Report:")
        .detail("Whether the number is valid")
        .detail("Line type and carrier")
        .detail("Country and region")
        .detail("International and local formats")
        .step("Flag any issues that would prevent reaching this number")
        .build()
}

fn competitor_analysis(args: &Args<'_>) -> String {
    let domain = args.value("domain");
    let technology = args.flag("include_technology");

    Instructions::new(format!(
        "I need to analyze competitors for the domain: {domain}"
    ))
    .step("Use the similar_finder tool to find similar domains")
    .step("Analyze the competition landscape and market positioning")
    .step("For each similar domain, provide:")
    .detail("Domain name and similarity score")
    .detail("Business category and description")
    .detail("Competitive advantages/differences")
    .step_if(
        technology,
        "Use the technology_finder tool to analyze the target domain's tech stack",
    )
    .step_if(technology, "Compare technology choices with competitors")
    .section("Provide a comprehensive competitive analysis report including:")
    .bullet("Market positioning insights")
    .bullet("Key competitors and their strengths")
    .bullet("Opportunities and threats")
    .bullet_if(technology, "Technology stack comparison")
    .build()
}

fn technology_audit(args: &Args<'_>) -> String {
    let domain = args.value("domain");
    let similar = args.flag("include_similar");

    Instructions::new(format!(
        "I need to perform a comprehensive technology audit for: {domain}"
    ))
    .step("Use the technology_finder tool to discover the complete technology stack")
    .step("Analyze the technologies by category:")
    .detail("Web frameworks and libraries")
    .detail("Frontend technologies")
    .detail("Backend and server technologies")
    .detail("Database and storage solutions")
    .detail("Analytics and tracking tools")
    .detail("Security and performance tools")
    .step("Evaluate technology choices for:")
    .detail("Performance implications")
    .detail("Security considerations")
    .detail("Scalability factors")
    .detail("Development efficiency")
    .step_if(
        similar,
        "Use the similar_finder tool to find comparable websites",
    )
    .step_if(similar, "Compare technology choices with industry peers")
    .section("Provide a detailed technology audit report including:")
    .bullet("Complete technology inventory")
    .bullet("Technology assessment and recommendations")
    .bullet("Performance and security analysis")
    .bullet("Modernization opportunities")
    .bullet_if(similar, "Industry technology trends and comparisons")
    .build()
}

fn domain_insights(args: &Args<'_>) -> String {
    let domain = args.value("domain");
    let samples = args.flag("include_samples");

    Instructions::new(format!(
        "I need comprehensive insights about the domain: {domain}"
    ))
    .step("Use the email_count tool to get the total number of email addresses")
    .step("Use the technology_finder tool to discover the technology stack")
    .step("Use the similar_finder tool to find comparable domains")
    .step_if(
        samples,
        "Use the domain_search tool to get sample email addresses (limit 10)",
    )
    .section("Provide a comprehensive domain analysis report including:")
    .bullet("Email infrastructure overview (total count, estimated patterns)")
    .bullet("Technology stack summary and analysis")
    .bullet("Market positioning and similar competitors")
    .bullet("Business insights and opportunities")
    .bullet_if(samples, "Sample email patterns and structure")
    .build()
}

fn bulk_domain_research(args: &Args<'_>) -> String {
    let domains = args.list("domains");
    let technology = args.flag("include_technology");

    Instructions::new(format!(
        "I need to research the following domains:\n\n{}",
        numbered(&domains)
    ))
    .step("Use the email_count tool for each domain to get total email counts")
    .step("Use the domain_search tool for each domain to understand email structure (limit 10 per domain)")
    .step_if(
        technology,
        "Use the technology_finder tool for each domain to analyze tech stacks",
    )
    .section("Provide a comparative analysis table including:")
    .bullet("Domain name")
    .bullet("Total email count")
    .bullet("Sample email patterns")
    .bullet("Business category/industry")
    .bullet_if(technology, "Key technologies used")
    .bullet("Insights and recommendations")
    .build()
}

fn find_target_companies(args: &Args<'_>) -> String {
    let query = args.get("query");
    let criteria = [
        ("Location", "location", "location_city"),
        ("Industry", "industry", "industry"),
        ("Size", "size", "size"),
        ("Type", "type", "type"),
        ("Revenue", "revenue", "revenue"),
    ];

    let mut intro = match query {
        Some(q) => format!("I need to find companies matching: \"{q}\""),
        None => "I need to find companies matching the following criteria".to_string(),
    };
    let given: Vec<(&str, &str)> = criteria
        .iter()
        .filter_map(|(label, name, _)| args.get(name).map(|v| (*label, v)))
        .collect();
    if !given.is_empty() {
        intro.push_str("\n\nFilters:");
        for (label, value) in &given {
            let _ = write!(intro, "\n- {label}: {value}");
        }
    }

    let entries: Vec<(&str, Vec<&str>)> = criteria
        .iter()
        .map(|(_, name, dimension)| (*dimension, args.list(name)))
        .collect();
    let filters = filters(&entries);

    let search = match (query, &filters) {
        (Some(q), Some(f)) => {
            format!("Use the companies_search tool with query: \"{q}\" and filters: {f}")
        }
        (Some(q), None) => format!("Use the companies_search tool with query: \"{q}\""),
        (None, Some(f)) => format!("Use the companies_search tool with filters: {f}"),
        (None, None) => "Use the companies_search tool".to_string(),
    };

    Instructions::new(intro)
        .step(search)
        .step("Analyze the results and provide:")
        .detail("List of matching companies with key details")
        .detail("Company names and domains")
        .detail("Business descriptions")
        .detail("Contact opportunities")
        .step("Suggest next steps for outreach or engagement")
        .build()
}

fn market_research(args: &Args<'_>) -> String {
    let industry = args.value("industry");
    let location = args.value("location");
    let size = args.get("size_range");
    let contacts = args.flag("include_contacts");

    let filters = filters(&[
        ("industry", vec![industry]),
        ("location_city", vec![location]),
        ("size", one(size)),
        ("revenue", one(args.get("revenue_range"))),
        ("type", one(args.get("company_type"))),
    ])
    .unwrap_or_default();

    let mut search = format!(
        "Use the companies_search tool to find companies in {industry} industry located in {location}"
    );
    if let Some(size) = size {
        let _ = write!(search, " with size {size}");
    }
    let _ = write!(search, ", using filters: {filters}");

    Instructions::new(format!(
        "I need to research the {industry} market in {location}"
    ))
    .step(search)
    .step("Analyze market landscape including:")
    .detail("Total number of companies found")
    .detail("Company size distribution")
    .detail("Key players and their domains")
    .detail("Market trends and insights")
    .step_if(
        contacts,
        "For the top 5 companies, use domain_search to find key contacts",
    )
    .step_if(contacts, "Provide contact information for decision makers")
    .section("Provide a comprehensive market research report with actionable insights.")
    .build()
}

fn lead_generation(args: &Args<'_>) -> String {
    let query = args.value("company_query");
    let department = args.get("target_department");

    let mut p = Instructions::new(format!(
        "I need to generate leads from companies matching: \"{query}\""
    ));
    p.step(format!(
        "Use the companies_search tool to find companies matching: \"{query}\""
    ))
    .step("For each company found:")
    .detail("Extract the company domain");
    match department {
        Some(dept) => p.detail(format!(
            "Use domain_search to find email addresses in the {dept} department"
        )),
        None => p.detail("Use domain_search to find email addresses"),
    };
    if let Some(role) = args.get("contact_role") {
        p.step(format!("Filter contacts for {role} roles"));
    }
    p.step("Create a lead list with:")
        .detail("Company name and domain")
        .detail("Contact name and email")
        .detail("Role/title")
        .detail("Department")
        .step("Prioritize leads based on relevance and contact quality")
        .build()
}

fn prospect_enrichment(args: &Args<'_>) -> String {
    let company = args.value("company_name");
    let location = args.get("location");
    let technology = args.flag("get_technology");
    let contacts = args.flag("get_contacts");

    let (intro, query) = match location {
        Some(loc) => (
            format!("I need to enrich prospect information for: {company} ({loc})"),
            format!("{company} in {loc}"),
        ),
        None => (
            format!("I need to enrich prospect information for: {company}"),
            company.to_string(),
        ),
    };

    Instructions::new(intro)
        .step(format!("Use companies_search to find \"{query}\""))
        .step("Extract the company domain from results")
        .step_if(technology, "Use technology_finder to analyze the tech stack")
        .step_if(contacts, "Use domain_search to find key contacts")
        .step_if(contacts, "Use email_verifier to verify contact emails")
        .section("Provide a comprehensive prospect profile including:")
        .bullet("Company overview and domain")
        .bullet("Industry and location details")
        .bullet_if(technology, "Technology stack analysis")
        .bullet_if(contacts, "Key contact information with verification status")
        .bullet("Engagement recommendations")
        .build()
}

fn industry_analysis(args: &Args<'_>) -> String {
    let industry = args.value("industry");
    let location = args.value("location");
    let sizes = args.list("company_sizes");
    let technology = args.flag("include_technology");

    let filters = filters(&[
        ("industry", vec![industry]),
        ("location_city", vec![location]),
        ("size", sizes.clone()),
        ("revenue", args.list("revenue_ranges")),
        ("type", args.list("company_types")),
    ])
    .unwrap_or_default();

    let mut search = format!(
        "Use companies_search to find all {industry} companies in {location}"
    );
    if !sizes.is_empty() {
        let _ = write!(search, " with sizes: {}", sizes.join(", "));
    }
    let _ = write!(search, ", using filters: {filters}");

    Instructions::new(format!(
        "I need to analyze the {industry} industry in {location}"
    ))
    .step(search)
    .step("Segment companies by size and analyze:")
    .detail("Market composition")
    .detail("Company distribution by size")
    .detail("Key industry players")
    .step_if(
        technology,
        "For the top 10 companies, use technology_finder to analyze tech adoption",
    )
    .step_if(technology, "Identify technology trends in the industry")
    .section("Provide a detailed industry analysis report including:")
    .bullet("Market overview and statistics")
    .bullet("Competitive landscape")
    .bullet("Key companies and their domains")
    .bullet_if(technology, "Technology trends and adoption patterns")
    .bullet("Market opportunities and insights")
    .build()
}
