//! String patterns shared by the tool schemas.
//!
//! The regex sources are written in the common subset of Rust `regex` and
//! ECMA-262 syntax, so the same source string can be advertised as the JSON
//! Schema `pattern` keyword.

use once_cell::sync::Lazy;
use regex::Regex;

static DOMAIN: Lazy<Regex> = Lazy::new(|| compile(Pattern::Domain));
static EMAIL: Lazy<Regex> = Lazy::new(|| compile(Pattern::Email));
static PHONE: Lazy<Regex> = Lazy::new(|| compile(Pattern::Phone));
static COUNTRY_CODE: Lazy<Regex> = Lazy::new(|| compile(Pattern::CountryCode));
static LINKEDIN_URL: Lazy<Regex> = Lazy::new(|| compile(Pattern::LinkedinUrl));
static URL: Lazy<Regex> = Lazy::new(|| compile(Pattern::Url));
static YEAR: Lazy<Regex> = Lazy::new(|| compile(Pattern::Year));

fn compile(pattern: Pattern) -> Regex {
    Regex::new(pattern.source()).expect("valid regex")
}

/// A named string pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// A bare domain name such as `example.com`.
    Domain,
    /// An email address.
    Email,
    /// An E.164-style phone number without separators.
    Phone,
    /// ISO 3166-1 alpha-2 country code, uppercase.
    CountryCode,
    /// A LinkedIn profile or company URL.
    LinkedinUrl,
    /// An absolute http(s) URL.
    Url,
    /// A four-digit year.
    Year,
}

impl Pattern {
    /// Returns the regex source for this pattern.
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::Domain => r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
            Self::Email => r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
            Self::Phone => r"^\+?[1-9]\d{1,14}$",
            Self::CountryCode => r"^[A-Z]{2}$",
            Self::LinkedinUrl => r"^(https?://)?([a-zA-Z]{2,3}\.)?linkedin\.com/\S+$",
            Self::Url => r"^https?://[^\s/$.?#][^\s]*$",
            Self::Year => r"^[0-9]{4}$",
        }
    }

    /// Returns the message reported when a value does not match.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Domain => "Invalid domain format",
            Self::Email => "Invalid email address",
            Self::Phone => "Invalid phone number format",
            Self::CountryCode => "Country code must be a two-letter uppercase ISO 3166-1 code",
            Self::LinkedinUrl => "Invalid LinkedIn URL",
            Self::Url => "Invalid URL",
            Self::Year => "Year must be a four-digit number",
        }
    }

    /// Returns `true` if `value` matches this pattern.
    #[must_use]
    pub fn is_match(self, value: &str) -> bool {
        let regex: &Regex = match self {
            Self::Domain => &DOMAIN,
            Self::Email => &EMAIL,
            Self::Phone => &PHONE,
            Self::CountryCode => &COUNTRY_CODE,
            Self::LinkedinUrl => &LINKEDIN_URL,
            Self::Url => &URL,
            Self::Year => &YEAR,
        };
        regex.is_match(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_pattern() {
        assert!(Pattern::Domain.is_match("example.com"));
        assert!(Pattern::Domain.is_match("mail.example.co.uk"));
        assert!(!Pattern::Domain.is_match("not a domain"));
        assert!(!Pattern::Domain.is_match("localhost"));
    }

    #[test]
    fn email_pattern() {
        assert!(Pattern::Email.is_match("jane@example.com"));
        assert!(!Pattern::Email.is_match("jane@example"));
        assert!(!Pattern::Email.is_match("jane example.com"));
    }

    #[test]
    fn phone_pattern() {
        assert!(Pattern::Phone.is_match("+14155550123"));
        assert!(Pattern::Phone.is_match("4155550123"));
        assert!(!Pattern::Phone.is_match("+0123"));
        assert!(!Pattern::Phone.is_match("415-555-0123"));
    }

    #[test]
    fn country_code_pattern() {
        assert!(Pattern::CountryCode.is_match("US"));
        assert!(!Pattern::CountryCode.is_match("us"));
        assert!(!Pattern::CountryCode.is_match("USA"));
    }

    #[test]
    fn linkedin_pattern() {
        assert!(Pattern::LinkedinUrl.is_match("https://www.linkedin.com/in/jane-doe"));
        assert!(Pattern::LinkedinUrl.is_match("linkedin.com/company/tomba"));
        assert!(!Pattern::LinkedinUrl.is_match("https://example.com/in/jane"));
    }

    #[test]
    fn url_pattern() {
        assert!(Pattern::Url.is_match("https://blog.example.com/post/1"));
        assert!(!Pattern::Url.is_match("ftp://example.com"));
        assert!(!Pattern::Url.is_match("example.com"));
    }
}
