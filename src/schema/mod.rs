//! Declarative argument schemas and their validator.
//!
//! A [`Schema`] lists the fields an operation accepts. Each [`Field`] carries
//! a [`FieldKind`] with its constraints, and a schema may add cross-field
//! [`Rule`]s. Validation turns raw JSON arguments into a normalised object
//! holding only the declared fields, with defaults applied:
//!
//! - every string is trimmed, and an optional string that ends up empty is
//!   treated as absent, as is `null`
//! - unknown fields are dropped
//! - the first violated constraint is reported by [`validate_one`]; every
//!   violation is reported by [`validate_all`]
//!
//! The typed request structs in [`crate::tools`] are deserialised from the
//! normalised object, so they can only be built from input that passed.

pub mod enums;
mod json_schema;
pub mod patterns;
mod validate;

use serde_json::{Map, Value};
use thiserror::Error;

pub use patterns::Pattern;
pub use validate::{validate_all, validate_one};

/// Extra normalisation applied to a string after trimming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Normalize {
    /// Trim only.
    #[default]
    None,
    /// Lowercase the value (emails, domains).
    Lowercase,
    /// Remove all whitespace (phone numbers).
    StripWhitespace,
}

impl Normalize {
    fn apply(self, value: &str) -> String {
        let trimmed = value.trim();
        match self {
            Self::None => trimmed.to_string(),
            Self::Lowercase => trimmed.to_lowercase(),
            Self::StripWhitespace => trimmed.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }
}

/// Constraints on a string field.
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    /// Pattern the value must match.
    pub pattern: Option<Pattern>,
    /// Minimum length in characters.
    pub min_len: Option<usize>,
    /// Maximum length in characters.
    pub max_len: Option<usize>,
    /// Closed set of accepted values.
    pub one_of: Option<&'static [&'static str]>,
    /// Normalisation applied before any check.
    pub normalize: Normalize,
}

impl StringRules {
    /// Requires the value to match `pattern`.
    #[must_use]
    pub const fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Bounds the value length in characters (inclusive).
    #[must_use]
    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.min_len = Some(min);
        self.max_len = Some(max);
        self
    }

    /// Restricts the value to a fixed set.
    #[must_use]
    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = Some(values);
        self
    }

    /// Lowercases the value before checking it.
    #[must_use]
    pub const fn lowercase(mut self) -> Self {
        self.normalize = Normalize::Lowercase;
        self
    }

    /// Removes all whitespace before checking the value.
    #[must_use]
    pub const fn strip_whitespace(mut self) -> Self {
        self.normalize = Normalize::StripWhitespace;
        self
    }
}

/// Constraints on an integer field.
#[derive(Debug, Clone, Default)]
pub struct IntegerRules {
    /// Inclusive lower bound.
    pub min: Option<i64>,
    /// Inclusive upper bound.
    pub max: Option<i64>,
    /// Closed set of accepted values.
    pub one_of: Option<&'static [i64]>,
}

impl IntegerRules {
    /// Sets an inclusive lower bound.
    #[must_use]
    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets inclusive lower and upper bounds.
    #[must_use]
    pub const fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Restricts the value to a fixed set.
    #[must_use]
    pub const fn one_of(mut self, values: &'static [i64]) -> Self {
        self.one_of = Some(values);
        self
    }
}

/// The type of a field together with its constraints.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A string.
    String(StringRules),
    /// An integer. Numeric strings such as `"10"` are accepted and converted.
    Integer(IntegerRules),
    /// A boolean.
    Boolean,
    /// An array whose items all have the given kind.
    Array(Box<FieldKind>),
    /// A nested object.
    Object(Schema),
}

impl FieldKind {
    /// An array of items of `kind`.
    #[must_use]
    pub fn array_of(kind: impl Into<Self>) -> Self {
        Self::Array(Box::new(kind.into()))
    }
}

impl From<StringRules> for FieldKind {
    fn from(rules: StringRules) -> Self {
        Self::String(rules)
    }
}

impl From<IntegerRules> for FieldKind {
    fn from(rules: IntegerRules) -> Self {
        Self::Integer(rules)
    }
}

impl From<Schema> for FieldKind {
    fn from(schema: Schema) -> Self {
        Self::Object(schema)
    }
}

/// A named field of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    /// Wire name of the field.
    pub name: &'static str,
    /// Human-readable description, advertised in the JSON Schema.
    pub description: &'static str,
    /// Type and constraints.
    pub kind: FieldKind,
    /// Whether the field must be present.
    pub required: bool,
    /// Value inserted when the field is absent.
    pub default: Option<Value>,
}

impl Field {
    /// Creates an optional field.
    #[must_use]
    pub fn new(name: &'static str, description: &'static str, kind: impl Into<FieldKind>) -> Self {
        Self {
            name,
            description,
            kind: kind.into(),
            required: false,
            default: None,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value used when the field is absent.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// A cross-field rule evaluated after the individual fields.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Satisfied when every field of at least one group is present.
    AnyGroup {
        /// Alternative groups of fields.
        groups: Vec<Vec<&'static str>>,
        /// Field path reported on failure.
        path: &'static str,
        /// Message reported on failure.
        message: String,
    },
}

impl Rule {
    /// Requires at least one of `fields` to be present.
    ///
    /// Failures are reported against the first field.
    #[must_use]
    pub fn at_least_one_of(fields: &[&'static str]) -> Self {
        Self::AnyGroup {
            groups: fields.iter().map(|f| vec![*f]).collect(),
            path: fields.first().copied().unwrap_or_default(),
            message: format!("At least one of {} is required", fields.join(", ")),
        }
    }

    /// Requires every field of at least one group to be present.
    #[must_use]
    pub fn any_group(
        groups: &[&[&'static str]],
        path: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::AnyGroup {
            groups: groups.iter().map(|g| g.to_vec()).collect(),
            path,
            message: message.into(),
        }
    }

    /// Returns `true` if the normalised object satisfies this rule.
    #[must_use]
    pub fn is_satisfied(&self, object: &Map<String, Value>) -> bool {
        match self {
            Self::AnyGroup { groups, .. } => groups
                .iter()
                .any(|group| group.iter().all(|field| object.contains_key(*field))),
        }
    }

    /// Field path reported when the rule fails.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::AnyGroup { path, .. } => path,
        }
    }

    /// Message reported when the rule fails.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::AnyGroup { message, .. } => message,
        }
    }
}

/// An object schema: ordered fields plus cross-field rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    rules: Vec<Rule>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a cross-field rule.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the cross-field rules.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a field by wire name.
    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Kind of constraint a value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    /// A required field is missing.
    Required,
    /// The value has the wrong JSON type.
    InvalidType,
    /// A string did not match its pattern.
    InvalidString,
    /// A value is below its lower bound.
    TooSmall,
    /// A value is above its upper bound.
    TooBig,
    /// A value is outside its enumeration.
    InvalidEnum,
    /// A cross-field rule failed.
    Custom,
}

impl IssueCode {
    /// Stable identifier for the issue kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidType => "invalid_type",
            Self::InvalidString => "invalid_string",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::InvalidEnum => "invalid_enum_value",
            Self::Custom => "custom",
        }
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FieldError {
    /// Dot-joined path of the offending field (empty for the root object).
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// Kind of violation.
    pub code: IssueCode,
}

/// A schema violation in the context of a named operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{context}: {}", issue.message)]
pub struct ValidationError {
    /// What was being validated, e.g. "Invalid arguments for tool 'x'".
    pub context: String,
    /// The first violated constraint.
    pub issue: FieldError,
}

impl ValidationError {
    /// Returns the offending field path, if the issue is not at the root.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        (!self.issue.path.is_empty()).then_some(self.issue.path.as_str())
    }

    /// Formats the error for display to the protocol client.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self.field() {
            Some(field) => format!("Validation Error: {self} (Field: {field})"),
            None => format!("Validation Error: {self}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_variants() {
        assert_eq!(Normalize::None.apply("  Jane "), "Jane");
        assert_eq!(Normalize::Lowercase.apply(" Jane@Example.COM "), "jane@example.com");
        assert_eq!(Normalize::StripWhitespace.apply("+1 415 555 0123"), "+14155550123");
    }

    #[test]
    fn at_least_one_of_rule() {
        let rule = Rule::at_least_one_of(&["email", "domain"]);
        assert_eq!(rule.path(), "email");
        assert_eq!(rule.message(), "At least one of email, domain is required");

        let mut object = Map::new();
        assert!(!rule.is_satisfied(&object));
        object.insert("domain".to_string(), json!("example.com"));
        assert!(rule.is_satisfied(&object));
    }

    #[test]
    fn any_group_rule_needs_whole_group() {
        let rule = Rule::any_group(
            &[&["fullName"], &["firstName", "lastName"]],
            "firstName",
            "names required",
        );

        let mut object = Map::new();
        object.insert("firstName".to_string(), json!("Jane"));
        assert!(!rule.is_satisfied(&object));
        object.insert("lastName".to_string(), json!("Doe"));
        assert!(rule.is_satisfied(&object));
    }

    #[test]
    fn validation_error_user_message() {
        let error = ValidationError {
            context: "Invalid arguments for tool 'email_count'".to_string(),
            issue: FieldError {
                path: "domain".to_string(),
                message: "Required".to_string(),
                code: IssueCode::Required,
            },
        };
        assert_eq!(
            error.to_user_message(),
            "Validation Error: Invalid arguments for tool 'email_count': Required (Field: domain)"
        );
    }

    #[test]
    fn root_validation_error_has_no_field() {
        let error = ValidationError {
            context: "ctx".to_string(),
            issue: FieldError {
                path: String::new(),
                message: "Expected object, received string".to_string(),
                code: IssueCode::InvalidType,
            },
        };
        assert_eq!(error.field(), None);
        assert_eq!(
            error.to_user_message(),
            "Validation Error: ctx: Expected object, received string"
        );
    }
}
