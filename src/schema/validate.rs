//! Schema validation.
//!
//! Both entry points run the same traversal; they differ only in whether the
//! walk stops at the first violation.

use serde_json::{Map, Number, Value};

use super::{Field, FieldError, FieldKind, IntegerRules, IssueCode, Schema, StringRules};

/// Enumerations longer than this are not spelled out in error messages.
const MAX_LISTED_OPTIONS: usize = 12;

/// Validates `raw` against `schema`, stopping at the first violation.
///
/// `null` input is treated as an empty object, since protocol clients may
/// omit the arguments of a call altogether.
///
/// # Errors
///
/// Returns the first violated constraint, in field declaration order, with
/// cross-field rules checked last.
pub fn validate_one(schema: &Schema, raw: &Value) -> Result<Map<String, Value>, FieldError> {
    let mut walker = Walker::new(Discipline::FirstError);
    let object = walker.object(schema, raw, "");
    match walker.errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(object),
    }
}

/// Validates `raw` against `schema`, collecting every violation.
///
/// # Errors
///
/// Returns all violated constraints in traversal order.
pub fn validate_all(schema: &Schema, raw: &Value) -> Result<Map<String, Value>, Vec<FieldError>> {
    let mut walker = Walker::new(Discipline::CollectAll);
    let object = walker.object(schema, raw, "");
    if walker.errors.is_empty() {
        Ok(object)
    } else {
        Err(walker.errors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Discipline {
    FirstError,
    CollectAll,
}

/// Result of checking a single value.
enum Outcome {
    /// The value passed, in normalised form.
    Present(Value),
    /// The value normalised to nothing (blank string, empty array/object).
    Absent,
    /// The value violated a constraint (already reported).
    Invalid,
}

struct Walker {
    discipline: Discipline,
    errors: Vec<FieldError>,
}

impl Walker {
    const fn new(discipline: Discipline) -> Self {
        Self {
            discipline,
            errors: Vec::new(),
        }
    }

    fn stopped(&self) -> bool {
        self.discipline == Discipline::FirstError && !self.errors.is_empty()
    }

    fn report(&mut self, path: &str, code: IssueCode, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.to_string(),
            message: message.into(),
            code,
        });
    }

    fn object(&mut self, schema: &Schema, raw: &Value, path: &str) -> Map<String, Value> {
        let empty = Map::new();
        let input = match raw {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                self.report(
                    path,
                    IssueCode::InvalidType,
                    format!("Expected object, received {}", type_name(other)),
                );
                return Map::new();
            }
        };

        let mut output = Map::new();
        for field in schema.fields() {
            if self.stopped() {
                return output;
            }
            self.field(field, input, path, &mut output);
        }

        for rule in schema.rules() {
            if self.stopped() {
                break;
            }
            if !rule.is_satisfied(&output) {
                self.report(&join(path, rule.path()), IssueCode::Custom, rule.message());
            }
        }

        output
    }

    fn field(
        &mut self,
        field: &Field,
        input: &Map<String, Value>,
        path: &str,
        output: &mut Map<String, Value>,
    ) {
        let field_path = join(path, field.name);
        let outcome = match input.get(field.name) {
            None | Some(Value::Null) => Outcome::Absent,
            Some(value) => self.value(&field.kind, value, &field_path),
        };

        match outcome {
            Outcome::Present(value) => {
                output.insert(field.name.to_string(), value);
            }
            Outcome::Absent if field.required => {
                self.report(&field_path, IssueCode::Required, "Required");
            }
            Outcome::Absent => {
                if let Some(default) = &field.default {
                    output.insert(field.name.to_string(), default.clone());
                }
            }
            Outcome::Invalid => {}
        }
    }

    fn value(&mut self, kind: &FieldKind, raw: &Value, path: &str) -> Outcome {
        match kind {
            FieldKind::String(rules) => self.string(rules, raw, path),
            FieldKind::Integer(rules) => self.integer(rules, raw, path),
            FieldKind::Boolean => match raw {
                Value::Bool(b) => Outcome::Present(Value::Bool(*b)),
                other => self.type_mismatch(path, "boolean", other),
            },
            FieldKind::Array(item) => self.array(item, raw, path),
            FieldKind::Object(schema) => {
                if !raw.is_object() {
                    return self.type_mismatch(path, "object", raw);
                }
                let before = self.errors.len();
                let object = self.object(schema, raw, path);
                if self.errors.len() > before {
                    Outcome::Invalid
                } else if object.is_empty() {
                    Outcome::Absent
                } else {
                    Outcome::Present(Value::Object(object))
                }
            }
        }
    }

    fn string(&mut self, rules: &StringRules, raw: &Value, path: &str) -> Outcome {
        let Value::String(s) = raw else {
            return self.type_mismatch(path, "string", raw);
        };

        let value = rules.normalize.apply(s);
        if value.is_empty() {
            return Outcome::Absent;
        }

        if let Some(options) = rules.one_of {
            if !options.contains(&value.as_str()) {
                let message = if options.len() <= MAX_LISTED_OPTIONS {
                    let expected: Vec<String> = options.iter().map(|o| format!("'{o}'")).collect();
                    format!(
                        "Invalid enum value. Expected {}, received '{value}'",
                        expected.join(" | ")
                    )
                } else {
                    format!("Invalid enum value '{value}'")
                };
                self.report(path, IssueCode::InvalidEnum, message);
                return Outcome::Invalid;
            }
        }

        let length = value.chars().count();
        if let Some(min) = rules.min_len {
            if length < min {
                self.report(
                    path,
                    IssueCode::TooSmall,
                    format!("String must contain at least {min} character(s)"),
                );
                return Outcome::Invalid;
            }
        }
        if let Some(max) = rules.max_len {
            if length > max {
                self.report(
                    path,
                    IssueCode::TooBig,
                    format!("String must contain at most {max} character(s)"),
                );
                return Outcome::Invalid;
            }
        }

        if let Some(pattern) = rules.pattern {
            if !pattern.is_match(&value) {
                self.report(path, IssueCode::InvalidString, pattern.message());
                return Outcome::Invalid;
            }
        }

        Outcome::Present(Value::String(value))
    }

    fn integer(&mut self, rules: &IntegerRules, raw: &Value, path: &str) -> Outcome {
        let number = match raw {
            Value::Number(n) => match as_integer(n) {
                Some(i) => i,
                None => {
                    self.report(path, IssueCode::InvalidType, "Expected integer, received float");
                    return Outcome::Invalid;
                }
            },
            Value::String(s) if s.trim().is_empty() => return Outcome::Absent,
            Value::String(s) => {
                if let Ok(i) = s.trim().parse::<i64>() {
                    i
                } else {
                    self.report(path, IssueCode::InvalidType, "Expected number, received string");
                    return Outcome::Invalid;
                }
            }
            other => return self.type_mismatch(path, "number", other),
        };

        if let Some(options) = rules.one_of {
            if !options.contains(&number) {
                let expected: Vec<String> = options.iter().map(ToString::to_string).collect();
                self.report(
                    path,
                    IssueCode::InvalidEnum,
                    format!("Expected one of {}, received {number}", expected.join(", ")),
                );
                return Outcome::Invalid;
            }
        }
        if let Some(min) = rules.min {
            if number < min {
                self.report(
                    path,
                    IssueCode::TooSmall,
                    format!("Number must be greater than or equal to {min}"),
                );
                return Outcome::Invalid;
            }
        }
        if let Some(max) = rules.max {
            if number > max {
                self.report(
                    path,
                    IssueCode::TooBig,
                    format!("Number must be less than or equal to {max}"),
                );
                return Outcome::Invalid;
            }
        }

        Outcome::Present(Value::Number(Number::from(number)))
    }

    fn array(&mut self, item: &FieldKind, raw: &Value, path: &str) -> Outcome {
        let Value::Array(items) = raw else {
            return self.type_mismatch(path, "array", raw);
        };

        let before = self.errors.len();
        let mut output = Vec::with_capacity(items.len());
        for (index, value) in items.iter().enumerate() {
            if self.stopped() {
                break;
            }
            let item_path = join(path, &index.to_string());
            if let Outcome::Present(v) = self.value(item, value, &item_path) {
                output.push(v);
            }
        }

        if self.errors.len() > before {
            Outcome::Invalid
        } else if output.is_empty() {
            Outcome::Absent
        } else {
            Outcome::Present(Value::Array(output))
        }
    }

    fn type_mismatch(&mut self, path: &str, expected: &str, raw: &Value) -> Outcome {
        self.report(
            path,
            IssueCode::InvalidType,
            format!("Expected {expected}, received {}", type_name(raw)),
        );
        Outcome::Invalid
    }
}

/// Converts a JSON number to an integer, accepting floats with no fraction.
#[allow(clippy::cast_possible_truncation)] // range is checked before the cast
fn as_integer(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f <= i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then(|| f as i64)
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}
