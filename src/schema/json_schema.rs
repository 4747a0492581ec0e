//! JSON Schema rendering for advertised tool input schemas.

use serde_json::{json, Map, Value};

use super::{FieldKind, IntegerRules, Rule, Schema, StringRules};

impl Schema {
    /// Renders this schema as a JSON Schema object.
    ///
    /// Cross-field rules become `anyOf` groups of `required` lists. Several
    /// rules are combined under `allOf`.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields() {
            let mut property = kind_schema(&field.kind);
            if let Value::Object(map) = &mut property {
                map.insert("description".to_string(), json!(field.description));
                if let Some(default) = &field.default {
                    map.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(field.name.to_string(), property);
            if field.required {
                required.push(json!(field.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }

        let mut groups: Vec<Value> = self.rules().iter().map(rule_schema).collect();
        match groups.len() {
            0 => {}
            1 => {
                if let Some(Value::Object(rule)) = groups.pop() {
                    schema.extend(rule);
                }
            }
            _ => {
                schema.insert("allOf".to_string(), Value::Array(groups));
            }
        }

        Value::Object(schema)
    }
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String(rules) => string_schema(rules),
        FieldKind::Integer(rules) => integer_schema(rules),
        FieldKind::Boolean => json!({ "type": "boolean" }),
        FieldKind::Array(item) => json!({ "type": "array", "items": kind_schema(item) }),
        FieldKind::Object(schema) => schema.to_json_schema(),
    }
}

fn string_schema(rules: &StringRules) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!("string"));
    if let Some(pattern) = rules.pattern {
        map.insert("pattern".to_string(), json!(pattern.source()));
    }
    if let Some(min) = rules.min_len {
        map.insert("minLength".to_string(), json!(min));
    }
    if let Some(max) = rules.max_len {
        map.insert("maxLength".to_string(), json!(max));
    }
    if let Some(options) = rules.one_of {
        map.insert("enum".to_string(), json!(options));
    }
    Value::Object(map)
}

fn integer_schema(rules: &IntegerRules) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!("integer"));
    if let Some(min) = rules.min {
        map.insert("minimum".to_string(), json!(min));
    }
    if let Some(max) = rules.max {
        map.insert("maximum".to_string(), json!(max));
    }
    if let Some(options) = rules.one_of {
        map.insert("enum".to_string(), json!(options));
    }
    Value::Object(map)
}

fn rule_schema(rule: &Rule) -> Value {
    match rule {
        Rule::AnyGroup { groups, .. } => {
            let any_of: Vec<Value> = groups
                .iter()
                .map(|group| json!({ "required": group }))
                .collect();
            json!({ "anyOf": any_of })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Field, FieldKind, IntegerRules, Pattern, Rule, Schema, StringRules};
    use serde_json::json;

    #[test]
    fn renders_properties_and_required() {
        let schema = Schema::new()
            .field(
                Field::new("email", "Email address", StringRules::default().pattern(Pattern::Email))
                    .required(),
            )
            .field(
                Field::new("page", "Page number", IntegerRules::default().min(1))
                    .default_value(json!(1)),
            );

        let rendered = schema.to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["required"], json!(["email"]));
        assert_eq!(rendered["properties"]["email"]["pattern"], Pattern::Email.source());
        assert_eq!(rendered["properties"]["email"]["description"], "Email address");
        assert_eq!(rendered["properties"]["page"]["minimum"], 1);
        assert_eq!(rendered["properties"]["page"]["default"], 1);
    }

    #[test]
    fn no_required_key_when_all_optional() {
        let schema = Schema::new().field(Field::new("full", "Full", FieldKind::Boolean));
        let rendered = schema.to_json_schema();
        assert!(rendered.get("required").is_none());
        assert_eq!(rendered["properties"]["full"]["type"], "boolean");
    }

    #[test]
    fn single_rule_becomes_any_of() {
        let schema = Schema::new()
            .field(Field::new("domain", "Domain", StringRules::default()))
            .field(Field::new("company", "Company", StringRules::default()))
            .rule(Rule::at_least_one_of(&["domain", "company"]));

        let rendered = schema.to_json_schema();
        assert_eq!(
            rendered["anyOf"],
            json!([{ "required": ["domain"] }, { "required": ["company"] }])
        );
        assert!(rendered.get("allOf").is_none());
    }

    #[test]
    fn several_rules_become_all_of() {
        let schema = Schema::new()
            .rule(Rule::at_least_one_of(&["a", "b"]))
            .rule(Rule::any_group(&[&["c"], &["d", "e"]], "c", "c or d+e"));

        let rendered = schema.to_json_schema();
        let all_of = rendered["allOf"].as_array().unwrap();
        assert_eq!(all_of.len(), 2);
        assert_eq!(all_of[1]["anyOf"][1], json!({ "required": ["d", "e"] }));
    }

    #[test]
    fn nested_arrays_and_enums() {
        let schema = Schema::new().field(Field::new(
            "size",
            "Sizes",
            FieldKind::array_of(StringRules::default().one_of(&["1-10", "11-50"])),
        ));
        let rendered = schema.to_json_schema();
        assert_eq!(rendered["properties"]["size"]["type"], "array");
        assert_eq!(
            rendered["properties"]["size"]["items"]["enum"],
            json!(["1-10", "11-50"])
        );
    }
}
