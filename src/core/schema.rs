//! Typed structural schema.
//!
//! Providers declare their argument schema as JSON (usually with
//! `serde_json::json!`). The declaration is merged with the provider's
//! required list and parsed once into a tree of [`Rule`] nodes, then compiled
//! into a Draft 4 [`jsonschema::Validator`]. Both steps form the schema
//! self-check: a declaration that cannot be turned into rules or that the
//! Draft 4 meta-schema rejects is a [`SchemaSyntaxError`], which means the
//! provider definition itself is broken.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, LazyLock};
use thiserror::Error;

/// Prefix of the keys holding custom error messages, e.g. `error_required`
pub const CUSTOM_ERROR_PREFIX: &str = "error_";

static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// A declared schema that cannot be parsed into rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} (at '{pointer}')")]
pub struct SchemaSyntaxError {
    pub pointer: String,
    pub reason: String,
}

impl SchemaSyntaxError {
    fn new(pointer: &str, reason: impl Into<String>) -> Self {
        Self {
            pointer: if pointer.is_empty() {
                "/".to_string()
            } else {
                pointer.to_string()
            },
            reason: reason.into(),
        }
    }
}

/// JSON value types a rule can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(JsonType::String),
            "integer" => Some(JsonType::Integer),
            "number" => Some(JsonType::Number),
            "boolean" => Some(JsonType::Boolean),
            "object" => Some(JsonType::Object),
            "array" => Some(JsonType::Array),
            "null" => Some(JsonType::Null),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Null => "null",
        }
    }

    /// Whether `value` is an instance of this type
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (JsonType::String, Value::String(_)) => true,
            (JsonType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (JsonType::Number, Value::Number(_)) => true,
            (JsonType::Boolean, Value::Bool(_)) => true,
            (JsonType::Object, Value::Object(_)) => true,
            (JsonType::Array, Value::Array(_)) => true,
            (JsonType::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// String formats with a checker. Unknown formats are kept as annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Uri,
    Email,
    Ipv4,
    Ipv6,
    DateTime,
    Other(String),
}

impl Format {
    pub fn parse(name: &str) -> Self {
        match name {
            "uri" | "url" => Format::Uri,
            "email" => Format::Email,
            "ipv4" => Format::Ipv4,
            "ipv6" => Format::Ipv6,
            "date-time" => Format::DateTime,
            other => Format::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Format::Uri => "uri",
            Format::Email => "email",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
            Format::DateTime => "date-time",
            Format::Other(name) => name,
        }
    }

    /// Checks a string against the format; annotation-only formats always pass
    pub fn check(&self, value: &str) -> bool {
        match self {
            Format::Uri => reqwest::Url::parse(value).is_ok(),
            Format::Email => EMAIL_REGEX
                .as_ref()
                .map(|re| re.is_match(value))
                .unwrap_or(true),
            Format::Ipv4 => value.parse::<Ipv4Addr>().is_ok(),
            Format::Ipv6 => value.parse::<Ipv6Addr>().is_ok(),
            Format::DateTime => value.parse::<jiff::Timestamp>().is_ok(),
            Format::Other(_) => true,
        }
    }
}

/// Kind of structural rule, named after its schema keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Type,
    Enum,
    Format,
    Pattern,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    MultipleOf,
    Items,
    MinItems,
    MaxItems,
    UniqueItems,
    Required,
    MinProperties,
    MaxProperties,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Dependencies,
    AllOf,
    AnyOf,
    OneOf,
    Not,
}

impl RuleKind {
    pub const ALL: [RuleKind; 24] = [
        RuleKind::Type,
        RuleKind::Enum,
        RuleKind::Format,
        RuleKind::Pattern,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Minimum,
        RuleKind::Maximum,
        RuleKind::MultipleOf,
        RuleKind::Items,
        RuleKind::MinItems,
        RuleKind::MaxItems,
        RuleKind::UniqueItems,
        RuleKind::Required,
        RuleKind::MinProperties,
        RuleKind::MaxProperties,
        RuleKind::Properties,
        RuleKind::PatternProperties,
        RuleKind::AdditionalProperties,
        RuleKind::Dependencies,
        RuleKind::AllOf,
        RuleKind::AnyOf,
        RuleKind::OneOf,
        RuleKind::Not,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            RuleKind::Type => "type",
            RuleKind::Enum => "enum",
            RuleKind::Format => "format",
            RuleKind::Pattern => "pattern",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Minimum => "minimum",
            RuleKind::Maximum => "maximum",
            RuleKind::MultipleOf => "multipleOf",
            RuleKind::Items => "items",
            RuleKind::MinItems => "minItems",
            RuleKind::MaxItems => "maxItems",
            RuleKind::UniqueItems => "uniqueItems",
            RuleKind::Required => "required",
            RuleKind::MinProperties => "minProperties",
            RuleKind::MaxProperties => "maxProperties",
            RuleKind::Properties => "properties",
            RuleKind::PatternProperties => "patternProperties",
            RuleKind::AdditionalProperties => "additionalProperties",
            RuleKind::Dependencies => "dependencies",
            RuleKind::AllOf => "allOf",
            RuleKind::AnyOf => "anyOf",
            RuleKind::OneOf => "oneOf",
            RuleKind::Not => "not",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// Like [`RuleKind::from_keyword`], folding the Draft 4 exclusive flags
    /// into the bound they modify
    pub fn from_validation_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "exclusiveMinimum" => Some(RuleKind::Minimum),
            "exclusiveMaximum" => Some(RuleKind::Maximum),
            other => Self::from_keyword(other),
        }
    }

    /// Composite rules are weak matches when picking the most relevant violation
    pub fn is_composite(&self) -> bool {
        matches!(self, RuleKind::AnyOf | RuleKind::OneOf)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[derive(Debug, Clone, Default)]
pub enum AdditionalProperties {
    #[default]
    Allowed,
    Forbidden,
    Schema(Box<Rule>),
}

/// One node of the structural schema tree
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub title: Option<String>,
    pub description: Option<String>,
    pub types: Vec<JsonType>,
    pub format: Option<Format>,
    pub enumeration: Option<Vec<Value>>,
    pub pattern: Option<Regex>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub multiple_of: Option<f64>,
    pub items: Option<Box<Rule>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub properties: IndexMap<String, Rule>,
    pub pattern_properties: Vec<(Regex, Rule)>,
    pub required: Vec<String>,
    pub additional_properties: AdditionalProperties,
    pub dependencies: IndexMap<String, Vec<String>>,
    pub all_of: Vec<Rule>,
    pub any_of: Vec<Rule>,
    pub one_of: Vec<Rule>,
    pub not: Option<Box<Rule>>,
    /// Declaration of the `not` rule, quoted in its violation message
    pub not_declared: Option<Value>,
    messages: HashMap<RuleKind, String>,
}

impl Rule {
    /// Parses a JSON rule declaration found at `pointer`
    pub fn parse(value: &Value, pointer: &str) -> Result<Self, SchemaSyntaxError> {
        let Value::Object(map) = value else {
            return Err(SchemaSyntaxError::new(pointer, "a rule must be an object"));
        };

        let mut rule = Rule::default();
        for (key, declared) in map {
            let at = format!("{pointer}/{key}");
            match key.as_str() {
                "title" => rule.title = Some(expect_str(declared, &at)?.to_string()),
                "description" => rule.description = Some(expect_str(declared, &at)?.to_string()),
                "type" => rule.types = parse_types(declared, &at)?,
                "format" => rule.format = Some(Format::parse(expect_str(declared, &at)?)),
                "enum" => {
                    let values = expect_array(declared, &at)?;
                    if values.is_empty() {
                        return Err(SchemaSyntaxError::new(&at, "enum must not be empty"));
                    }
                    rule.enumeration = Some(values.clone());
                }
                "pattern" => rule.pattern = Some(parse_regex(expect_str(declared, &at)?, &at)?),
                "minLength" => rule.min_length = Some(expect_count(declared, &at)?),
                "maxLength" => rule.max_length = Some(expect_count(declared, &at)?),
                "minItems" => rule.min_items = Some(expect_count(declared, &at)?),
                "maxItems" => rule.max_items = Some(expect_count(declared, &at)?),
                "minimum" => rule.minimum = Some(expect_number(declared, &at)?),
                "maximum" => rule.maximum = Some(expect_number(declared, &at)?),
                "exclusiveMinimum" => rule.exclusive_minimum = expect_bool(declared, &at)?,
                "exclusiveMaximum" => rule.exclusive_maximum = expect_bool(declared, &at)?,
                "multipleOf" => {
                    let divisor = expect_number(declared, &at)?;
                    if divisor <= 0.0 {
                        return Err(SchemaSyntaxError::new(&at, "multipleOf must be greater than 0"));
                    }
                    rule.multiple_of = Some(divisor);
                }
                "minProperties" => rule.min_properties = Some(expect_count(declared, &at)?),
                "maxProperties" => rule.max_properties = Some(expect_count(declared, &at)?),
                "uniqueItems" => rule.unique_items = expect_bool(declared, &at)?,
                "items" => {
                    if declared.is_array() {
                        return Err(SchemaSyntaxError::new(
                            &at,
                            "tuple items are not supported, declare a single rule",
                        ));
                    }
                    rule.items = Some(Box::new(Rule::parse(declared, &at)?));
                }
                "additionalItems" => {
                    return Err(SchemaSyntaxError::new(
                        &at,
                        "additionalItems needs tuple items, which are not supported",
                    ));
                }
                "properties" => {
                    let Value::Object(properties) = declared else {
                        return Err(SchemaSyntaxError::new(&at, "properties must be an object"));
                    };
                    for (name, property) in properties {
                        let property_at = format!("{at}/{name}");
                        rule.properties
                            .insert(name.clone(), Rule::parse(property, &property_at)?);
                    }
                }
                "patternProperties" => {
                    let Value::Object(patterns) = declared else {
                        return Err(SchemaSyntaxError::new(
                            &at,
                            "patternProperties must be an object",
                        ));
                    };
                    for (source, property) in patterns {
                        let property_at = format!("{at}/{source}");
                        rule.pattern_properties.push((
                            parse_regex(source, &property_at)?,
                            Rule::parse(property, &property_at)?,
                        ));
                    }
                }
                "required" => rule.required = parse_names(declared, &at)?,
                "additionalProperties" => {
                    rule.additional_properties = match declared {
                        Value::Bool(true) => AdditionalProperties::Allowed,
                        Value::Bool(false) => AdditionalProperties::Forbidden,
                        other => AdditionalProperties::Schema(Box::new(Rule::parse(other, &at)?)),
                    }
                }
                "dependencies" => {
                    let Value::Object(dependencies) = declared else {
                        return Err(SchemaSyntaxError::new(&at, "dependencies must be an object"));
                    };
                    for (name, needed) in dependencies {
                        let dependency_at = format!("{at}/{name}");
                        if needed.is_object() {
                            return Err(SchemaSyntaxError::new(
                                &dependency_at,
                                "schema dependencies are not supported, list property names",
                            ));
                        }
                        rule.dependencies
                            .insert(name.clone(), parse_names(needed, &dependency_at)?);
                    }
                }
                "allOf" => rule.all_of = parse_rule_list(declared, &at)?,
                "anyOf" => rule.any_of = parse_rule_list(declared, &at)?,
                "oneOf" => rule.one_of = parse_rule_list(declared, &at)?,
                "not" => {
                    rule.not = Some(Box::new(Rule::parse(declared, &at)?));
                    rule.not_declared = Some(declared.clone());
                }
                custom if custom.starts_with(CUSTOM_ERROR_PREFIX) => {
                    let message = expect_str(declared, &at)?;
                    if let Some(kind) = RuleKind::from_keyword(&custom[CUSTOM_ERROR_PREFIX.len()..])
                    {
                        rule.messages.insert(kind, message.to_string());
                    }
                }
                // Annotations (default, examples, ...) and `$ref`, which only
                // the compiled validator resolves
                _ => {}
            }
        }

        Ok(rule)
    }

    /// Provider-declared override message for a rule kind
    pub fn custom_message(&self, kind: RuleKind) -> Option<&str> {
        self.messages.get(&kind).map(String::as_str)
    }

    /// The single scalar type of this rule, if it declares exactly one
    pub fn single_type(&self) -> Option<JsonType> {
        match self.types.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// A provider's merged schema: `properties` plus `required`, always an object contract
#[derive(Clone)]
pub struct Schema {
    json: Value,
    root: Rule,
    validator: Arc<jsonschema::Validator>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("json", &self.json)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// Merges a schema fragment with the required list and parses the result
    ///
    /// # Errors
    /// Returns [`SchemaSyntaxError`] when the fragment is not an object
    /// contract, a rule cannot be parsed, a required name is not declared
    /// under `properties`, or the Draft 4 meta-schema rejects the result.
    pub fn from_parts(fragment: Value, required: &[String]) -> Result<Self, SchemaSyntaxError> {
        let Value::Object(mut merged) = fragment else {
            return Err(SchemaSyntaxError::new("", "schema must be a JSON object"));
        };

        match merged.get("type") {
            None => {
                merged.insert("type".to_string(), Value::String("object".to_string()));
            }
            Some(Value::String(kind)) if kind == "object" => {}
            Some(other) => {
                return Err(SchemaSyntaxError::new(
                    "/type",
                    format!("schema must be of type 'object', found {other}"),
                ));
            }
        }

        if !merged.contains_key("properties") {
            merged.insert("properties".to_string(), Value::Object(Map::new()));
        }
        // Draft 4 forbids an empty `required` list
        if required.is_empty() {
            merged.remove("required");
        } else {
            merged.insert(
                "required".to_string(),
                Value::Array(required.iter().cloned().map(Value::String).collect()),
            );
        }

        let json = Value::Object(merged);
        let root = Rule::parse(&json, "")?;

        if let Some(missing) = root
            .required
            .iter()
            .find(|name| !root.properties.contains_key(name.as_str()))
        {
            return Err(SchemaSyntaxError::new(
                "/required",
                format!("required argument '{missing}' is not declared in properties"),
            ));
        }

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft4)
            .build(&json)
            .map_err(|e| SchemaSyntaxError::new(&e.instance_path.to_string(), e.to_string()))?;

        Ok(Self {
            json,
            root,
            validator: Arc::new(validator),
        })
    }

    /// The merged schema as JSON
    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn root(&self) -> &Rule {
        &self.root
    }

    /// Compiled Draft 4 validator of the merged schema
    pub fn validator(&self) -> &jsonschema::Validator {
        &self.validator
    }

    /// Recognized arguments in declaration order
    pub fn arguments(&self) -> &IndexMap<String, Rule> {
        &self.root.properties
    }

    pub fn required(&self) -> &[String] {
        &self.root.required
    }

    /// JSON declaration of every argument, keyed by name
    pub fn arguments_json(&self) -> Map<String, Value> {
        self.json
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

fn expect_str<'a>(value: &'a Value, pointer: &str) -> Result<&'a str, SchemaSyntaxError> {
    value
        .as_str()
        .ok_or_else(|| SchemaSyntaxError::new(pointer, format!("{value} is not a string")))
}

fn expect_bool(value: &Value, pointer: &str) -> Result<bool, SchemaSyntaxError> {
    value
        .as_bool()
        .ok_or_else(|| SchemaSyntaxError::new(pointer, format!("{value} is not a boolean")))
}

fn expect_number(value: &Value, pointer: &str) -> Result<f64, SchemaSyntaxError> {
    value
        .as_f64()
        .ok_or_else(|| SchemaSyntaxError::new(pointer, format!("{value} is not a number")))
}

fn expect_count(value: &Value, pointer: &str) -> Result<u64, SchemaSyntaxError> {
    value.as_u64().ok_or_else(|| {
        SchemaSyntaxError::new(pointer, format!("{value} is not a non-negative integer"))
    })
}

fn expect_array<'a>(value: &'a Value, pointer: &str) -> Result<&'a Vec<Value>, SchemaSyntaxError> {
    value
        .as_array()
        .ok_or_else(|| SchemaSyntaxError::new(pointer, format!("{value} is not an array")))
}

fn parse_types(value: &Value, pointer: &str) -> Result<Vec<JsonType>, SchemaSyntaxError> {
    let names: Vec<&Value> = match value {
        Value::String(_) => vec![value],
        Value::Array(items) if !items.is_empty() => items.iter().collect(),
        _ => {
            return Err(SchemaSyntaxError::new(
                pointer,
                format!("{value} is not a type name or a non-empty list of type names"),
            ));
        }
    };

    let mut types = Vec::with_capacity(names.len());
    for name in names {
        let name = expect_str(name, pointer)?;
        let parsed = JsonType::parse(name)
            .ok_or_else(|| SchemaSyntaxError::new(pointer, format!("'{name}' is not a valid type")))?;
        if types.contains(&parsed) {
            return Err(SchemaSyntaxError::new(
                pointer,
                format!("type '{name}' is listed more than once"),
            ));
        }
        types.push(parsed);
    }
    Ok(types)
}

fn parse_regex(source: &str, pointer: &str) -> Result<Regex, SchemaSyntaxError> {
    Regex::new(source).map_err(|e| {
        SchemaSyntaxError::new(pointer, format!("'{source}' is not a valid regex: {e}"))
    })
}

fn parse_names(value: &Value, pointer: &str) -> Result<Vec<String>, SchemaSyntaxError> {
    let mut names: Vec<String> = Vec::new();
    for item in expect_array(value, pointer)? {
        let name = expect_str(item, pointer)?;
        if names.iter().any(|existing| existing == name) {
            return Err(SchemaSyntaxError::new(
                pointer,
                format!("'{name}' is listed more than once"),
            ));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

fn parse_rule_list(value: &Value, pointer: &str) -> Result<Vec<Rule>, SchemaSyntaxError> {
    let items = expect_array(value, pointer)?;
    if items.is_empty() {
        return Err(SchemaSyntaxError::new(pointer, "must list at least one rule"));
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| Rule::parse(item, &format!("{pointer}/{index}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_adds_type_and_required() {
        let schema = Schema::from_parts(
            json!({"properties": {"message": {"type": "string"}}}),
            &names(&["message"]),
        )
        .unwrap();

        assert_eq!(schema.json()["type"], "object");
        assert_eq!(schema.json()["required"], json!(["message"]));
        assert_eq!(schema.required(), &["message".to_string()]);
        assert!(schema.arguments().contains_key("message"));
    }

    #[test]
    fn test_arguments_keep_declaration_order() {
        let schema = Schema::from_parts(
            json!({"properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "string"},
                "mid": {"type": "integer"}
            }}),
            &[],
        )
        .unwrap();

        let order: Vec<&str> = schema.arguments().keys().map(String::as_str).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_required_must_be_declared() {
        let err = Schema::from_parts(
            json!({"properties": {"message": {"type": "string"}}}),
            &names(&["message", "token"]),
        )
        .unwrap_err();

        assert_eq!(err.pointer, "/required");
        assert!(err.reason.contains("'token'"));
    }

    #[test]
    fn test_non_object_schema_rejected() {
        assert!(Schema::from_parts(json!(["nope"]), &[]).is_err());

        let err = Schema::from_parts(json!({"type": "string"}), &[]).unwrap_err();
        assert_eq!(err.pointer, "/type");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Schema::from_parts(
            json!({"properties": {"message": {"type": "strng"}}}),
            &[],
        )
        .unwrap_err();

        assert_eq!(err.pointer, "/properties/message/type");
        assert!(err.reason.contains("'strng' is not a valid type"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Schema::from_parts(
            json!({"properties": {"token": {"type": "string", "pattern": "(unclosed"}}}),
            &[],
        )
        .unwrap_err();

        assert_eq!(err.pointer, "/properties/token/pattern");
    }

    #[test]
    fn test_empty_enum_and_negative_length_rejected() {
        assert!(Schema::from_parts(json!({"properties": {"a": {"enum": []}}}), &[]).is_err());
        assert!(Schema::from_parts(json!({"properties": {"a": {"minLength": -1}}}), &[]).is_err());
        assert!(Schema::from_parts(json!({"properties": {"a": {"anyOf": []}}}), &[]).is_err());
    }

    #[test]
    fn test_custom_messages_are_parsed() {
        let schema = Schema::from_parts(
            json!({
                "properties": {
                    "priority": {
                        "type": "integer",
                        "minimum": -2,
                        "maximum": 2,
                        "error_maximum": "priority is at most 2",
                        "error_unknown": "ignored"
                    }
                },
                "error_required": "missing a mandatory argument"
            }),
            &[],
        )
        .unwrap();

        let priority = &schema.arguments()["priority"];
        assert_eq!(
            priority.custom_message(RuleKind::Maximum),
            Some("priority is at most 2")
        );
        assert_eq!(priority.custom_message(RuleKind::Minimum), None);
        assert_eq!(
            schema.root().custom_message(RuleKind::Required),
            Some("missing a mandatory argument")
        );
    }

    #[test]
    fn test_composite_and_nested_rules() {
        let schema = Schema::from_parts(
            json!({
                "properties": {
                    "to": {
                        "oneOf": [
                            {"type": "string", "format": "email"},
                            {"type": "array", "items": {"type": "string", "format": "email"}, "minItems": 1, "uniqueItems": true}
                        ]
                    },
                    "headers": {
                        "type": "object",
                        "additionalProperties": {"type": "string"}
                    }
                },
                "dependencies": {"username": ["password"]},
                "additionalProperties": false
            }),
            &[],
        )
        .unwrap();

        let to = &schema.arguments()["to"];
        assert_eq!(to.one_of.len(), 2);
        assert_eq!(to.one_of[1].min_items, Some(1));
        assert!(to.one_of[1].unique_items);
        assert_eq!(to.one_of[0].format, Some(Format::Email));
        assert!(matches!(
            schema.arguments()["headers"].additional_properties,
            AdditionalProperties::Schema(_)
        ));
        assert!(matches!(
            schema.root().additional_properties,
            AdditionalProperties::Forbidden
        ));
        assert_eq!(schema.root().dependencies["username"], vec!["password"]);
    }

    #[test]
    fn test_empty_required_is_omitted() {
        let schema = Schema::from_parts(
            json!({"properties": {"channel": {"type": "string"}}, "required": ["stale"]}),
            &[],
        )
        .unwrap();

        assert!(schema.json().get("required").is_none());
        assert!(schema.required().is_empty());
    }

    #[test]
    fn test_draft4_keywords_are_parsed() {
        let schema = Schema::from_parts(
            json!({
                "properties": {
                    "priority": {"type": "integer", "multipleOf": 5, "maximum": 10, "exclusiveMaximum": true},
                    "to": {"not": {"enum": ["root"]}},
                    "tags": {"type": "object", "minProperties": 1, "maxProperties": 3}
                },
                "patternProperties": {"^x-": {"type": "string"}}
            }),
            &[],
        )
        .unwrap();

        let priority = &schema.arguments()["priority"];
        assert_eq!(priority.multiple_of, Some(5.0));
        assert!(priority.exclusive_maximum);
        assert!(!priority.exclusive_minimum);
        assert_eq!(schema.arguments()["to"].not_declared, Some(json!({"enum": ["root"]})));
        assert_eq!(schema.arguments()["tags"].min_properties, Some(1));
        assert_eq!(schema.arguments()["tags"].max_properties, Some(3));
        assert_eq!(schema.root().pattern_properties.len(), 1);
    }

    #[test]
    fn test_unenforceable_keywords_rejected() {
        let err = Schema::from_parts(
            json!({"properties": {"list": {"type": "array", "additionalItems": false}}}),
            &[],
        )
        .unwrap_err();
        assert_eq!(err.pointer, "/properties/list/additionalItems");

        let err = Schema::from_parts(
            json!({"properties": {"count": {"type": "integer", "multipleOf": 0}}}),
            &[],
        )
        .unwrap_err();
        assert_eq!(err.pointer, "/properties/count/multipleOf");
    }

    #[test]
    fn test_meta_schema_rejects_malformed_declaration() {
        // Draft 4 requires at least one name per property dependency
        let result = Schema::from_parts(
            json!({
                "properties": {"username": {"type": "string"}},
                "dependencies": {"username": []}
            }),
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_references_are_accepted() {
        let schema = Schema::from_parts(
            json!({
                "definitions": {"name": {"type": "string", "minLength": 1}},
                "properties": {"user": {"$ref": "#/definitions/name"}}
            }),
            &[],
        );
        assert!(schema.is_ok());
    }

    #[test]
    fn test_validation_keyword_folding() {
        assert_eq!(RuleKind::from_validation_keyword("exclusiveMaximum"), Some(RuleKind::Maximum));
        assert_eq!(RuleKind::from_validation_keyword("exclusiveMinimum"), Some(RuleKind::Minimum));
        assert_eq!(RuleKind::from_validation_keyword("not"), Some(RuleKind::Not));
        assert_eq!(RuleKind::from_validation_keyword("title"), None);
    }

    #[test]
    fn test_json_type_matches() {
        assert!(JsonType::Integer.matches(&json!(3)));
        assert!(!JsonType::Integer.matches(&json!(3.5)));
        assert!(JsonType::Number.matches(&json!(3)));
        assert!(JsonType::Null.matches(&Value::Null));
        assert!(!JsonType::String.matches(&json!(1)));
    }

    #[test]
    fn test_format_checks() {
        assert!(Format::Uri.check("https://example.com/hook"));
        assert!(!Format::Uri.check("not a url"));
        assert!(Format::Email.check("someone@example.com"));
        assert!(!Format::Email.check("someone"));
        assert!(Format::Ipv4.check("127.0.0.1"));
        assert!(Format::Ipv6.check("::1"));
        assert!(Format::DateTime.check("2024-01-01T10:00:00Z"));
        assert!(!Format::DateTime.check("yesterday"));
        assert!(Format::Other("color".into()).check("anything"));
    }
}
