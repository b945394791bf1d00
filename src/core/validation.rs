//! Structural validation of argument data against a merged [`Schema`].
//!
//! The typed [`Rule`] tree reports violations first, in schema declaration
//! order. The compiled Draft 4 validator then adds every failure the tree did
//! not report at the same path and keyword, so no declared keyword goes
//! unchecked. [`best_match`] then picks the one reported to the caller: the shallowest
//! instance path wins, plain rules beat `anyOf`/`oneOf`, and remaining ties go
//! to the first violation collected. A composite winner without a custom
//! message is replaced by the best of its branch violations.

use super::schema::{AdditionalProperties, CUSTOM_ERROR_PREFIX, Rule, RuleKind, Schema};
use serde_json::Value;

/// A single failed rule
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: RuleKind,
    /// Path of the offending value inside the validated data
    pub path: Vec<String>,
    /// Generic message derived from the rule
    pub message: String,
    /// Message declared by the provider under `error_{kind}`
    pub custom_message: Option<String>,
    /// Branch violations of a failed `anyOf`/`oneOf`
    pub context: Vec<Violation>,
}

impl Violation {
    fn new(rule: &Rule, kind: RuleKind, path: &[String], message: String) -> Self {
        Self {
            kind,
            path: path.to_vec(),
            message,
            custom_message: rule.custom_message(kind).map(str::to_string),
            context: Vec::new(),
        }
    }

    /// The message reported to callers, custom override first
    pub fn display_message(&self) -> &str {
        self.custom_message.as_deref().unwrap_or(&self.message)
    }

    fn relevance(&self) -> (usize, bool) {
        (self.path.len(), self.kind.is_composite())
    }
}

/// Validates `instance` against `schema`, returning every violation
pub fn iter_errors(schema: &Schema, instance: &Value) -> Vec<Violation> {
    let mut violations = rule_errors(schema.root(), instance);
    let reported: Vec<(Vec<String>, RuleKind)> = violations
        .iter()
        .map(|violation| (violation.path.clone(), violation.kind))
        .collect();

    for error in schema.validator().iter_errors(instance) {
        let path = pointer_segments(&error.instance_path.to_string());
        let schema_path = pointer_segments(&error.schema_path.to_string());
        // Paths that end in no known keyword are reported as a failed subschema
        let (keyword_at, kind) = schema_path
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, segment)| {
                RuleKind::from_validation_keyword(segment).map(|kind| (index, kind))
            })
            .unwrap_or((schema_path.len(), RuleKind::AllOf));

        if reported.iter().any(|(seen, seen_kind)| *seen == path && *seen_kind == kind) {
            continue;
        }

        let custom_message = schema
            .json()
            .pointer(&to_pointer(&schema_path[..keyword_at]))
            .and_then(|declared| declared.get(format!("{CUSTOM_ERROR_PREFIX}{}", kind.keyword())))
            .and_then(Value::as_str)
            .map(str::to_string);

        violations.push(Violation {
            kind,
            path,
            message: error.to_string(),
            custom_message,
            context: Vec::new(),
        });
    }
    violations
}

/// Validates `instance` against the typed `rule` tree only
pub fn rule_errors(rule: &Rule, instance: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut path = Vec::new();
    validate(rule, instance, &mut path, &mut violations);
    violations
}

/// Picks the most relevant violation, see the module documentation
pub fn best_match(violations: Vec<Violation>) -> Option<Violation> {
    let mut best = violations.into_iter().min_by_key(Violation::relevance)?;
    while best.custom_message.is_none() && !best.context.is_empty() {
        let context = std::mem::take(&mut best.context);
        match context.into_iter().min_by_key(Violation::relevance) {
            Some(cause) => best = cause,
            None => break,
        }
    }
    Some(best)
}

fn validate(rule: &Rule, instance: &Value, path: &mut Vec<String>, out: &mut Vec<Violation>) {
    if !rule.types.is_empty() && !rule.types.iter().any(|t| t.matches(instance)) {
        let expected = rule
            .types
            .iter()
            .map(|t| format!("'{t}'"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(Violation::new(
            rule,
            RuleKind::Type,
            path,
            format!("{} is not of type {expected}", repr(instance)),
        ));
    }

    if let Some(allowed) = &rule.enumeration {
        if !allowed.iter().any(|candidate| candidate == instance) {
            out.push(Violation::new(
                rule,
                RuleKind::Enum,
                path,
                format!("{} is not one of {}", repr(instance), repr_list(allowed)),
            ));
        }
    }

    match instance {
        Value::String(text) => validate_string(rule, instance, text, path, out),
        Value::Number(number) => validate_number(rule, instance, number, path, out),
        Value::Array(items) => validate_array(rule, instance, items, path, out),
        Value::Object(_) => validate_object(rule, instance, path, out),
        _ => {}
    }

    for sub in &rule.all_of {
        validate(sub, instance, path, out);
    }

    if !rule.any_of.is_empty() {
        let mut context = Vec::new();
        let mut matched = false;
        for sub in &rule.any_of {
            let mut branch = Vec::new();
            validate(sub, instance, path, &mut branch);
            if branch.is_empty() {
                matched = true;
                break;
            }
            context.extend(branch);
        }
        if !matched {
            let mut violation = Violation::new(
                rule,
                RuleKind::AnyOf,
                path,
                format!("{} is not valid under any of the given schemas", repr(instance)),
            );
            violation.context = context;
            out.push(violation);
        }
    }

    if !rule.one_of.is_empty() {
        let mut context = Vec::new();
        let mut valid_branches = 0usize;
        for sub in &rule.one_of {
            let mut branch = Vec::new();
            validate(sub, instance, path, &mut branch);
            if branch.is_empty() {
                valid_branches += 1;
            } else {
                context.extend(branch);
            }
        }
        match valid_branches {
            1 => {}
            0 => {
                let mut violation = Violation::new(
                    rule,
                    RuleKind::OneOf,
                    path,
                    format!("{} is not valid under any of the given schemas", repr(instance)),
                );
                violation.context = context;
                out.push(violation);
            }
            _ => out.push(Violation::new(
                rule,
                RuleKind::OneOf,
                path,
                format!(
                    "{} is valid under more than one of the given schemas",
                    repr(instance)
                ),
            )),
        }
    }

    if let Some(negated) = &rule.not {
        let mut branch = Vec::new();
        validate(negated, instance, path, &mut branch);
        if branch.is_empty() {
            let declared = rule
                .not_declared
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_default();
            out.push(Violation::new(
                rule,
                RuleKind::Not,
                path,
                format!("{} is not allowed for {declared}", repr(instance)),
            ));
        }
    }
}

fn validate_string(
    rule: &Rule,
    instance: &Value,
    text: &str,
    path: &[String],
    out: &mut Vec<Violation>,
) {
    if let Some(format) = rule.format.as_ref().filter(|format| !format.check(text)) {
        out.push(Violation::new(
            rule,
            RuleKind::Format,
            path,
            format!("{} is not a '{}'", repr(instance), format.as_str()),
        ));
    }

    if let Some(pattern) = rule.pattern.as_ref().filter(|pattern| !pattern.is_match(text)) {
        out.push(Violation::new(
            rule,
            RuleKind::Pattern,
            path,
            format!("{} does not match '{}'", repr(instance), pattern.as_str()),
        ));
    }

    let length = text.chars().count() as u64;
    if rule.min_length.is_some_and(|min| length < min) {
        out.push(Violation::new(
            rule,
            RuleKind::MinLength,
            path,
            format!("{} is too short", repr(instance)),
        ));
    }
    if rule.max_length.is_some_and(|max| length > max) {
        out.push(Violation::new(
            rule,
            RuleKind::MaxLength,
            path,
            format!("{} is too long", repr(instance)),
        ));
    }
}

fn validate_number(
    rule: &Rule,
    instance: &Value,
    number: &serde_json::Number,
    path: &[String],
    out: &mut Vec<Violation>,
) {
    let Some(value) = number.as_f64() else {
        return;
    };

    if let Some(minimum) = rule.minimum {
        if rule.exclusive_minimum && value <= minimum {
            out.push(Violation::new(
                rule,
                RuleKind::Minimum,
                path,
                format!("{} is less than or equal to the minimum of {minimum}", repr(instance)),
            ));
        } else if value < minimum {
            out.push(Violation::new(
                rule,
                RuleKind::Minimum,
                path,
                format!("{} is less than the minimum of {minimum}", repr(instance)),
            ));
        }
    }

    if let Some(maximum) = rule.maximum {
        if rule.exclusive_maximum && value >= maximum {
            out.push(Violation::new(
                rule,
                RuleKind::Maximum,
                path,
                format!(
                    "{} is greater than or equal to the maximum of {maximum}",
                    repr(instance)
                ),
            ));
        } else if value > maximum {
            out.push(Violation::new(
                rule,
                RuleKind::Maximum,
                path,
                format!("{} is greater than the maximum of {maximum}", repr(instance)),
            ));
        }
    }

    if let Some(divisor) = rule.multiple_of {
        let multiple = match number.as_i64() {
            Some(integer) if divisor.fract() == 0.0 && divisor <= i64::MAX as f64 => {
                integer % (divisor as i64) == 0
            }
            _ => (value / divisor).fract() == 0.0,
        };
        if !multiple {
            out.push(Violation::new(
                rule,
                RuleKind::MultipleOf,
                path,
                format!("{} is not a multiple of {divisor}", repr(instance)),
            ));
        }
    }
}

fn validate_array(
    rule: &Rule,
    instance: &Value,
    items: &[Value],
    path: &mut Vec<String>,
    out: &mut Vec<Violation>,
) {
    if let Some(item_rule) = &rule.items {
        for (index, item) in items.iter().enumerate() {
            path.push(index.to_string());
            validate(item_rule, item, path, out);
            path.pop();
        }
    }

    let count = items.len() as u64;
    if rule.min_items.is_some_and(|min| count < min) {
        out.push(Violation::new(
            rule,
            RuleKind::MinItems,
            path,
            format!("{} is too short", repr(instance)),
        ));
    }
    if rule.max_items.is_some_and(|max| count > max) {
        out.push(Violation::new(
            rule,
            RuleKind::MaxItems,
            path,
            format!("{} is too long", repr(instance)),
        ));
    }

    if rule.unique_items {
        let duplicated = items
            .iter()
            .enumerate()
            .any(|(index, item)| items[..index].contains(item));
        if duplicated {
            out.push(Violation::new(
                rule,
                RuleKind::UniqueItems,
                path,
                format!("{} has non-unique elements", repr(instance)),
            ));
        }
    }
}

fn validate_object(rule: &Rule, instance: &Value, path: &mut Vec<String>, out: &mut Vec<Violation>) {
    let Value::Object(fields) = instance else {
        return;
    };

    let count = fields.len() as u64;
    if rule.min_properties.is_some_and(|min| count < min) {
        out.push(Violation::new(
            rule,
            RuleKind::MinProperties,
            path,
            format!("{} does not have enough properties", repr(instance)),
        ));
    }
    if rule.max_properties.is_some_and(|max| count > max) {
        out.push(Violation::new(
            rule,
            RuleKind::MaxProperties,
            path,
            format!("{} has too many properties", repr(instance)),
        ));
    }

    for name in &rule.required {
        if !fields.contains_key(name) {
            out.push(Violation::new(
                rule,
                RuleKind::Required,
                path,
                format!("'{name}' is a required property"),
            ));
        }
    }

    for (name, property_rule) in &rule.properties {
        if let Some(value) = fields.get(name) {
            path.push(name.clone());
            validate(property_rule, value, path, out);
            path.pop();
        }
    }

    for (pattern, property_rule) in &rule.pattern_properties {
        for (name, value) in fields.iter().filter(|(name, _)| pattern.is_match(name)) {
            path.push(name.clone());
            validate(property_rule, value, path, out);
            path.pop();
        }
    }

    let extras: Vec<&String> = fields
        .keys()
        .filter(|name| !rule.properties.contains_key(name.as_str()))
        .filter(|name| !rule.pattern_properties.iter().any(|(pattern, _)| pattern.is_match(name)))
        .collect();
    match &rule.additional_properties {
        AdditionalProperties::Allowed => {}
        AdditionalProperties::Forbidden => {
            if !extras.is_empty() {
                let listed = extras
                    .iter()
                    .map(|name| format!("'{name}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let verb = if extras.len() == 1 { "was" } else { "were" };
                out.push(Violation::new(
                    rule,
                    RuleKind::AdditionalProperties,
                    path,
                    format!("Additional properties are not allowed ({listed} {verb} unexpected)"),
                ));
            }
        }
        AdditionalProperties::Schema(extra_rule) => {
            for name in extras {
                if let Some(value) = fields.get(name) {
                    path.push(name.clone());
                    validate(extra_rule, value, path, out);
                    path.pop();
                }
            }
        }
    }

    for (name, needed) in &rule.dependencies {
        if !fields.contains_key(name) {
            continue;
        }
        for dependency in needed {
            if !fields.contains_key(dependency) {
                out.push(Violation::new(
                    rule,
                    RuleKind::Dependencies,
                    path,
                    format!("'{dependency}' is a dependency of '{name}'"),
                ));
            }
        }
    }
}

/// Renders a value for messages: strings quoted, everything else as JSON
fn repr(value: &Value) -> String {
    match value {
        Value::String(text) => format!("'{text}'"),
        Value::Array(items) => repr_list(items),
        other => other.to_string(),
    }
}

fn repr_list(items: &[Value]) -> String {
    let rendered: Vec<String> = items.iter().map(repr).collect();
    format!("[{}]", rendered.join(", "))
}

/// Splits a JSON pointer into unescaped segments; the root is empty
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn to_pointer(segments: &[String]) -> String {
    segments
        .iter()
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Schema;
    use serde_json::json;

    fn schema(fragment: Value, required: &[&str]) -> Schema {
        let required: Vec<String> = required.iter().map(|s| s.to_string()).collect();
        Schema::from_parts(fragment, &required).unwrap()
    }

    fn first_message(schema: &Schema, data: Value) -> Option<String> {
        best_match(iter_errors(schema, &data)).map(|v| v.display_message().to_string())
    }

    #[test]
    fn test_valid_data_has_no_violations() {
        let schema = schema(
            json!({"properties": {"message": {"type": "string"}, "priority": {"type": "integer"}}}),
            &["message"],
        );
        assert!(iter_errors(&schema, &json!({"message": "hi", "priority": 1})).is_empty());
    }

    #[test]
    fn test_missing_required() {
        let schema = schema(json!({"properties": {"message": {"type": "string"}}}), &["message"]);
        assert_eq!(
            first_message(&schema, json!({})).as_deref(),
            Some("'message' is a required property")
        );
    }

    #[test]
    fn test_type_mismatch_message() {
        let schema = schema(json!({"properties": {"message": {"type": "string"}}}), &[]);
        let violation = best_match(iter_errors(&schema, &json!({"message": 5}))).unwrap();
        assert_eq!(violation.kind, RuleKind::Type);
        assert_eq!(violation.path, vec!["message"]);
        assert_eq!(violation.message, "5 is not of type 'string'");
    }

    #[test]
    fn test_shallowest_violation_wins() {
        let schema = schema(
            json!({"properties": {"message": {"type": "string"}, "token": {"type": "string"}}}),
            &["token"],
        );
        assert_eq!(
            first_message(&schema, json!({"message": 1})).as_deref(),
            Some("'token' is a required property")
        );
    }

    #[test]
    fn test_first_declared_property_wins_ties() {
        let schema = schema(
            json!({"properties": {"first": {"type": "string"}, "second": {"type": "string"}}}),
            &[],
        );
        let data = json!({"second": 2, "first": 1});
        assert_eq!(
            first_message(&schema, data).as_deref(),
            Some("1 is not of type 'string'")
        );
    }

    #[test]
    fn test_custom_message_overrides_generic() {
        let schema = schema(
            json!({"properties": {
                "priority": {"type": "integer", "maximum": 2, "error_maximum": "priority must be 2 or lower"}
            }}),
            &[],
        );
        let violation = best_match(iter_errors(&schema, &json!({"priority": 5}))).unwrap();
        assert_eq!(violation.message, "5 is greater than the maximum of 2");
        assert_eq!(violation.display_message(), "priority must be 2 or lower");
    }

    #[test]
    fn test_enum_pattern_and_lengths() {
        let schema = schema(
            json!({"properties": {
                "level": {"type": "string", "enum": ["active", "passive"]},
                "code": {"type": "string", "pattern": "^[0-9]+$"},
                "name": {"type": "string", "minLength": 2, "maxLength": 4}
            }}),
            &[],
        );
        assert_eq!(
            first_message(&schema, json!({"level": "loud"})).as_deref(),
            Some("'loud' is not one of ['active', 'passive']")
        );
        assert_eq!(
            first_message(&schema, json!({"code": "12a"})).as_deref(),
            Some("'12a' does not match '^[0-9]+$'")
        );
        assert_eq!(
            first_message(&schema, json!({"name": "a"})).as_deref(),
            Some("'a' is too short")
        );
        assert_eq!(
            first_message(&schema, json!({"name": "abcde"})).as_deref(),
            Some("'abcde' is too long")
        );
    }

    #[test]
    fn test_format_violation() {
        let schema = schema(
            json!({"properties": {"url": {"type": "string", "format": "uri"}}}),
            &[],
        );
        assert_eq!(
            first_message(&schema, json!({"url": "nope"})).as_deref(),
            Some("'nope' is not a 'uri'")
        );
    }

    #[test]
    fn test_additional_properties_forbidden() {
        let schema = schema(
            json!({"properties": {"message": {"type": "string"}}, "additionalProperties": false}),
            &[],
        );
        assert_eq!(
            first_message(&schema, json!({"message": "hi", "extra": 1})).as_deref(),
            Some("Additional properties are not allowed ('extra' was unexpected)")
        );
    }

    #[test]
    fn test_dependencies() {
        let schema = schema(
            json!({
                "properties": {"username": {"type": "string"}, "password": {"type": "string"}},
                "dependencies": {"username": ["password"]}
            }),
            &[],
        );
        assert_eq!(
            first_message(&schema, json!({"username": "me"})).as_deref(),
            Some("'password' is a dependency of 'username'")
        );
        assert!(iter_errors(&schema, &json!({"password": "only"})).is_empty());
    }

    #[test]
    fn test_one_of_descends_into_branch_violation() {
        let schema = schema(
            json!({"properties": {"to": {"oneOf": [
                {"type": "string"},
                {"type": "array", "items": {"type": "string"}, "minItems": 1}
            ]}}}),
            &[],
        );

        assert!(iter_errors(&schema, &json!({"to": "a"})).is_empty());
        assert!(iter_errors(&schema, &json!({"to": ["a", "b"]})).is_empty());

        let violation = best_match(iter_errors(&schema, &json!({"to": 5}))).unwrap();
        assert_eq!(violation.kind, RuleKind::Type);
        assert_eq!(violation.message, "5 is not of type 'string'");

        let violation = best_match(iter_errors(&schema, &json!({"to": []}))).unwrap();
        assert_eq!(violation.message, "[] is not of type 'string'");
    }

    #[test]
    fn test_composite_custom_message_is_kept() {
        let schema = schema(
            json!({"properties": {"to": {
                "anyOf": [{"type": "string"}, {"type": "integer"}],
                "error_anyOf": "to must be a name or an id"
            }}}),
            &[],
        );
        let violation = best_match(iter_errors(&schema, &json!({"to": true}))).unwrap();
        assert_eq!(violation.display_message(), "to must be a name or an id");
    }

    #[test]
    fn test_items_and_unique_items() {
        let schema = schema(
            json!({"properties": {"tags": {
                "type": "array",
                "items": {"type": "string"},
                "uniqueItems": true
            }}}),
            &[],
        );

        let violation = best_match(iter_errors(&schema, &json!({"tags": ["a", 1]}))).unwrap();
        assert_eq!(violation.path, vec!["tags", "1"]);

        assert_eq!(
            first_message(&schema, json!({"tags": ["a", "a"]})).as_deref(),
            Some("['a', 'a'] has non-unique elements")
        );
    }

    #[test]
    fn test_draft4_numeric_and_object_keywords() {
        let schema = schema(
            json!({"properties": {
                "priority": {"type": "integer", "multipleOf": 5, "maximum": 10, "exclusiveMaximum": true},
                "to": {"not": {"enum": ["root"]}},
                "tags": {"type": "object", "minProperties": 1}
            }}),
            &[],
        );

        let violations = iter_errors(&schema, &json!({"priority": 10, "to": "root", "tags": {}}));
        let kinds: Vec<RuleKind> = violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&RuleKind::Maximum));
        assert!(kinds.contains(&RuleKind::Not));
        assert!(kinds.contains(&RuleKind::MinProperties));

        assert_eq!(
            first_message(&schema, json!({"priority": 10})).as_deref(),
            Some("10 is greater than or equal to the maximum of 10")
        );
        assert_eq!(
            first_message(&schema, json!({"priority": 7})).as_deref(),
            Some("7 is not a multiple of 5")
        );
        assert_eq!(
            first_message(&schema, json!({"to": "root"})).as_deref(),
            Some("'root' is not allowed for {\"enum\":[\"root\"]}")
        );
        assert_eq!(
            first_message(&schema, json!({"tags": {}})).as_deref(),
            Some("{} does not have enough properties")
        );
        assert!(iter_errors(&schema, &json!({"priority": 5, "to": "ops", "tags": {"a": 1}})).is_empty());
    }

    #[test]
    fn test_pattern_properties_and_extras() {
        let schema = schema(
            json!({
                "properties": {"message": {"type": "string"}},
                "patternProperties": {"^x-": {"type": "string"}},
                "additionalProperties": false
            }),
            &[],
        );

        assert!(iter_errors(&schema, &json!({"message": "hi", "x-trace": "abc"})).is_empty());

        let violation = best_match(iter_errors(&schema, &json!({"x-trace": 1}))).unwrap();
        assert_eq!(violation.kind, RuleKind::Type);
        assert_eq!(violation.path, vec!["x-trace"]);

        assert_eq!(
            first_message(&schema, json!({"other": 1})).as_deref(),
            Some("Additional properties are not allowed ('other' was unexpected)")
        );
    }

    #[test]
    fn test_referenced_rules_are_enforced() {
        let schema = schema(
            json!({
                "definitions": {"name": {"type": "string", "minLength": 1}},
                "properties": {"user": {"$ref": "#/definitions/name"}}
            }),
            &[],
        );

        assert!(rule_errors(schema.root(), &json!({"user": ""})).is_empty());

        let violation = best_match(iter_errors(&schema, &json!({"user": ""}))).unwrap();
        assert_eq!(violation.path, vec!["user"]);
        assert_eq!(violation.kind, RuleKind::MinLength);
        assert!(!violation.display_message().is_empty());

        assert!(iter_errors(&schema, &json!({"user": "ana"})).is_empty());
    }

    #[test]
    fn test_pointer_segments() {
        assert!(pointer_segments("").is_empty());
        assert_eq!(pointer_segments("/tags/1"), vec!["tags", "1"]);
        assert_eq!(pointer_segments("/a~1b/c~0d"), vec!["a/b", "c~d"]);
        assert_eq!(to_pointer(&["a/b".to_string(), "c~d".to_string()]), "/a~1b/c~0d");
    }

    #[test]
    fn test_best_match_of_nothing() {
        assert!(best_match(Vec::new()).is_none());
    }
}
