//! Content validator: checks a content instance against a raw schema.
//!
//! The validator re-reads the raw schema itself instead of consuming the
//! parser's tree, and it never fails: every problem becomes an entry in
//! `errors` or `warnings`.
//!
//! Per field the order is fixed. The type check comes first, and a type
//! mismatch stops all other checks for that field. Then come the type-specific
//! constraints, then `enum`, `format` and `pattern`. Fields the schema does
//! not declare only ever produce an `additional_property` warning.
//!
//! Required-ness here uses two conventions:
//! - a boolean `required: true` on the property definition itself, swept
//!   at the root and inside every nested object;
//! - a nested object's own `required` name array.
//!
//! Both fire independently, so one missing field can be reported twice.
pub mod format;
pub mod numeric;

use std::collections::{HashMap, HashSet};

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::Limits;
use crate::raw::{RawProp, join_path, number_value, render_display, type_name_of, values_equal};
use format::Format;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Stable, user-facing issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    Required,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    MinItems,
    MaxItems,
    UniqueItems,
    Enum,
    Pattern,
    FormatEmail,
    FormatDate,
    FormatDatetime,
    FormatUri,
    FormatIpv4,
    FormatIpv6,
    // warnings
    AdditionalProperty,
    UnknownField,
    InvalidPattern,
    DepthExceeded,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::Required => "required",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMinimum => "exclusive_minimum",
            Self::ExclusiveMaximum => "exclusive_maximum",
            Self::MultipleOf => "multiple_of",
            Self::MinItems => "min_items",
            Self::MaxItems => "max_items",
            Self::UniqueItems => "unique_items",
            Self::Enum => "enum",
            Self::Pattern => "pattern",
            Self::FormatEmail => "format_email",
            Self::FormatDate => "format_date",
            Self::FormatDatetime => "format_datetime",
            Self::FormatUri => "format_uri",
            Self::FormatIpv4 => "format_ipv4",
            Self::FormatIpv6 => "format_ipv6",
            Self::AdditionalProperty => "additional_property",
            Self::UnknownField => "unknown_field",
            Self::InvalidPattern => "invalid_pattern",
            Self::DepthExceeded => "depth_exceeded",
        }
    }

    pub fn is_warning(self) -> bool {
        matches!(
            self,
            Self::AdditionalProperty | Self::UnknownField | Self::InvalidPattern | Self::DepthExceeded
        )
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: IssueCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    pub property_path: String,
}

impl ValidationIssue {
    fn new(code: IssueCode, field: &str, path: &str, message: String) -> Self {
        Self {
            field: field.to_owned(),
            code,
            message,
            value: None,
            expected: None,
            property_path: path.to_owned(),
        }
    }

    fn value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    fn expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    /// Total issues reported (errors + warnings).
    pub field_count: usize,
    pub summary: String,
}

impl ValidationResult {
    pub fn error_codes(&self) -> Vec<IssueCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    pub fn warning_codes(&self) -> Vec<IssueCode> {
        self.warnings.iter().map(|w| w.code).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub validation_result: ValidationResult,
    pub timestamp: String,
    pub schema_info: SchemaInfo,
    pub error_summary: ErrorSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaInfo {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub properties_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    /// Distinct error codes in first-seen order.
    pub error_codes: Vec<IssueCode>,
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

pub struct ContentValidator<'s> {
    schema: &'s Value,
    limits: Limits,
}

impl<'s> ContentValidator<'s> {
    pub fn new(schema: &'s Value) -> Self {
        Self::with_limits(schema, Limits::default())
    }

    pub fn with_limits(schema: &'s Value, limits: Limits) -> Self {
        Self { schema, limits }
    }

    pub fn validate(&self, content: &Value) -> ValidationResult {
        let mut walk = Walk::new(self.limits);

        match self.schema.get("type").and_then(Value::as_str) {
            None | Some("object") => {
                let Some(obj) = content.as_object() else {
                    walk.push(
                        ValidationIssue::new(IssueCode::InvalidType, "_root", "_root", "Content must be an object".into())
                            .value(Value::from(type_name_of(content)))
                            .expected(Value::from("object")),
                    );
                    return walk.finish("Content type validation failed".into());
                };
                let empty = Map::new();
                let props = self.root_properties().unwrap_or(&empty);
                walk.object(obj, "", props, 1);
                walk.flagged_required(obj, props, "");
            }
            Some(other) => debug!(root_type = other, "root is not an object schema; no fields walked"),
        }

        let summary = if walk.errors.is_empty() {
            "All validations passed".to_owned()
        } else {
            format!("{} validation errors found", walk.errors.len())
        };
        let result = walk.finish(summary);
        debug!(errors = result.errors.len(), warnings = result.warnings.len(), "validated content");
        result
    }

    /// Check one top-level field in isolation.
    pub fn validate_field(&self, field_name: &str, value: &Value) -> ValidationResult {
        let mut walk = Walk::new(self.limits);

        match self.root_properties().and_then(|props| props.get(field_name)) {
            Some(def) => {
                if let Some(prop) = RawProp::of(def) {
                    walk.field(field_name, value, prop, field_name, 1);
                }
            }
            None => walk.push(ValidationIssue::new(
                IssueCode::UnknownField,
                field_name,
                field_name,
                format!("Field '{field_name}' is not defined in schema"),
            )),
        }

        let summary = if walk.errors.is_empty() {
            "Field validation passed".to_owned()
        } else {
            format!("Field validation failed with {} errors", walk.errors.len())
        };
        walk.finish(summary)
    }

    pub fn report(&self, content: &Value) -> ValidationReport {
        let result = self.validate(content);

        let mut error_codes: Vec<IssueCode> = Vec::new();
        for code in result.error_codes() {
            if !error_codes.contains(&code) {
                error_codes.push(code);
            }
        }

        ValidationReport {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            schema_info: SchemaInfo {
                schema_type: self.schema.get("type").and_then(Value::as_str).map(str::to_owned),
                properties_count: self.root_properties().map_or(0, Map::len),
            },
            error_summary: ErrorSummary {
                total_errors: result.errors.len(),
                total_warnings: result.warnings.len(),
                error_codes,
            },
            validation_result: result,
        }
    }

    fn root_properties(&self) -> Option<&'s Map<String, Value>> {
        self.schema.get("properties").and_then(Value::as_object)
    }
}

/// Validate with default limits.
pub fn validate(schema: &Value, content: &Value) -> ValidationResult {
    ContentValidator::new(schema).validate(content)
}

/// Validate a single top-level field with default limits.
pub fn validate_field(schema: &Value, field_name: &str, value: &Value) -> ValidationResult {
    ContentValidator::new(schema).validate_field(field_name, value)
}

// ————————————————————————————————————————————————————————————————————————————
// WALK
// ————————————————————————————————————————————————————————————————————————————

struct Walk {
    limits: Limits,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
    /// Compiled `pattern` keywords, so `items` patterns compile once per walk.
    patterns: HashMap<String, Result<Regex, regex::Error>>,
}

impl Walk {
    fn new(limits: Limits) -> Self {
        Self { limits, errors: Vec::new(), warnings: Vec::new(), patterns: HashMap::new() }
    }

    /// The issue code alone decides error vs. warning.
    fn push(&mut self, issue: ValidationIssue) {
        if issue.code.is_warning() {
            self.warnings.push(issue);
        } else {
            self.errors.push(issue);
        }
    }

    fn compiled(&mut self, pattern: &str) -> &Result<Regex, regex::Error> {
        if !self.patterns.contains_key(pattern) {
            self.patterns.insert(pattern.to_owned(), Regex::new(pattern));
        }
        &self.patterns[pattern]
    }

    fn finish(self, summary: String) -> ValidationResult {
        ValidationResult {
            valid: self.errors.is_empty(),
            field_count: self.errors.len() + self.warnings.len(),
            errors: self.errors,
            warnings: self.warnings,
            summary,
        }
    }

    /// Check every field present in `obj` against `props`.
    fn object(&mut self, obj: &Map<String, Value>, path: &str, props: &Map<String, Value>, depth: usize) {
        for (name, value) in obj {
            let field_path = join_path(path, name);
            match props.get(name) {
                Some(def) => {
                    if let Some(prop) = RawProp::of(def) {
                        self.field(name, value, prop, &field_path, depth);
                    }
                }
                None => self.push(ValidationIssue::new(
                    IssueCode::AdditionalProperty,
                    &field_path,
                    &field_path,
                    format!("Field '{name}' is not defined in schema but is allowed"),
                )),
            }
        }
    }

    /// Properties flagged `required: true` on their own definition.
    fn flagged_required(&mut self, obj: &Map<String, Value>, props: &Map<String, Value>, path: &str) {
        for (name, def) in props {
            let flagged = RawProp::of(def).and_then(|p| p.flag("required")) == Some(true);
            if flagged && !obj.contains_key(name) {
                let field_path = join_path(path, name);
                self.push(ValidationIssue::new(
                    IssueCode::Required,
                    &field_path,
                    &field_path,
                    format!("Required field '{field_path}' is missing"),
                ));
            }
        }
    }

    fn field(&mut self, name: &str, value: &Value, prop: RawProp<'_>, path: &str, depth: usize) {
        if self.limits.exceeded(depth) {
            warn!(path, max_depth = self.limits.max_depth, "content nested past depth limit");
            self.push(ValidationIssue::new(
                IssueCode::DepthExceeded,
                name,
                path,
                format!("Field '{name}' is nested deeper than {} levels; not checked", self.limits.max_depth),
            ));
            return;
        }

        let declared = prop.type_name().unwrap_or("string");
        if !type_matches(value, declared) {
            self.push(
                ValidationIssue::new(
                    IssueCode::InvalidType,
                    name,
                    path,
                    format!("Field '{name}' must be of type {declared}"),
                )
                .value(value.clone())
                .expected(Value::from(declared)),
            );
            return;
        }

        match (declared, value) {
            (_, Value::Null) => {}
            ("string", Value::String(s)) => self.string(name, s, prop, path),
            ("number" | "integer", _) => {
                if let Some(n) = numeric::coerce(value) {
                    self.number(name, n, prop, path);
                }
            }
            ("array", Value::Array(items)) => self.array(name, items, prop, path, depth),
            ("object", Value::Object(obj)) => self.nested(name, obj, prop, path, depth),
            _ => {}
        }

        if let Some(allowed) = prop.list("enum").filter(|xs| !xs.is_empty()) {
            if !allowed.iter().any(|a| values_equal(value, a)) {
                self.push(
                    ValidationIssue::new(
                        IssueCode::Enum,
                        name,
                        path,
                        format!("Field '{name}' must be one of the allowed values"),
                    )
                    .value(value.clone())
                    .expected(Value::Array(allowed.clone())),
                );
            }
        }

        let text = value.as_str();
        if let (Some(format), Some(s)) = (prop.non_empty_str("format"), text.filter(|s| !s.is_empty())) {
            self.format(name, s, format, path);
        }
        if let (Some(pattern), Some(s)) = (prop.non_empty_str("pattern"), text) {
            self.pattern(name, s, pattern, path);
        }
    }

    fn string(&mut self, name: &str, s: &str, prop: RawProp<'_>, path: &str) {
        let len = s.len() as u64;
        if let Some(min) = prop.count("minLength") {
            if len < min {
                self.push(
                    ValidationIssue::new(
                        IssueCode::MinLength,
                        name,
                        path,
                        format!("Field '{name}' must be at least {min} characters"),
                    )
                    .value(Value::from(len))
                    .expected(Value::from(min)),
                );
            }
        }
        if let Some(max) = prop.count("maxLength") {
            if len > max {
                self.push(
                    ValidationIssue::new(
                        IssueCode::MaxLength,
                        name,
                        path,
                        format!("Field '{name}' must be at most {max} characters"),
                    )
                    .value(Value::from(len))
                    .expected(Value::from(max)),
                );
            }
        }
    }

    fn number(&mut self, name: &str, n: f64, prop: RawProp<'_>, path: &str) {
        for breach in numeric::breaches(n, prop) {
            self.push(
                ValidationIssue::new(
                    breach.code,
                    name,
                    path,
                    format!("Field '{name}' must be {}", breach.requirement),
                )
                .value(number_value(n))
                .expected(number_value(breach.bound)),
            );
        }
    }

    fn array(&mut self, name: &str, items: &[Value], prop: RawProp<'_>, path: &str, depth: usize) {
        let len = items.len() as u64;
        if let Some(min) = prop.count("minItems") {
            if len < min {
                self.push(
                    ValidationIssue::new(
                        IssueCode::MinItems,
                        name,
                        path,
                        format!("Field '{name}' must have at least {min} items"),
                    )
                    .value(Value::from(len))
                    .expected(Value::from(min)),
                );
            }
        }
        if let Some(max) = prop.count("maxItems") {
            if len > max {
                self.push(
                    ValidationIssue::new(
                        IssueCode::MaxItems,
                        name,
                        path,
                        format!("Field '{name}' must have at most {max} items"),
                    )
                    .value(Value::from(len))
                    .expected(Value::from(max)),
                );
            }
        }

        // Duplicates are judged on display text, so 1 and "1" collide.
        if prop.flag("uniqueItems") == Some(true) {
            let mut seen = HashSet::new();
            if let Some(dup) = items.iter().find(|item| !seen.insert(render_display(item))) {
                self.push(
                    ValidationIssue::new(
                        IssueCode::UniqueItems,
                        name,
                        path,
                        format!("Field '{name}' must have unique items"),
                    )
                    .value(dup.clone()),
                );
            }
        }

        if let Some(item_schema) = prop.object("items") {
            for (i, item) in items.iter().enumerate() {
                self.field(
                    &format!("{name}[{i}]"),
                    item,
                    RawProp(item_schema),
                    &format!("{path}[{i}]"),
                    depth + 1,
                );
            }
        }
    }

    fn nested(&mut self, name: &str, obj: &Map<String, Value>, prop: RawProp<'_>, path: &str, depth: usize) {
        if let Some(children) = prop.object("properties") {
            self.object(obj, path, children, depth + 1);
            self.flagged_required(obj, children, path);
        }

        for required in prop.required_names() {
            if !obj.contains_key(&required) {
                self.push(ValidationIssue::new(
                    IssueCode::Required,
                    &format!("{name}.{required}"),
                    &format!("{path}.{required}"),
                    format!("Required field '{name}.{required}' is missing"),
                ));
            }
        }
    }

    fn format(&mut self, name: &str, s: &str, format: &str, path: &str) {
        let Some(format) = Format::from_name(format) else {
            return;
        };
        if !format.is_valid(s) {
            self.push(
                ValidationIssue::new(format.code(), name, path, format!("Field '{name}' must be {}", format.describe()))
                    .value(Value::from(s))
                    .expected(Value::from(format.expected())),
            );
        }
    }

    fn pattern(&mut self, name: &str, s: &str, pattern: &str, path: &str) {
        let issue = match self.compiled(pattern) {
            Err(err) => ValidationIssue::new(
                IssueCode::InvalidPattern,
                name,
                path,
                format!("Invalid regex pattern for field '{name}': {err}"),
            ),
            Ok(re) if !re.is_match(s) => ValidationIssue::new(
                IssueCode::Pattern,
                name,
                path,
                format!("Field '{name}' must match the required pattern"),
            )
            .value(Value::from(s))
            .expected(Value::from(pattern)),
            Ok(_) => return,
        };
        self.push(issue);
    }
}

/// Null matches every declared type; unknown type names match everything.
fn type_matches(value: &Value, declared: &str) -> bool {
    if value.is_null() {
        return true;
    }
    match declared {
        "string" => value.is_string(),
        "number" => numeric::coerce(value).is_some(),
        "integer" => numeric::coerce(value).is_some_and(numeric::is_integral),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_with(name: &str, prop: Value) -> Value {
        json!({"type": "object", "properties": {name: prop}})
    }

    fn errors_for(prop: Value, value: Value) -> Vec<IssueCode> {
        let schema = schema_with("f", prop);
        validate(&schema, &json!({"f": value})).error_codes()
    }

    #[test]
    fn string_length_bounds() {
        let prop = json!({"type": "string", "minLength": 1, "maxLength": 100});
        assert_eq!(errors_for(prop.clone(), json!("")), vec![IssueCode::MinLength]);
        assert_eq!(errors_for(prop.clone(), json!("x".repeat(101))), vec![IssueCode::MaxLength]);

        let schema = schema_with("f", prop);
        let ok = validate(&schema, &json!({"f": "y".repeat(50)}));
        assert!(ok.valid);
        assert_eq!(ok.summary, "All validations passed");
        assert_eq!(ok.field_count, 0);
    }

    #[test]
    fn length_counts_bytes() {
        // "é" is two bytes
        assert_eq!(errors_for(json!({"type": "string", "maxLength": 1}), json!("é")), vec![IssueCode::MaxLength]);
    }

    #[test]
    fn enum_membership() {
        let prop = json!({"type": "string", "enum": ["a", "b"]});
        assert!(errors_for(prop.clone(), json!("a")).is_empty());
        assert_eq!(errors_for(prop, json!("c")), vec![IssueCode::Enum]);
        // numbers compare by value
        assert!(errors_for(json!({"type": "number", "enum": [1, 2]}), json!(2.0)).is_empty());
    }

    #[test]
    fn nested_format_reports_dotted_path() {
        let schema = json!({"type": "object", "properties": {
            "contact": {"type": "object", "properties": {"email": {"type": "string", "format": "email"}}}
        }});
        let bad = validate(&schema, &json!({"contact": {"email": "bad"}}));
        assert_eq!(bad.error_codes(), vec![IssueCode::FormatEmail]);
        assert_eq!(bad.errors[0].property_path, "contact.email");
        assert_eq!(bad.errors[0].field, "email");
        assert_eq!(bad.errors[0].expected, Some(json!("valid email format")));

        assert!(validate(&schema, &json!({"contact": {"email": "a@b.co"}})).valid);
    }

    #[test]
    fn empty_strings_skip_format_checks() {
        assert!(errors_for(json!({"type": "string", "format": "uri"}), json!("")).is_empty());
        assert!(errors_for(json!({"type": "string", "format": "made-up"}), json!("whatever")).is_empty());
    }

    #[test]
    fn type_mismatch_suppresses_other_checks() {
        let prop = json!({"type": "string", "minLength": 5, "enum": ["hello"], "pattern": "^h"});
        let schema = schema_with("f", prop);
        let r = validate(&schema, &json!({"f": 42}));
        assert_eq!(r.error_codes(), vec![IssueCode::InvalidType]);
        assert_eq!(r.errors[0].message, "Field 'f' must be of type string");
        assert_eq!(r.errors[0].value, Some(json!(42)));
        assert_eq!(r.errors[0].expected, Some(json!("string")));
    }

    #[test]
    fn integer_rejects_fractions_but_accepts_whole_floats() {
        let prop = json!({"type": "integer"});
        assert_eq!(errors_for(prop.clone(), json!(1.5)), vec![IssueCode::InvalidType]);
        assert!(errors_for(prop.clone(), json!(2.0)).is_empty());
        assert!(errors_for(prop, json!(7)).is_empty());
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let prop = json!({"type": "number", "maximum": 10});
        assert!(errors_for(prop.clone(), json!("9.5")).is_empty());
        assert_eq!(errors_for(prop.clone(), json!("11")), vec![IssueCode::Maximum]);
        assert_eq!(errors_for(prop, json!("eleven")), vec![IssueCode::InvalidType]);
    }

    #[test]
    fn numeric_constraints_in_order() {
        let prop = json!({"type": "number", "minimum": 10, "exclusiveMinimum": 10, "multipleOf": 3});
        assert_eq!(
            errors_for(prop, json!(4)),
            vec![IssueCode::Minimum, IssueCode::ExclusiveMinimum, IssueCode::MultipleOf]
        );
    }

    #[test]
    fn number_issue_values_prefer_integers() {
        let schema = schema_with("n", json!({"type": "integer", "maximum": 3}));
        let r = validate(&schema, &json!({"n": 5}));
        assert_eq!(r.errors[0].value, Some(json!(5)));
        assert_eq!(r.errors[0].expected, Some(json!(3)));
        assert_eq!(r.errors[0].message, "Field 'n' must be at most 3.00");
    }

    #[test]
    fn unique_items_compares_display_strings() {
        let prop = json!({"type": "array", "uniqueItems": true});
        assert_eq!(errors_for(prop.clone(), json!([1, "1"])), vec![IssueCode::UniqueItems]);
        assert_eq!(errors_for(prop.clone(), json!([1, 2, 1, 2])), vec![IssueCode::UniqueItems]);
        assert!(errors_for(prop, json!([1, 2, "3"])).is_empty());
    }

    #[test]
    fn array_bounds_and_item_paths() {
        let schema = schema_with(
            "tags",
            json!({"type": "array", "minItems": 1, "maxItems": 3, "items": {"type": "string", "maxLength": 3}}),
        );
        assert_eq!(validate(&schema, &json!({"tags": []})).error_codes(), vec![IssueCode::MinItems]);
        assert_eq!(
            validate(&schema, &json!({"tags": ["a", "b", "c", "d"]})).error_codes(),
            vec![IssueCode::MaxItems]
        );

        let r = validate(&schema, &json!({"tags": ["ok", "toolong", 5]}));
        assert_eq!(r.error_codes(), vec![IssueCode::MaxLength, IssueCode::InvalidType]);
        assert_eq!(r.errors[0].field, "tags[1]");
        assert_eq!(r.errors[0].property_path, "tags[1]");
        assert_eq!(r.errors[1].property_path, "tags[2]");
    }

    #[test]
    fn undeclared_fields_only_warn() {
        let schema = schema_with("known", json!({"type": "string"}));
        let r = validate(&schema, &json!({"known": "x", "extra": {"deep": true}}));
        assert!(r.valid);
        assert!(r.errors.is_empty());
        assert_eq!(r.warning_codes(), vec![IssueCode::AdditionalProperty]);
        assert_eq!(r.warnings[0].field, "extra");
        assert_eq!(r.field_count, 1);
    }

    #[test]
    fn nested_undeclared_fields_warn_with_full_path() {
        let schema = schema_with("o", json!({"type": "object", "properties": {"a": {"type": "string"}}}));
        let r = validate(&schema, &json!({"o": {"a": "x", "b": 1}}));
        assert!(r.valid);
        assert_eq!(r.warnings[0].property_path, "o.b");
    }

    #[test]
    fn issues_are_routed_by_their_code() {
        let schema = json!({"properties": {
            "name": {"type": "string", "minLength": 3, "required": true},
            "code": {"type": "string", "pattern": "([unclosed"}
        }});
        let r = validate(&schema, &json!({"name": "ab", "code": "x", "extra": 1}));
        assert!(!r.errors.is_empty() && !r.warnings.is_empty());
        assert!(r.errors.iter().all(|e| !e.code.is_warning()));
        assert!(r.warnings.iter().all(|w| w.code.is_warning()));
        assert_eq!(r.warning_codes(), vec![IssueCode::InvalidPattern, IssueCode::AdditionalProperty]);
    }

    #[test]
    fn item_patterns_compile_once_per_walk() {
        let prop = json!({"type": "array", "items": {"type": "string", "pattern": "^[a-z]$"}});
        let mut walk = Walk::new(Limits::default());
        walk.field("tags", &json!(["a", "b", "1", "c"]), RawProp::of(&prop).unwrap(), "tags", 1);
        assert_eq!(walk.patterns.len(), 1);
        assert_eq!(walk.errors.len(), 1);
        assert_eq!(walk.errors[0].property_path, "tags[2]");

        // a broken pattern is cached too, and still warns per value
        let broken = json!({"type": "array", "items": {"type": "string", "pattern": "("}});
        let mut walk = Walk::new(Limits::default());
        walk.field("tags", &json!(["a", "b"]), RawProp::of(&broken).unwrap(), "tags", 1);
        assert_eq!(walk.patterns.len(), 1);
        assert_eq!(walk.warnings.len(), 2);
    }

    #[test]
    fn invalid_pattern_is_a_warning() {
        let prop = json!({"type": "string", "pattern": "([unclosed"});
        let schema = schema_with("f", prop);
        let r = validate(&schema, &json!({"f": "anything"}));
        assert!(r.valid);
        assert_eq!(r.warning_codes(), vec![IssueCode::InvalidPattern]);
    }

    #[test]
    fn pattern_is_an_unanchored_search() {
        let prop = json!({"type": "string", "pattern": "[0-9]+"});
        assert!(errors_for(prop.clone(), json!("abc123")).is_empty());
        assert_eq!(errors_for(prop, json!("abc")), vec![IssueCode::Pattern]);
    }

    #[test]
    fn null_passes_type_but_not_enum() {
        assert!(errors_for(json!({"type": "string", "minLength": 3}), json!(null)).is_empty());
        assert_eq!(errors_for(json!({"type": "string", "enum": ["a"]}), json!(null)), vec![IssueCode::Enum]);
    }

    #[test]
    fn top_level_required_uses_the_boolean_flag() {
        let schema = json!({
            "type": "object",
            "required": ["listed"],
            "properties": {
                "required": ["listed"],
                "flagged": {"type": "string", "required": true},
                "listed": {"type": "string"}
            }
        });
        let r = validate(&schema, &json!({}));
        assert_eq!(r.error_codes(), vec![IssueCode::Required]);
        assert_eq!(r.errors[0].field, "flagged");
        assert_eq!(r.errors[0].message, "Required field 'flagged' is missing");
        assert_eq!(r.summary, "1 validation errors found");
    }

    #[test]
    fn nested_required_array_sweep() {
        let schema = schema_with(
            "contact",
            json!({"type": "object", "required": ["email"], "properties": {"email": {"type": "string"}}}),
        );
        let r = validate(&schema, &json!({"contact": {}}));
        assert_eq!(r.error_codes(), vec![IssueCode::Required]);
        assert_eq!(r.errors[0].field, "contact.email");
        assert_eq!(r.errors[0].property_path, "contact.email");
    }

    #[test]
    fn nested_required_fires_once_per_convention() {
        let schema = schema_with(
            "contact",
            json!({
                "type": "object",
                "required": ["email"],
                "properties": {"email": {"type": "string", "required": true}}
            }),
        );
        let r = validate(&schema, &json!({"contact": {}}));
        assert_eq!(r.error_codes(), vec![IssueCode::Required, IssueCode::Required]);
    }

    #[test]
    fn non_object_content_fails_at_root() {
        let schema = schema_with("f", json!({"type": "string"}));
        let r = validate(&schema, &json!(["not", "an", "object"]));
        assert!(!r.valid);
        assert_eq!(r.errors[0].field, "_root");
        assert_eq!(r.errors[0].value, Some(json!("array")));
        assert_eq!(r.summary, "Content type validation failed");
    }

    #[test]
    fn malformed_schema_never_panics() {
        let schema = json!({"type": "object", "properties": "garbage"});
        let r = validate(&schema, &json!({"a": 1}));
        assert!(r.valid);
        assert_eq!(r.warning_codes(), vec![IssueCode::AdditionalProperty]);

        let schema = json!({"properties": {"a": 7, "b": {"type": "array", "items": "nope"}}});
        assert!(validate(&schema, &json!({"a": 1, "b": [1, 2]})).valid);
    }

    #[test]
    fn depth_limit_demotes_to_warning() {
        let schema = schema_with(
            "a",
            json!({"type": "object", "properties": {"b": {"type": "object", "properties": {"c": {"type": "integer"}}}}}),
        );
        let content = json!({"a": {"b": {"c": "not an int"}}});
        assert_eq!(validate(&schema, &content).error_codes(), vec![IssueCode::InvalidType]);

        let shallow = ContentValidator::with_limits(&schema, Limits { max_depth: 2 }).validate(&content);
        assert!(shallow.valid);
        assert_eq!(shallow.warning_codes(), vec![IssueCode::DepthExceeded]);
        assert_eq!(shallow.warnings[0].property_path, "a.b.c");
    }

    #[test]
    fn single_field_validation() {
        let schema = schema_with("age", json!({"type": "integer", "minimum": 0}));
        let ok = validate_field(&schema, "age", &json!(3));
        assert!(ok.valid);
        assert_eq!(ok.summary, "Field validation passed");

        let bad = validate_field(&schema, "age", &json!(-1));
        assert_eq!(bad.error_codes(), vec![IssueCode::Minimum]);
        assert_eq!(bad.summary, "Field validation failed with 1 errors");

        let unknown = validate_field(&schema, "height", &json!(180));
        assert!(unknown.valid);
        assert_eq!(unknown.warning_codes(), vec![IssueCode::UnknownField]);
    }

    #[test]
    fn report_summarises_distinct_codes() {
        let schema = json!({"type": "object", "properties": {
            "a": {"type": "string", "minLength": 2},
            "b": {"type": "string", "minLength": 2},
            "c": {"type": "number"}
        }});
        let report = ContentValidator::new(&schema).report(&json!({"a": "x", "b": "y", "c": "z", "d": 1}));
        assert_eq!(report.error_summary.total_errors, 3);
        assert_eq!(report.error_summary.total_warnings, 1);
        assert_eq!(report.error_summary.error_codes, vec![IssueCode::MinLength, IssueCode::InvalidType]);
        assert_eq!(report.schema_info.properties_count, 3);
        assert_eq!(report.schema_info.schema_type.as_deref(), Some("object"));
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[test]
    fn issues_serialize_with_stable_codes() {
        let schema = schema_with("f", json!({"type": "boolean"}));
        let r = validate(&schema, &json!({"f": "yes", "g": 1}));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["errors"][0]["code"], "invalid_type");
        assert_eq!(v["warnings"][0]["code"], "additional_property");
        assert!(v["warnings"][0].get("value").is_none());
        assert_eq!(v["field_count"], 2);
    }
}
