//! Schema parser: raw schema → [`PropertyNode`] tree + [`SchemaAnalysis`].
//!
//! Parsing is tolerant. A property entry that is not an object is skipped
//! (logged at debug) instead of failing the whole schema; the only hard
//! failures are a missing top-level `properties` mapping and nesting past
//! the configured depth limit.
//!
//! Required-ness comes from a sibling `required` name list inside the mapping
//! being walked. For the root that means a `required` key *inside*
//! `properties`; a `required` array next to `properties` at the schema root
//! is not consulted. Nested objects read their own `required` array.
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::config::Limits;
use crate::error::SchemaError;
use crate::ir::{
    ArrC, NodeKind, NumC, ObjC, PropertyNode, RuleKind, SchemaAnalysis, SchemaType, StrayBounds,
    StringC, ValidationRule,
};
use crate::raw::{RawProp, join_path, string_list};

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaParser {
    limits: Limits,
}

impl SchemaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn parse(&self, schema: &Value) -> Result<SchemaAnalysis, SchemaError> {
        let props = root_properties(schema)?;
        let required = string_list(props.get("required"));

        let mut analysis = SchemaAnalysis::default();
        for (name, raw) in props {
            let Some(prop) = RawProp::of(raw) else {
                debug!(property = %name, "skipping non-object property entry");
                continue;
            };
            let node = self.parse_node(name, prop, "", &required, 1)?;

            analysis.total_properties += 1;
            if node.required {
                analysis.required_fields.push(name.clone());
            } else {
                analysis.optional_fields.push(name.clone());
            }
            analysis.property_types.insert(name.clone(), node.schema_type());
            match node.schema_type() {
                SchemaType::Object => analysis.nested_objects.push(name.clone()),
                SchemaType::Array => analysis.arrays.push(name.clone()),
                _ => {}
            }
            if let Some(values) = node.enum_.as_ref().filter(|xs| !xs.is_empty()) {
                analysis.enum_fields.insert(name.clone(), values.clone());
            }
            if let Some(format) = &node.format {
                analysis.formatted_fields.insert(name.clone(), format.clone());
            }

            collect_rules(&node, &mut analysis.validation_rules);
            analysis.properties.insert(name.clone(), node);
        }

        debug!(
            properties = analysis.total_properties,
            rules = analysis.validation_rules.len(),
            "parsed schema"
        );
        Ok(analysis)
    }

    fn parse_node(
        &self,
        name: &str,
        prop: RawProp<'_>,
        parent: &str,
        required: &[String],
        depth: usize,
    ) -> Result<PropertyNode, SchemaError> {
        let path = join_path(parent, name);
        if self.limits.exceeded(depth) {
            return Err(SchemaError::TooDeep { path, max_depth: self.limits.max_depth });
        }

        let ty = match prop.type_name() {
            None => SchemaType::String,
            Some(t) => SchemaType::from_name(t).unwrap_or_else(|| {
                debug!(property = %path, declared = t, "unknown type, treating as string");
                SchemaType::String
            }),
        };

        let kind = match ty {
            SchemaType::String => NodeKind::String(StringC {
                min_length: prop.count("minLength"),
                max_length: prop.count("maxLength"),
            }),
            SchemaType::Number => NodeKind::Number(read_num(prop)),
            SchemaType::Integer => NodeKind::Integer(read_num(prop)),
            SchemaType::Boolean => NodeKind::Boolean,
            SchemaType::Array => {
                // `items` never inherits a required list.
                let items = match prop.object("items") {
                    Some(items) => {
                        Some(Box::new(self.parse_node("items", RawProp(items), &path, &[], depth + 1)?))
                    }
                    None => None,
                };
                NodeKind::Array(ArrC {
                    min_items: prop.count("minItems"),
                    max_items: prop.count("maxItems"),
                    unique_items: prop.flag("uniqueItems").unwrap_or(false),
                    items,
                })
            }
            SchemaType::Object => {
                let mut obj = ObjC::default();
                if let Some(children) = prop.object("properties") {
                    let own_required = prop.required_names();
                    for (child_name, raw) in children {
                        let Some(child) = RawProp::of(raw) else {
                            debug!(parent = %path, property = %child_name, "skipping non-object property entry");
                            continue;
                        };
                        let node = self.parse_node(child_name, child, &path, &own_required, depth + 1)?;
                        obj.properties.insert(child_name.clone(), node);
                    }
                }
                if let Some(allowed) = prop.flag("additionalProperties") {
                    obj.additional_properties = allowed;
                }
                NodeKind::Object(obj)
            }
        };

        let owns_length = ty == SchemaType::String;
        let owns_range = matches!(ty, SchemaType::Number | SchemaType::Integer);
        let stray = StrayBounds {
            min_length: prop.count("minLength").filter(|_| !owns_length),
            max_length: prop.count("maxLength").filter(|_| !owns_length),
            minimum: prop.num("minimum").filter(|_| !owns_range),
            maximum: prop.num("maximum").filter(|_| !owns_range),
        };

        Ok(PropertyNode {
            name: name.to_owned(),
            required: required.iter().any(|r| r == name),
            title: prop.str("title").map(str::to_owned),
            description: prop.str("description").map(str::to_owned),
            format: prop.non_empty_str("format").map(str::to_owned),
            pattern: prop.non_empty_str("pattern").map(str::to_owned),
            default: prop.get("default").cloned(),
            examples: prop.list("examples").cloned(),
            enum_: prop.list("enum").cloned(),
            path,
            stray,
            kind,
        })
    }
}

/// Parse with default limits.
pub fn parse_schema(schema: &Value) -> Result<SchemaAnalysis, SchemaError> {
    SchemaParser::new().parse(schema)
}

fn root_properties(schema: &Value) -> Result<&Map<String, Value>, SchemaError> {
    match schema.get("properties") {
        None => Err(SchemaError::MissingProperties),
        Some(Value::Object(props)) => Ok(props),
        Some(_) => Err(SchemaError::PropertiesNotObject),
    }
}

fn read_num(prop: RawProp<'_>) -> NumC {
    NumC {
        minimum: prop.num("minimum"),
        maximum: prop.num("maximum"),
        exclusive_minimum: prop.num("exclusiveMinimum"),
        exclusive_maximum: prop.num("exclusiveMaximum"),
        multiple_of: prop.num("multipleOf"),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RULES
// ————————————————————————————————————————————————————————————————————————————

/// Append the rules documenting `node`, then those of its children.
fn collect_rules(node: &PropertyNode, out: &mut Vec<ValidationRule>) {
    let name = node.name.as_str();
    let mut push = |kind: RuleKind, value: Value, message: String| {
        out.push(ValidationRule { kind, value, message, property_path: node.path.clone() });
    };

    if node.required {
        push(RuleKind::Required, json!(true), format!("Field '{name}' is required"));
    }
    if let Some(n) = node.min_length() {
        push(RuleKind::MinLength, json!(n), format!("Field '{name}' must be at least {n} characters"));
    }
    if let Some(n) = node.max_length() {
        push(RuleKind::MaxLength, json!(n), format!("Field '{name}' must be at most {n} characters"));
    }
    if let Some(n) = node.minimum() {
        push(RuleKind::Minimum, json!(n), format!("Field '{name}' must be at least {n:.2}"));
    }
    if let Some(n) = node.maximum() {
        push(RuleKind::Maximum, json!(n), format!("Field '{name}' must be at most {n:.2}"));
    }
    if let Some(p) = &node.pattern {
        push(RuleKind::Pattern, json!(p), format!("Field '{name}' must match the required pattern"));
    }
    if let Some(format) = &node.format {
        push(RuleKind::Format, json!(format), format!("Field '{name}' must be a valid {format}"));
    }
    if let Some(values) = node.enum_.as_ref().filter(|xs| !xs.is_empty()) {
        push(
            RuleKind::Enum,
            Value::Array(values.clone()),
            format!("Field '{name}' must be one of the allowed values"),
        );
    }
    let ty = node.schema_type();
    push(RuleKind::Type, json!(ty.as_str()), format!("Field '{name}' must be of type {ty}"));

    match &node.kind {
        NodeKind::Object(obj) => {
            for child in obj.properties.values() {
                collect_rules(child, out);
            }
        }
        NodeKind::Array(ArrC { items: Some(items), .. }) => collect_rules(items, out),
        _ => {}
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOOKUPS
// ————————————————————————————————————————————————————————————————————————————

impl SchemaAnalysis {
    /// Metadata for a top-level field.
    pub fn field(&self, name: &str) -> Result<&PropertyNode, SchemaError> {
        self.properties
            .get(name)
            .ok_or_else(|| SchemaError::FieldNotFound(name.to_owned()))
    }

    /// Metadata for a dotted path such as `contact.address.city`.
    pub fn nested_field(&self, path: &str) -> Result<&PropertyNode, SchemaError> {
        let parts: Vec<&str> = path.split('.').collect();
        let mut current = self.field(parts[0])?;
        for i in 1..parts.len() {
            let walked = parts[..=i].join(".");
            let children = current.properties().ok_or_else(|| SchemaError::NotAnObject(walked.clone()))?;
            current = children.get(parts[i]).ok_or(SchemaError::FieldNotFound(walked))?;
        }
        Ok(current)
    }

    /// Rules attached to `name` or to anything nested below it.
    pub fn rules_for_field(&self, name: &str) -> Vec<&ValidationRule> {
        let prefix = format!("{name}.");
        self.validation_rules
            .iter()
            .filter(|r| r.property_path == name || r.property_path.starts_with(&prefix))
            .collect()
    }
}

// ------------------------------- Tests ------------------------------------ //
