// Strongly-typed schema model. Built fresh by the parser on every call and
// never mutated afterwards.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed metadata for one schema property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyNode {
    pub name: String,
    /// Dot-joined ancestor names, e.g. `sections.contact.email`.
    pub path: String,
    /// Listed in the nearest enclosing `required` name list.
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Value>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_: Option<Vec<Value>>,
    /// Length/range keywords the declared type does not own.
    #[serde(skip_serializing_if = "StrayBounds::is_empty")]
    pub stray: StrayBounds,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Per-type constraint payload. Only arrays own `items`, only objects own
/// `properties`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    String(StringC),
    Number(NumC),
    Integer(NumC),
    Boolean,
    Array(ArrC),
    Object(ObjC),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StringC {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

/// `minLength` on an array, `minimum` on a string and so on. Kept so the
/// analysis documents every constraint the validator may still act on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrayBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl StrayBounds {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumC {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArrC {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    pub unique_items: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertyNode>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjC {
    pub properties: IndexMap<String, PropertyNode>, // declaration order
    pub additional_properties: bool,
}

impl Default for ObjC {
    fn default() -> Self {
        Self { properties: IndexMap::new(), additional_properties: true }
    }
}

impl NodeKind {
    pub fn schema_type(&self) -> SchemaType {
        match self {
            NodeKind::String(_) => SchemaType::String,
            NodeKind::Number(_) => SchemaType::Number,
            NodeKind::Integer(_) => SchemaType::Integer,
            NodeKind::Boolean => SchemaType::Boolean,
            NodeKind::Array(_) => SchemaType::Array,
            NodeKind::Object(_) => SchemaType::Object,
        }
    }
}

impl PropertyNode {
    pub fn schema_type(&self) -> SchemaType {
        self.kind.schema_type()
    }

    /// Child properties when this node is an object.
    pub fn properties(&self) -> Option<&IndexMap<String, PropertyNode>> {
        match &self.kind {
            NodeKind::Object(obj) => Some(&obj.properties),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&PropertyNode> {
        match &self.kind {
            NodeKind::Array(arr) => arr.items.as_deref(),
            _ => None,
        }
    }

    /// Declared `minLength`, whichever payload holds it.
    pub fn min_length(&self) -> Option<u64> {
        match &self.kind {
            NodeKind::String(s) => s.min_length,
            _ => self.stray.min_length,
        }
    }

    pub fn max_length(&self) -> Option<u64> {
        match &self.kind {
            NodeKind::String(s) => s.max_length,
            _ => self.stray.max_length,
        }
    }

    pub fn minimum(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Number(c) | NodeKind::Integer(c) => c.minimum,
            _ => self.stray.minimum,
        }
    }

    pub fn maximum(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Number(c) | NodeKind::Integer(c) => c.maximum,
            _ => self.stray.maximum,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ANALYSIS
// ————————————————————————————————————————————————————————————————————————————

/// Which constraint a [`ValidationRule`] documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    Pattern,
    Format,
    Enum,
    Type,
}

/// One documented constraint on one property. Informational only; the
/// validator enforces constraints on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub value: Value,
    pub message: String,
    pub property_path: String,
}

/// Aggregate view over the top-level properties of a parsed schema.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaAnalysis {
    pub total_properties: usize,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub property_types: IndexMap<String, SchemaType>,
    pub validation_rules: Vec<ValidationRule>,
    pub nested_objects: Vec<String>,
    pub arrays: Vec<String>,
    pub enum_fields: IndexMap<String, Vec<Value>>,
    pub formatted_fields: IndexMap<String, String>,
    pub properties: IndexMap<String, PropertyNode>,
}
