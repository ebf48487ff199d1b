use thiserror::Error;

/// Failures the schema parser and its lookups can report.
///
/// Validation and form derivation never fail; everything they find is
/// returned as data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema has no top-level `properties` mapping")]
    MissingProperties,

    #[error("schema `properties` must be an object")]
    PropertiesNotObject,

    #[error("property `{path}` is nested deeper than the limit of {max_depth}")]
    TooDeep { path: String, max_depth: usize },

    #[error("field '{0}' not found in schema")]
    FieldNotFound(String),

    #[error("cannot navigate to '{0}': parent is not an object")]
    NotAnObject(String),
}
