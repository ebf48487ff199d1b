//! JSON-schema driven content tooling.
//!
//! Three pure transformations over an already-decoded schema:
//!
//! - [`parser`] turns a schema into a [`SchemaAnalysis`] (typed property tree,
//!   required/optional lists, documentation rules);
//! - [`validator`] checks a content instance and reports errors and warnings
//!   as data;
//! - [`form`] derives an ordered list of UI form fields.
pub mod config;
pub mod error;
pub mod form;
pub mod ir;
pub mod parser;
pub mod path_de;
pub mod raw;
pub mod validator;

pub use config::Limits;
pub use error::SchemaError;
pub use form::{DerivedForm, FormDeriver, FormField, UiType, derive_fields, derive_form};
pub use ir::{PropertyNode, SchemaAnalysis, SchemaType, ValidationRule};
pub use parser::{SchemaParser, parse_schema};
pub use validator::{ContentValidator, IssueCode, ValidationIssue, ValidationReport, ValidationResult, validate, validate_field};
