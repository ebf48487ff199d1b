//! Replays `fixtures/*.json` through the library and reports pass/fail.
//!
//! Each fixture file holds one schema and a list of content cases:
//!
//! ```json
//! {
//!   "schema": { "properties": { ... } },
//!   "cases": [
//!     { "name": "...", "content": { ... }, "expect": { "valid": false, "errors": ["min_length"] } }
//!   ],
//!   "form": [ { "name": "tags", "uiType": "multiselect" } ]
//! }
//! ```
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use json_schemaform::path_de;
use json_schemaform::{ContentValidator, FormDeriver, ValidationResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    #[serde(default)]
    description: Option<String>,
    schema: Value,
    #[serde(default)]
    cases: Vec<Case>,
    #[serde(default)]
    form: Vec<ExpectedField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    name: String,
    content: Value,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Expect {
    valid: bool,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

/// Checked in order against the derived field list; extra derived fields
/// are ignored.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpectedField {
    name: String,
    #[serde(rename = "uiType")]
    ui_type: String,
    #[serde(default)]
    options: Option<Vec<String>>,
}

#[derive(Default)]
struct Tally {
    passed: usize,
    failed: usize,
}

impl Tally {
    fn record(&mut self, label: &str, failure: Option<String>) {
        match failure {
            None => {
                self.passed += 1;
                eprintln!("✅ {label}");
            }
            Some(why) => {
                self.failed += 1;
                eprintln!("❌ {} → {}", label.bold(), why.red());
            }
        }
    }
}

fn main() -> ExitCode {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures"));

    match run(&dir) {
        Ok(tally) => {
            eprintln!("—— {} passed, {} failed ——", tally.passed, tally.failed);
            if tally.failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(dir: &Path) -> anyhow::Result<Tally> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read fixture directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    let mut tally = Tally::default();
    for path in paths {
        let fixture = load_fixture(&path)?;
        let file_label = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        match fixture.description.as_deref() {
            Some(description) => eprintln!("—— {file_label}: {description} ——"),
            None => eprintln!("—— {file_label} ——"),
        }

        let validator = ContentValidator::new(&fixture.schema);
        for case in &fixture.cases {
            let result = validator.validate(&case.content);
            tally.record(&format!("{file_label} / {}", case.name), check_case(&case.expect, &result));
        }

        if !fixture.form.is_empty() {
            let fields = FormDeriver::new().derive(&fixture.schema);
            let failure = fixture.form.iter().enumerate().find_map(|(ix, expected)| {
                let Some(actual) = fields.get(ix) else {
                    return Some(format!("missing field #{ix} ({})", expected.name));
                };
                if actual.name != expected.name || actual.ui_type.as_str() != expected.ui_type {
                    return Some(format!(
                        "field #{ix}: expected {} as {}, got {} as {}",
                        expected.name, expected.ui_type, actual.name, actual.ui_type
                    ));
                }
                match &expected.options {
                    Some(options) if actual.options.as_ref() != Some(options) => {
                        Some(format!("field {}: options {:?} != {options:?}", actual.name, actual.options))
                    }
                    _ => None,
                }
            });
            tally.record(&format!("{file_label} / form"), failure);
        }
    }
    Ok(tally)
}

fn load_fixture(path: &Path) -> anyhow::Result<Fixture> {
    let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    path_de::from_str_with_path::<Fixture>(&source).with_context(|| format!("malformed fixture {}", path.display()))
}

fn check_case(expect: &Expect, result: &ValidationResult) -> Option<String> {
    let errors = result.errors.iter().map(|e| e.code.as_str()).collect::<Vec<_>>();
    let warnings = result.warnings.iter().map(|w| w.code.as_str()).collect::<Vec<_>>();
    if result.valid != expect.valid {
        return Some(format!("valid = {}, expected {} ({errors:?})", result.valid, expect.valid));
    }
    if errors != expect.errors {
        return Some(format!("errors {errors:?} != {:?}", expect.errors));
    }
    if warnings != expect.warnings {
        return Some(format!("warnings {warnings:?} != {:?}", expect.warnings));
    }
    None
}
