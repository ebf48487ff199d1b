//! CLI: analyze | validate | validate-field | form
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use json_schemaform::{ContentValidator, FormDeriver, Limits, SchemaParser, ValidationResult};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// analyze JSON schemas, validate content against them, and derive form fields
#[derive(Parser, Debug)]
#[command(name = "json-schemaform", version, about)]
pub struct CommandLineInterface {
    /// more logging; repeat for more (-v, -vv, -vvv). RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// engine limits as a JSON file (e.g. {"max_depth": 16})
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse a schema and print its analysis (property tree, rules, indexes)
    Analyze(AnalyzeOut),
    /// validate one or more content documents against a schema
    Validate(ValidateOut),
    /// validate a single top-level field value
    ValidateField(ValidateFieldOut),
    /// derive UI form fields from a schema
    Form(FormOut),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// schema .json file
    #[arg(long, short)]
    schema: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the instance in each document (e.g. /data/page)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct AnalyzeOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ValidateOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    #[command(flatten)]
    input_settings: InputSettings,

    /// emit full validation reports (JSON) instead of bare results
    #[arg(long)]
    report: bool,

    /// machine-readable JSON output
    #[arg(long)]
    json: bool,
}

#[derive(clap::Parser, Debug)]
struct ValidateFieldOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// top-level field name
    #[arg(long)]
    field: String,

    /// field value as JSON; anything that is not valid JSON is taken as a string
    #[arg(long)]
    value: String,

    /// machine-readable JSON output
    #[arg(long)]
    json: bool,
}

#[derive(clap::Parser, Debug)]
struct FormOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load(&self) -> anyhow::Result<Value> {
        read_json(&self.schema).context("failed to load schema")
    }
}

impl InputSettings {
    /// Every selected instance, labeled by source path.
    fn load_documents(&self) -> anyhow::Result<Vec<(String, Value)>> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut documents = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let json_value = read_json(&source_path)?;
            let json_value = match self.json_pointer.as_deref() {
                None => json_value,
                Some(pointer) => json_value
                    .pointer(pointer)
                    .cloned()
                    .with_context(|| format!("JSON pointer {pointer} selects nothing in {source_path_str}"))?,
            };
            documents.push((source_path_str, json_value));
        }
        tracing::info!(documents = documents.len(), "loaded inputs");
        Ok(documents)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns the process exit code: 0 when everything validated, 1 otherwise.
    pub fn run(&self) -> anyhow::Result<u8> {
        let limits = self.limits()?;
        match &self.cmd {
            Command::Analyze(target) => {
                let schema = target.schema_settings.load()?;
                let analysis = SchemaParser::with_limits(limits)
                    .parse(&schema)
                    .with_context(|| format!("failed to parse schema {}", target.schema_settings.schema.display()))?;
                write_output(target.out.as_deref(), &serde_json::to_string_pretty(&analysis)?)?;
                Ok(0)
            }
            Command::Validate(target) => {
                let schema = target.schema_settings.load()?;
                let documents = target.input_settings.load_documents()?;
                let validator = ContentValidator::with_limits(&schema, limits);

                if target.report {
                    let reports = documents
                        .par_iter()
                        .map(|(_, content)| validator.report(content))
                        .collect::<Vec<_>>();
                    let all_valid = reports.iter().all(|r| r.validation_result.valid);
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                    return Ok(exit_code(all_valid));
                }

                let results = documents
                    .par_iter()
                    .map(|(label, content)| (label.as_str(), validator.validate(content)))
                    .collect::<Vec<_>>();
                let all_valid = results.iter().all(|(_, r)| r.valid);

                if target.json {
                    let out = results
                        .iter()
                        .map(|(label, result)| serde_json::json!({"input": label, "result": result}))
                        .collect::<Vec<_>>();
                    println!("{}", serde_json::to_string_pretty(&out)?);
                } else {
                    for (label, result) in &results {
                        print_result(label, result);
                    }
                }
                Ok(exit_code(all_valid))
            }
            Command::ValidateField(target) => {
                let schema = target.schema_settings.load()?;
                let value = serde_json::from_str::<Value>(&target.value)
                    .unwrap_or_else(|_| Value::String(target.value.clone()));
                let result = ContentValidator::with_limits(&schema, limits).validate_field(&target.field, &value);
                if target.json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print_result(&target.field, &result);
                }
                Ok(exit_code(result.valid))
            }
            Command::Form(target) => {
                let schema = target.schema_settings.load()?;
                let form = FormDeriver::with_limits(limits).derive_form(&schema);
                write_output(target.out.as_deref(), &serde_json::to_string_pretty(&form)?)?;
                Ok(0)
            }
        }
    }

    fn limits(&self) -> anyhow::Result<Limits> {
        let Some(path) = self.config.as_ref() else {
            return Ok(Limits::default());
        };
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let limits = Limits::from_json_str(&source)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(max_depth = limits.max_depth, "loaded limits");
        Ok(limits)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn exit_code(all_valid: bool) -> u8 {
    if all_valid { 0 } else { 1 }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file {}", path.display()))?;
    serde_json::from_str::<Value>(&source)
        .with_context(|| format!("failed to parse JSON source file ({})", path.display()))
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        println!("{text}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
}

fn print_result(label: &str, result: &ValidationResult) {
    if result.valid {
        println!("{} {}: {}", "✔".green(), label.bold(), result.summary);
    } else {
        println!("{} {}: {}", "✘".red().bold(), label.bold(), result.summary.red());
    }
    for issue in &result.errors {
        println!("    {} [{}] {}: {}", "error".red(), issue.code, issue.property_path, issue.message);
    }
    for issue in &result.warnings {
        println!("    {} [{}] {}: {}", "warning".yellow(), issue.code, issue.property_path, issue.message);
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(out, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"));
    }

    #[test]
    fn parses_subcommands() {
        let cli = CommandLineInterface::try_parse_from([
            "json-schemaform", "-vv", "validate", "--schema", "s.json", "--input", "a.json", "b.json", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Command::Validate(v) => {
                assert_eq!(v.input_settings.input, vec!["a.json", "b.json"]);
                assert!(v.json && !v.report);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
