//! `dlhub-check`: checks input documents against a servable's declared input type.
//!
//! The descriptor file is either a bare type descriptor or published servable
//! metadata, in which case `--method` selects the input descriptor. Inputs are
//! JSON files; a directory is searched recursively for `*.json`.
//!
//! **Usage:**
//! ```text
//! dlhub-check --descriptor <file> [--method <name>] --input <file|dir> [--all] [--max-depth N] [--verbose]
//! dlhub-check --descriptor <file> [--method <name>] --example
//! ```
//!
//! Exits non-zero if any input fails validation.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use dlhub_schema::{Servable, TypeDescriptor, DEFAULT_METHOD};
use dlhub_validate::{
    exemplar, Finding, Severity, ValidationReport, Validator, ValidatorOptions, Value,
    DEFAULT_MAX_DEPTH, EXEMPLAR_ELEMENT_LIMIT,
};
use serde_json::Value as Json;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Check JSON inputs against a DLHub type descriptor.
#[derive(Parser)]
#[command(
    name = "dlhub-check",
    about = "Validate JSON inputs against a DLHub servable's input descriptor"
)]
struct Args {
    /// Descriptor file: a bare type descriptor or servable metadata.
    #[arg(long)]
    descriptor: PathBuf,

    /// Method whose input descriptor is used when the file is servable metadata.
    #[arg(long, default_value = DEFAULT_METHOD)]
    method: String,

    /// Input JSON file, or a directory searched for `*.json`.
    #[arg(long, required_unless_present = "example")]
    input: Option<PathBuf>,

    /// Report every violation instead of stopping at the first per input.
    #[arg(long)]
    all: bool,

    /// Deepest container nesting accepted.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print passing inputs and enable debug logging.
    #[arg(long, short)]
    verbose: bool,

    /// Print a conforming example input and exit.
    #[arg(long, conflicts_with = "input")]
    example: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let descriptor = load_descriptor(&args.descriptor, &args.method)?;

    if args.example {
        let value = exemplar(&descriptor).ok_or_else(|| {
            anyhow!(
                "Descriptor declares arrays with more than {EXEMPLAR_ELEMENT_LIMIT} elements; \
                 no example input can be built"
            )
        })?;
        let example = serde_json::to_string_pretty(&value.to_json())
            .context("Failed to render example input")?;
        println!("{example}");
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        bail!("--input is required unless --example is given");
    };
    let inputs = collect_inputs(input)?;
    if inputs.is_empty() {
        bail!("No JSON inputs found under {}", input.display());
    }

    let validator = Validator::with_options(
        ValidatorOptions::default()
            .with_max_depth(args.max_depth)
            .with_fail_fast(!args.all),
    );

    let mut tally = Tally::default();

    for path in &inputs {
        let report = check_file(&validator, &descriptor, path);
        tally.record(&report);
        for finding in &report.results {
            if finding.severity == Severity::Pass && !args.verbose {
                continue;
            }
            println!("{} ({})", finding, path.display());
        }
    }

    println!();
    println!("{tally}");

    if !tally.succeeded() {
        eprintln!("Validation FAILED: {} input(s) did not conform.", tally.failed);
        process::exit(1);
    }
    Ok(())
}

/// Per-input outcome counts for the summary line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    passed: usize,
    warned: usize,
    failed: usize,
}

impl Tally {
    /// Counts one input by its worst finding.
    fn record(&mut self, report: &ValidationReport) {
        if report.failure_count() > 0 {
            self.failed += 1;
        } else if report.warning_count() > 0 {
            self.warned += 1;
        } else {
            self.passed += 1;
        }
    }

    fn succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Summary: {} inputs, {} passed, {} with warnings, {} failed",
            self.passed + self.warned + self.failed,
            self.passed,
            self.warned,
            self.failed
        )
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the input descriptor from a bare descriptor or servable metadata.
fn load_descriptor(path: &Path, method: &str) -> Result<TypeDescriptor> {
    let json = read_json(path)?;
    parse_descriptor(&json, method)
        .with_context(|| format!("Invalid descriptor in {}", path.display()))
}

fn parse_descriptor(json: &Json, method: &str) -> Result<TypeDescriptor> {
    if json.get("type").is_some_and(Json::is_string) {
        return Ok(TypeDescriptor::from_json(json)?);
    }
    let servable = Servable::from_document(json)?;
    let signature = servable.method(method).ok_or_else(|| {
        let known: Vec<&str> = servable.methods.keys().map(String::as_str).collect();
        anyhow!("No method named {method:?} (available: {})", known.join(", "))
    })?;
    Ok(signature.input.clone())
}

fn read_json(path: &Path) -> Result<Json> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

/// Lists input files: the path itself, or every `*.json` below a directory
/// in sorted order.
fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut inputs = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            inputs.push(entry.into_path());
        }
    }
    Ok(inputs)
}

/// Validates one input file. Unreadable files are reported as failures.
fn check_file(validator: &Validator, descriptor: &TypeDescriptor, path: &Path) -> ValidationReport {
    match read_json(path) {
        Ok(json) => validator.report(&Value::lift(&json, descriptor), descriptor),
        Err(e) => {
            tracing::debug!(path = %path.display(), "input unreadable");
            let mut report = ValidationReport::new();
            report.push(Finding {
                path: dlhub_validate::Path::root(),
                message: format!("{e:#}"),
                severity: Severity::Failure,
                error: None,
            });
            report
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use dlhub_schema::Kind;
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_descriptor_is_read_directly() {
        let d = parse_descriptor(&json!({"type": "list", "item_type": "integer"}), "run").unwrap();
        assert_eq!(d.kind(), Kind::List);
    }

    #[test]
    fn servable_metadata_selects_the_method() {
        let doc = json!({"servable": {"methods": {
            "run": {"input": {"type": "string"}, "output": {"type": "integer"}},
            "train": {"input": {"type": "dict", "properties": {}}, "output": {"type": "boolean"}}
        }}});
        assert_eq!(parse_descriptor(&doc, "run").unwrap().kind(), Kind::String);
        assert_eq!(parse_descriptor(&doc, "train").unwrap().kind(), Kind::Dict);
        let err = parse_descriptor(&doc, "predict").unwrap_err();
        assert!(err.to_string().contains("run, train"));
    }

    // ---------------------------------------------------------------
    // Input discovery and per-file checks
    // ---------------------------------------------------------------

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    fn integers() -> TypeDescriptor {
        TypeDescriptor::from_json(&json!({"type": "list", "item_type": "integer"})).unwrap()
    }

    #[test]
    fn directories_yield_sorted_json_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let b = write(dir.path(), "b.json", "[1]");
        let a = write(dir.path(), "a.json", "[2]");
        let c = write(dir.path(), "nested/c.json", "[3]");
        write(dir.path(), "notes.txt", "not an input");
        write(dir.path(), "nested/data.jsonl", "[4]");

        let inputs = collect_inputs(dir.path()).unwrap();
        assert_eq!(inputs, vec![a, b, c]);
    }

    #[test]
    fn a_file_path_is_its_own_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "input.txt", "[1]");
        assert_eq!(collect_inputs(&file).unwrap(), vec![file]);
    }

    #[test]
    fn empty_directory_has_no_inputs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_inputs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn unreadable_inputs_fail() {
        let dir = tempfile::tempdir().unwrap();
        let validator = Validator::new();
        let d = integers();

        let missing = check_file(&validator, &d, &dir.path().join("missing.json"));
        assert_eq!(missing.failure_count(), 1);
        assert!(missing.results[0].message.contains("Failed to read"));

        let garbled = write(dir.path(), "garbled.json", "[1, ");
        let report = check_file(&validator, &d, &garbled);
        assert_eq!(report.failure_count(), 1);
        assert!(report.results[0].message.contains("Failed to parse JSON"));
    }

    #[test]
    fn conforming_and_failing_inputs_are_tallied() {
        let dir = tempfile::tempdir().unwrap();
        let validator = Validator::new();
        let d = integers();
        let good = write(dir.path(), "good.json", "[1, 2, 3]");
        let bad = write(dir.path(), "bad.json", r#"[1, "two", 3]"#);

        let mut tally = Tally::default();
        let report = check_file(&validator, &d, &good);
        assert!(report.all_passed());
        tally.record(&report);
        assert!(tally.succeeded());

        let report = check_file(&validator, &d, &bad);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.results[0].path.to_string(), "list[1]");
        tally.record(&report);

        assert!(!tally.succeeded());
        assert_eq!(tally, Tally { passed: 1, warned: 0, failed: 1 });
        assert_eq!(
            tally.to_string(),
            "Summary: 2 inputs, 1 passed, 0 with warnings, 1 failed"
        );
    }

    #[test]
    fn warnings_alone_do_not_fail_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "flags.json", "[1, true]");
        let report = check_file(&Validator::new(), &integers(), &input);
        assert_eq!(report.warning_count(), 1);

        let mut tally = Tally::default();
        tally.record(&report);
        assert_eq!(tally.warned, 1);
        assert!(tally.succeeded());
    }
}
