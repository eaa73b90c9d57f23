//! Collect-all validation reports: findings, severity levels and counts.

use std::fmt;

use crate::error::ValidationError;
use crate::path::Path;

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value conforms.
    Pass,
    /// Accepted, but likely unintended.
    Warning,
    /// The value does not conform.
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        })
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Location the finding refers to.
    pub path: Path,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the finding.
    pub severity: Severity,
    /// The underlying error, for failures.
    pub error: Option<ValidationError>,
}

impl Finding {
    /// Creates a passing finding.
    pub fn pass(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            severity: Severity::Pass,
            error: None,
        }
    }

    /// Creates a warning finding.
    pub fn warn(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            severity: Severity::Warning,
            error: None,
        }
    }

    /// Creates a failure finding from a validation error.
    pub fn from_error(error: ValidationError) -> Self {
        Self {
            path: error.path().cloned().unwrap_or_default(),
            message: error.to_string(),
            severity: Severity::Failure,
            error: Some(error),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Every finding from one validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Findings in traversal order.
    pub results: Vec<Finding>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finding.
    pub fn push(&mut self, finding: Finding) {
        self.results.push(finding);
    }

    /// Returns the count of failures.
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Returns the count of warnings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns true if nothing failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }
}
