//! The structural validator.
//!
//! Walks a [`Value`] and a [`TypeDescriptor`] together in depth-first
//! pre-order using an explicit work stack. Each pending item owns the path
//! to its value, so the first violation is reported with its full location.

use std::fmt;
use std::ops::ControlFlow;

use dlhub_schema::{ArgumentType, Kind, TypeDescriptor};
use ndarray::Dimension as _;
use serde_json::Value as Json;

use crate::error::ValidationError;
use crate::path::{Frame, Path};
use crate::report::{Finding, ValidationReport};
use crate::value::Value;

/// Default bound on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Validator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Deepest container nesting accepted before [`ValidationError::DepthExceeded`].
    pub max_depth: usize,
    /// Stop a [`Validator::report`] at its first failure.
    pub fail_fast: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            fail_fast: false,
        }
    }
}

impl ValidatorOptions {
    /// Sets the nesting bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether reports stop at the first failure.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// A boolean accepted where an integer or number was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Location of the boolean.
    pub path: Path,
    /// The numeric kind it was accepted as.
    pub expected: Kind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "boolean input at {} has been validated as type {}; this is likely unintended",
            self.path, self.expected
        )
    }
}

/// Result of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Non-fatal findings, in traversal order.
    pub warnings: Vec<Warning>,
}

/// Checks values against descriptors.
///
/// A validator holds only its options, so one instance can be shared
/// between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    /// Creates a validator with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with the given options.
    #[must_use]
    pub fn with_options(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Checks `value` against `descriptor` and stops at the first violation.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in depth-first pre-order.
    pub fn validate(
        &self,
        value: &Value,
        descriptor: &TypeDescriptor,
    ) -> Result<Outcome, ValidationError> {
        self.validate_at(value, descriptor, Path::root())
    }

    /// Like [`Validator::validate`], with locations reported relative to
    /// `path` instead of the root. Frames in `path` count toward `max_depth`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in depth-first pre-order.
    pub fn validate_at(
        &self,
        value: &Value,
        descriptor: &TypeDescriptor,
        path: Path,
    ) -> Result<Outcome, ValidationError> {
        tracing::debug!(kind = %descriptor.kind(), %path, "validating value");
        let mut sink = FirstError::default();
        self.walk(value, descriptor, path, &mut sink);
        if let Some(err) = sink.error {
            tracing::debug!(error = %err, "validation failed");
            return Err(err);
        }
        log_warnings(&sink.warnings);
        Ok(Outcome {
            warnings: sink.warnings,
        })
    }

    /// Parses `descriptor` from its JSON form, lifts `value` with it and
    /// validates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Schema`] if the descriptor is malformed,
    /// otherwise the first structural violation.
    pub fn validate_json(&self, value: &Json, descriptor: &Json) -> Result<Outcome, ValidationError> {
        let descriptor = TypeDescriptor::from_json(descriptor)?;
        self.validate(&Value::lift(value, &descriptor), &descriptor)
    }

    /// Checks `value` against `descriptor` and gathers every violation and
    /// warning.
    ///
    /// With `fail_fast` set the report ends at the first failure. A report
    /// with no failures carries one passing finding for the root.
    #[must_use]
    pub fn report(&self, value: &Value, descriptor: &TypeDescriptor) -> ValidationReport {
        let mut sink = Collect {
            report: ValidationReport::new(),
            fail_fast: self.options.fail_fast,
        };
        self.walk(value, descriptor, Path::root(), &mut sink);
        let mut report = sink.report;
        if report.all_passed() {
            report.push(Finding::pass(
                Path::root(),
                format!("value conforms to {} descriptor", descriptor.kind()),
            ));
        }
        report
    }

    fn walk<S: Sink>(&self, value: &Value, descriptor: &TypeDescriptor, path: Path, sink: &mut S) {
        let mut stack = vec![Task {
            value,
            descriptor,
            path,
        }];
        let mut children = Vec::new();
        while let Some(task) = stack.pop() {
            if task.path.depth() > self.options.max_depth {
                let err = ValidationError::DepthExceeded {
                    path: task.path,
                    limit: self.options.max_depth,
                };
                if sink.fail(err).is_break() {
                    return;
                }
                continue;
            }
            if visit(task, &mut children, sink).is_break() {
                return;
            }
            stack.extend(children.drain(..).rev());
        }
    }
}

/// Checks `value` against `descriptor` with default options.
///
/// # Errors
///
/// Returns the first [`ValidationError`] in depth-first pre-order.
pub fn validate(value: &Value, descriptor: &TypeDescriptor) -> Result<Outcome, ValidationError> {
    Validator::new().validate(value, descriptor)
}

/// Validates JSON input against a JSON descriptor with default options.
///
/// # Errors
///
/// See [`Validator::validate_json`].
pub fn validate_json(value: &Json, descriptor: &Json) -> Result<Outcome, ValidationError> {
    Validator::new().validate_json(value, descriptor)
}

fn log_warnings(warnings: &[Warning]) {
    if let Some(first) = warnings.first() {
        tracing::warn!(
            count = warnings.len(),
            path = %first.path,
            "boolean input validated as {}; this is likely unintended",
            first.expected
        );
    }
}

struct Task<'v, 'd> {
    value: &'v Value,
    descriptor: &'d TypeDescriptor,
    path: Path,
}

trait Sink {
    fn fail(&mut self, err: ValidationError) -> ControlFlow<()>;
    fn warn(&mut self, warning: Warning);
}

#[derive(Default)]
struct FirstError {
    error: Option<ValidationError>,
    warnings: Vec<Warning>,
}

impl Sink for FirstError {
    fn fail(&mut self, err: ValidationError) -> ControlFlow<()> {
        self.error = Some(err);
        ControlFlow::Break(())
    }

    fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

struct Collect {
    report: ValidationReport,
    fail_fast: bool,
}

impl Sink for Collect {
    fn fail(&mut self, err: ValidationError) -> ControlFlow<()> {
        self.report.push(Finding::from_error(err));
        if self.fail_fast {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn warn(&mut self, warning: Warning) {
        self.report.push(Finding::warn(warning.path.clone(), warning.to_string()));
    }
}

/// Checks one value and queues its children in pre-order.
///
/// A value that fails its own check contributes no children.
fn visit<'v, 'd, S: Sink>(
    task: Task<'v, 'd>,
    children: &mut Vec<Task<'v, 'd>>,
    sink: &mut S,
) -> ControlFlow<()> {
    let Task {
        value,
        descriptor,
        path,
    } = task;
    let kind = descriptor.kind();
    if !value.is_instance_of(kind) {
        return sink.fail(ValidationError::TypeMismatch {
            path,
            expected: kind,
            actual: value.kind_name().to_owned(),
        });
    }

    match (&descriptor.ty, value) {
        (ArgumentType::Integer | ArgumentType::Number, Value::Bool(_)) => {
            sink.warn(Warning {
                path,
                expected: kind,
            });
        }
        (ArgumentType::List { item_type }, Value::List(items)) => {
            children.extend(items.iter().enumerate().map(|(i, item)| Task {
                value: item,
                descriptor: item_type,
                path: path.child(Frame::List(i)),
            }));
        }
        (ArgumentType::Tuple { element_types }, Value::Tuple(items)) => {
            if items.len() != element_types.len() {
                return sink.fail(ValidationError::ArityMismatch {
                    path,
                    expected: element_types.len(),
                    actual: items.len(),
                });
            }
            children.extend(items.iter().zip(element_types).enumerate().map(
                |(i, (item, element))| Task {
                    value: item,
                    descriptor: element,
                    path: path.child(Frame::Tuple(i)),
                },
            ));
        }
        (ArgumentType::Dict { properties }, Value::Dict(entries)) => {
            if properties.is_empty() {
                return ControlFlow::Continue(());
            }
            for key in entries.keys().filter(|k| !properties.contains_key(*k)) {
                sink.fail(ValidationError::UnexpectedKey {
                    path: path.clone(),
                    key: key.clone(),
                })?;
            }
            for key in properties.keys().filter(|k| !entries.contains_key(*k)) {
                sink.fail(ValidationError::MissingKey {
                    path: path.clone(),
                    key: key.clone(),
                })?;
            }
            children.extend(properties.iter().filter_map(|(key, property)| {
                entries.get(key).map(|item| Task {
                    value: item,
                    descriptor: property,
                    path: path.child(Frame::Dict(key.clone())),
                })
            }));
        }
        (ArgumentType::NdArray { shape, item_type }, Value::Array(array)) => {
            if !shape.admits(array.shape()) {
                return sink.fail(ValidationError::ShapeMismatch {
                    path,
                    expected: shape.clone(),
                    actual: array.shape().to_vec(),
                });
            }
            if let Some(item_type) = item_type {
                children.extend(array.indexed_iter().map(|(index, item)| Task {
                    value: item,
                    descriptor: item_type,
                    path: path.child(Frame::Array(index.slice().to_vec())),
                }));
            }
        }
        _ => {}
    }
    ControlFlow::Continue(())
}
