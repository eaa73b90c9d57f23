//! Validation failures.

use dlhub_schema::{Dimension, Kind, SchemaError, Shape};
use thiserror::Error;

use crate::path::Path;

/// A value does not conform to its descriptor.
///
/// Every structural variant carries the [`Path`] of the offending value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The value is not an instance of the declared kind.
    #[error("type mismatch at {path}: expected type {expected}, received {actual}")]
    TypeMismatch {
        /// Location of the value.
        path: Path,
        /// Declared kind.
        expected: Kind,
        /// Name of the value's actual kind.
        actual: String,
    },

    /// A tuple has the wrong number of elements.
    #[error("arity mismatch at {path}: expected tuple of length {expected}, received length {actual}")]
    ArityMismatch {
        /// Location of the tuple.
        path: Path,
        /// Declared number of elements.
        expected: usize,
        /// Number of elements received.
        actual: usize,
    },

    /// An ndarray's rank or axis lengths disagree with the declared shape.
    #[error(
        "shape mismatch at {path}: expected ndarray.shape = {expected}, received shape {}",
        fixed_shape(.actual)
    )]
    ShapeMismatch {
        /// Location of the array.
        path: Path,
        /// Declared shape.
        expected: Shape,
        /// Axis lengths received.
        actual: Vec<usize>,
    },

    /// A declared dictionary key is absent.
    #[error("missing key at {path}: expected key {key:?} to be present")]
    MissingKey {
        /// Location of the dictionary.
        path: Path,
        /// The absent key.
        key: String,
    },

    /// A dictionary key is not declared.
    #[error("unexpected key at {path}: key {key:?} is not declared")]
    UnexpectedKey {
        /// Location of the dictionary.
        path: Path,
        /// The undeclared key.
        key: String,
    },

    /// The value nests deeper than the configured limit.
    #[error("value at {path} nests deeper than {limit} levels")]
    DepthExceeded {
        /// Location where the limit was crossed.
        path: Path,
        /// The configured limit.
        limit: usize,
    },

    /// The descriptor itself is malformed.
    #[error("invalid descriptor: {0}")]
    Schema(#[from] SchemaError),
}

impl ValidationError {
    /// Returns the location of the offending value, if the error has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ValidationError::TypeMismatch { path, .. }
            | ValidationError::ArityMismatch { path, .. }
            | ValidationError::ShapeMismatch { path, .. }
            | ValidationError::MissingKey { path, .. }
            | ValidationError::UnexpectedKey { path, .. }
            | ValidationError::DepthExceeded { path, .. } => Some(path),
            ValidationError::Schema(_) => None,
        }
    }
}

fn fixed_shape(actual: &[usize]) -> Shape {
    Shape::Dims(actual.iter().copied().map(Dimension::Fixed).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Frame;

    #[test]
    fn messages_name_the_location() {
        let err = ValidationError::TypeMismatch {
            path: Path::root().child(Frame::List(1)),
            expected: Kind::Integer,
            actual: "string".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch at list[1]: expected type integer, received string"
        );
    }

    #[test]
    fn shapes_render_as_tuples() {
        let err = ValidationError::ShapeMismatch {
            path: Path::root(),
            expected: Shape::Dims(vec![Dimension::Any, Dimension::Fixed(2)]),
            actual: vec![5, 3],
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch at <root>: expected ndarray.shape = (None, 2), received shape (5, 3)"
        );
    }

    #[test]
    fn schema_errors_have_no_path() {
        let err = ValidationError::from(SchemaError::UnknownKind("matrix".to_owned()));
        assert!(err.path().is_none());
    }
}
