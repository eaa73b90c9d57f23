//! Errors raised while authoring or parsing type descriptors.

use thiserror::Error;

use crate::kind::Kind;

/// A descriptor could not be built or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The `type` tag names a kind outside the fixed set.
    #[error("unknown type kind: {0:?}")]
    UnknownKind(String),

    /// A field the kind requires was omitted.
    #[error("{field} must be defined for {kind} descriptors")]
    MissingField {
        /// Kind of the descriptor being built.
        kind: Kind,
        /// Name of the omitted field.
        field: &'static str,
    },

    /// A kind-specific field was supplied for a kind that does not use it.
    #[error("{field} is not a valid field for {kind} descriptors")]
    UnexpectedField {
        /// Kind of the descriptor being built.
        kind: Kind,
        /// Name of the offending field.
        field: &'static str,
    },

    /// An extra field collides with a modeled field name.
    #[error("extra field {0:?} collides with a reserved descriptor field")]
    ReservedField(String),

    /// A field is present but its value is malformed.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Name of the malformed field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// A type hint could not be turned into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintError {
    /// The hint text is not well-formed.
    #[error("cannot parse type hint {input:?}: {reason}")]
    Parse {
        /// The offending hint text.
        input: String,
        /// What the parser expected.
        reason: String,
    },

    /// A subscripted generic other than `list`, `tuple` or `dict`.
    #[error("unknown parameterized type: {0}")]
    UnknownGeneric(String),

    /// A bare `list` or `tuple` without element types.
    #[error("provide the type(s) of elements for {0}")]
    MissingElementTypes(String),

    /// A parameter has no annotation.
    #[error("provide a type hint for the parameter: {0}")]
    MissingAnnotation(String),

    /// The return value has no annotation.
    #[error("provide a type hint for the return type")]
    MissingReturnAnnotation,

    /// The converted descriptor failed its own checks.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
