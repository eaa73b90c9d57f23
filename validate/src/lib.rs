//! Structural validation of runtime values against DLHub type descriptors.
//!
//! `dlhub-validate` answers one question before a servable method runs: does
//! this input have the structure the method declared? It recurses through
//! lists, tuples, dictionaries and n-dimensional arrays and reports the first
//! mismatch together with its location.
//!
//! ```
//! use dlhub_schema::{ArgumentType, TypeDescriptor};
//! use dlhub_validate::{validate, Value};
//!
//! let d = TypeDescriptor::list(ArgumentType::Integer.into());
//! let err = validate(&Value::List(vec![1.into(), "two".into()]), &d).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "type mismatch at list[1]: expected type integer, received string"
//! );
//! ```
//!
//! Inputs that arrive as JSON go through [`Value::lift`] (or
//! [`validate_json`]) so tuples, ndarrays and file paths are recovered from
//! the descriptor.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod error;
pub mod exemplar;
pub mod path;
pub mod preflight;
pub mod report;
pub mod validator;
pub mod value;

pub use error::ValidationError;
pub use exemplar::{exemplar, EXEMPLAR_ELEMENT_LIMIT};
pub use path::{Frame, Path};
pub use preflight::{preflight, PreflightError};
pub use report::{Finding, Severity, ValidationReport};
pub use validator::{
    validate, validate_json, Outcome, Validator, ValidatorOptions, Warning, DEFAULT_MAX_DEPTH,
};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
        assert_send_sync::<Value>();
        assert_send_sync::<ValidationError>();
    }
}
