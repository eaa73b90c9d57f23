//! Input checks run before a servable method is invoked.

use dlhub_schema::Servable;
use thiserror::Error;

use crate::error::ValidationError;
use crate::validator::{Outcome, Validator};
use crate::value::Value;

/// A pre-flight check rejected a call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreflightError {
    /// The servable exposes no method with this name.
    #[error("servable has no method named {0:?}")]
    UnknownMethod(String),

    /// The inputs do not conform to the method's input descriptor.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl Validator {
    /// Validates `inputs` against the input descriptor of `method`.
    ///
    /// # Errors
    ///
    /// Returns [`PreflightError::UnknownMethod`] if the servable has no such
    /// method, otherwise [`PreflightError::Invalid`] on the first violation.
    pub fn preflight(
        &self,
        servable: &Servable,
        method: &str,
        inputs: &Value,
    ) -> Result<Outcome, PreflightError> {
        let Some(signature) = servable.method(method) else {
            return Err(PreflightError::UnknownMethod(method.to_owned()));
        };
        tracing::debug!(method, unpack = signature.unpacks(), "pre-flight input check");
        Ok(self.validate(inputs, &signature.input)?)
    }
}

/// Runs [`Validator::preflight`] with default options.
///
/// # Errors
///
/// See [`Validator::preflight`].
pub fn preflight(servable: &Servable, method: &str, inputs: &Value) -> Result<Outcome, PreflightError> {
    Validator::new().preflight(servable, method, inputs)
}
