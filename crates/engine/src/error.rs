//! Error taxonomy of the form engine.
//!
//! - [`FormError::Configuration`]: the schema provider broke its contract
//!   (unknown type tag, duplicate name, dangling dependency parameter). Fatal
//!   to rendering the enclosing form.
//! - [`FormError::Validation`]: a required field is empty at submit time.
//!   The form stays open for correction.
//! - [`FormError::Dependency`]: a fill callback failed or returned values
//!   that could not be applied. Dependent fields keep their last good state.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid form description for field '{field}': {message}")]
    Configuration { field: String, message: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dependency(#[from] DependencyFailure),
}

impl FormError {
    pub(crate) fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        FormError::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            FormError::Configuration { field, .. } => Some(field),
            FormError::Validation(error) => Some(&error.field),
            FormError::Dependency(failure) => failure.field.as_deref().or(Some(&failure.trigger)),
        }
    }
}

/// Why a required field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// Text or list content is empty.
    Empty,
    /// Numeric value is zero.
    Zero,
    /// No choice is selected.
    Unselected,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ValidationReason::Empty => "a value is required",
            ValidationReason::Zero => "a non-zero value is required",
            ValidationReason::Unselected => "a selection is required",
        };
        f.write_str(message)
    }
}

/// A required field failed validation during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label}: {reason}")]
pub struct ValidationError {
    /// Field name.
    pub field: String,
    /// Human-readable label shown to the user.
    pub label: String,
    pub reason: ValidationReason,
}

/// A dependency callback could not refresh its target fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("callback '{callback}' triggered by '{trigger}' failed: {message}")]
pub struct DependencyFailure {
    /// Field whose change initiated the callback.
    pub trigger: String,
    pub callback: String,
    /// Target field involved in the failure, if the remote call itself succeeded.
    pub field: Option<String>,
    pub message: String,
}
