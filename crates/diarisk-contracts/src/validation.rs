//! Validation outcomes.
//!
//! `ValidationResult` is a tagged success/failure value rather than a
//! `Result`: validating model output is expected to fail routinely, and the
//! failure is data the caller reports, not an error it propagates.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::assessment::Assessment;

/// Why a piece of model output (or the call that should have produced it)
/// was rejected.
///
/// The `Display` text of each variant is the human-readable error message
/// reported in `ValidationResult::Invalid`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The completion call itself failed; carries the failure description.
    #[error("{0}")]
    CallFailed(String),

    /// The text is not syntactically valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The text is valid JSON but not an object.
    #[error("Invalid JSON: expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// One or more required fields are absent, in declaration order.
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid risk_level. Must be: Low, Medium, or High")]
    InvalidRiskLevel,

    /// A list field is empty, not a list, or holds a non-string or blank entry.
    #[error("Invalid {field}: Must be non-empty list of strings")]
    InvalidList { field: &'static str },

    /// The structural re-validation disagreed with the earlier stages.
    #[error("Validation error: {0}")]
    Structural(String),
}

/// The outcome of validating one piece of model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid { data: Assessment },
    Invalid { error: ValidationError },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    /// The validated assessment, if any.
    pub fn data(&self) -> Option<&Assessment> {
        match self {
            ValidationResult::Valid { data } => Some(data),
            ValidationResult::Invalid { .. } => None,
        }
    }

    /// The typed rejection reason, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid { error } => Some(error),
        }
    }

    /// The human-readable rejection message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }
}

impl From<Assessment> for ValidationResult {
    fn from(data: Assessment) -> Self {
        ValidationResult::Valid { data }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        ValidationResult::Invalid { error }
    }
}

/// Serializes as `{"valid": true, "data": {...}}` or
/// `{"valid": false, "error": "<message>"}`.
impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        match self {
            ValidationResult::Valid { data } => {
                state.serialize_field("valid", &true)?;
                state.serialize_field("data", data)?;
            }
            ValidationResult::Invalid { error } => {
                state.serialize_field("valid", &false)?;
                state.serialize_field("error", &error.to_string())?;
            }
        }
        state.end()
    }
}
