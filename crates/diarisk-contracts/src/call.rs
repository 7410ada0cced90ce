//! The top-level outcome of a risk query.

use serde::Serialize;

use crate::{
    error::DiariskError,
    validation::{ValidationError, ValidationResult},
};

/// What `get_risk` returns: the raw model text and its validation outcome.
///
/// `validation` is always populated. When the call failed before any text
/// arrived, `raw` is `None` and `validation` carries the failure description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallResult {
    /// The verbatim text received from the model.
    pub raw: Option<String>,
    pub validation: ValidationResult,
}

impl CallResult {
    /// A call that produced text, paired with its validation outcome.
    pub fn completed(raw: String, validation: ValidationResult) -> Self {
        Self {
            raw: Some(raw),
            validation,
        }
    }

    /// A call that failed before producing text.
    pub fn failed(error: &DiariskError) -> Self {
        Self {
            raw: None,
            validation: ValidationError::CallFailed(error.to_string()).into(),
        }
    }
}
