//! Core trait definitions for the DIARISK pipeline.
//!
//! Two seams separate the trusted pipeline from its collaborators:
//!
//! - `CompletionService`: untrusted text source (a remote language model)
//! - `ResponseValidator`: trusted checker (turns raw text into a verdict)
//!
//! `RiskAssessor` wires them together. Tests substitute either side.

use diarisk_contracts::{
    completion::{CompletionRequest, CompletionResponse},
    error::DiariskResult,
    validation::ValidationResult,
};

/// A chat-completion endpoint.
///
/// Implementations own transport, authentication, and wire-format details.
/// Every failure must come back as a `DiariskError`; implementations must not
/// panic on network or service errors.
pub trait CompletionService: Send + Sync {
    /// Send one request and return the service's candidate completions.
    fn complete(&self, request: &CompletionRequest) -> DiariskResult<CompletionResponse>;
}

/// The output validator: the only gate between model text and an `Assessment`.
///
/// Implementations are pure. The same input must always yield the same
/// `ValidationResult`, and validation never fails with an error; rejection
/// is itself a `ValidationResult`.
pub trait ResponseValidator: Send + Sync {
    fn validate(&self, raw: &str) -> ValidationResult;
}
