//! Error types for the DIARISK request pipeline.
//!
//! Every fallible step between building a request and receiving raw model
//! text returns `DiariskResult<T>`. These errors never reach the caller of
//! `get_risk` directly; the assessor folds them into a `CallResult`.

use thiserror::Error;

/// The unified error type for talking to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiariskError {
    /// The service rejected the credentials (HTTP 401/403).
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    /// The service refused the request because of rate limiting (HTTP 429).
    #[error("rate limited: {reason}")]
    RateLimited { reason: String },

    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The service answered with a non-success status not covered above.
    #[error("completion service error (HTTP {status}): {reason}")]
    Service { status: u16, reason: String },

    /// The service answered, but the body could not be interpreted, or it
    /// carried no usable message text.
    #[error("malformed completion response: {reason}")]
    MalformedResponse { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The caller supplied a patient record that is not a JSON object.
    #[error("invalid patient record: {reason}")]
    InvalidPatientRecord { reason: String },
}

/// Convenience alias used throughout the DIARISK crates.
pub type DiariskResult<T> = Result<T, DiariskError>;
