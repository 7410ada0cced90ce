//! # diarisk-verify
//!
//! Output validation for DIARISK risk queries.
//!
//! This crate provides [`engine::AssessmentVerifier`], which implements the
//! [`diarisk_core::traits::ResponseValidator`] trait, and the free function
//! [`validate`] for checking arbitrary text without a network call.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use diarisk_verify::validate;
//!
//! let result = validate(r#"{"risk_level":"Low","key_factors":["active"],"recommendations":["keep going"]}"#);
//! assert!(result.is_valid());
//! ```

pub mod engine;
pub mod schema;

pub use engine::{validate, AssessmentVerifier};
