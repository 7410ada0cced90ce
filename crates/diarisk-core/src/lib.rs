//! # diarisk-core
//!
//! The request/validate pipeline for DIARISK risk queries.
//!
//! This crate provides:
//! - The two seams (`CompletionService`, `ResponseValidator`)
//! - The request builder that renders the instruction for a patient record
//! - The `RiskAssessor` that wires them into a total `get_risk` call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diarisk_core::{RiskAssessor, traits::{CompletionService, ResponseValidator}};
//! ```

pub mod assessor;
pub mod prompt;
pub mod traits;

pub use assessor::RiskAssessor;
