//! # diarisk-contracts
//!
//! Shared types, schemas, and error contracts for the DIARISK client.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, their invariants, and error types.

pub mod assessment;
pub mod call;
pub mod completion;
pub mod error;
pub mod patient;
pub mod validation;
