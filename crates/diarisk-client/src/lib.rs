//! # diarisk-client
//!
//! Entry points for running DIARISK risk queries against a real
//! OpenAI-compatible completion endpoint.
//!
//! - [`get_risk`]: configuration from the environment, one query, one
//!   [`CallResult`]. Never panics and never returns an error.
//! - [`validate`]: re-exported from `diarisk-verify` for validating text
//!   without a network call.
//!
//! ```rust,ignore
//! use diarisk_client::get_risk;
//! use diarisk_contracts::patient::PatientRecord;
//!
//! let patient = PatientRecord::new().with("age", 45).with("glucose_level", 110);
//! let result = get_risk(&patient);
//! if let Some(assessment) = result.validation.data() {
//!     println!("risk: {}", assessment.risk_level());
//! }
//! ```

pub mod config;
pub mod openai;

use tracing::warn;

use diarisk_contracts::{call::CallResult, error::DiariskResult, patient::PatientRecord};
use diarisk_core::RiskAssessor;
use diarisk_verify::AssessmentVerifier;

pub use config::ServiceConfig;
pub use diarisk_verify::validate;
pub use openai::OpenAiCompletionService;

/// Wire the OpenAI-compatible service and the standard validator into an
/// assessor configured by `config`.
pub fn assessor_from_config(config: &ServiceConfig) -> DiariskResult<RiskAssessor> {
    config.validate()?;
    let service = OpenAiCompletionService::from_config(config)?;
    Ok(
        RiskAssessor::new(Box::new(service), Box::new(AssessmentVerifier::new()))
            .with_options(config.prompt_options()),
    )
}

/// Run one risk query with an explicit configuration.
///
/// A configuration problem is reported like any other call failure:
/// `raw: None` and an invalid `validation`.
pub fn get_risk_with_config(patient: &PatientRecord, config: &ServiceConfig) -> CallResult {
    match assessor_from_config(config) {
        Ok(assessor) => assessor.get_risk(patient),
        Err(e) => {
            warn!(error = %e, "cannot build completion service");
            CallResult::failed(&e)
        }
    }
}

/// Run one risk query, configured from the environment.
pub fn get_risk(patient: &PatientRecord) -> CallResult {
    match ServiceConfig::from_env() {
        Ok(config) => get_risk_with_config(patient, &config),
        Err(e) => {
            warn!(error = %e, "invalid service configuration");
            CallResult::failed(&e)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
