//! The risk assessor: one patient record in, one `CallResult` out.
//!
//! The assessor drives the pipeline:
//!
//!   PatientRecord → build_request → CompletionService → first choice text → ResponseValidator
//!
//! `get_risk` is total. Service failures, empty replies, and unusable
//! response bodies are folded into the returned `CallResult` instead of being
//! propagated, so callers branch on `validation` alone.

use tracing::{debug, info, warn};

use diarisk_contracts::{
    call::CallResult,
    error::{DiariskError, DiariskResult},
    patient::PatientRecord,
};

use crate::{
    prompt::{build_request, PromptOptions},
    traits::{CompletionService, ResponseValidator},
};

/// Composes a completion service and a validator into a risk query.
///
/// Holds no per-call state; one assessor may serve any number of queries,
/// from any number of threads.
pub struct RiskAssessor {
    service: Box<dyn CompletionService>,
    validator: Box<dyn ResponseValidator>,
    options: PromptOptions,
}

impl RiskAssessor {
    /// Create an assessor with the default prompt options.
    pub fn new(service: Box<dyn CompletionService>, validator: Box<dyn ResponseValidator>) -> Self {
        Self {
            service,
            validator,
            options: PromptOptions::default(),
        }
    }

    /// Replace the prompt options (temperature, JSON mode).
    pub fn with_options(mut self, options: PromptOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PromptOptions {
        &self.options
    }

    /// Run one risk query for `patient`.
    ///
    /// # Pipeline
    ///
    /// 1. Build the request (system + user instruction)
    /// 2. Issue exactly one call to the completion service; no retries
    /// 3. Take the first choice's text; a missing or blank text is a call failure
    /// 4. Validate the text and return it alongside the verdict
    ///
    /// A failure in step 2 or 3 yields `raw: None` and an invalid
    /// `validation` carrying the failure description.
    pub fn get_risk(&self, patient: &PatientRecord) -> CallResult {
        let raw = match self.fetch_raw(patient) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "completion call failed");
                return CallResult::failed(&e);
            }
        };

        let validation = self.validator.validate(&raw);
        match validation.error() {
            None => info!("risk assessment validated"),
            Some(err) => warn!(error = %err, "model output rejected"),
        }

        CallResult::completed(raw, validation)
    }

    fn fetch_raw(&self, patient: &PatientRecord) -> DiariskResult<String> {
        let request = build_request(patient, &self.options);

        debug!(
            attributes = patient.len(),
            messages = request.messages.len(),
            temperature = request.temperature,
            json_mode = request.json_mode,
            "sending risk query"
        );

        let response = self.service.complete(&request)?;

        debug!(choices = response.choices.len(), "completion received");

        response
            .first_text()
            .map(str::to_owned)
            .ok_or_else(|| DiariskError::MalformedResponse {
                reason: "response contained no message content".to_string(),
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
