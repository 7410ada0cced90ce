//! Builds the completion request for a risk query.
//!
//! The user message restates the exact output schema (field names, the
//! enumerated risk levels, the list-of-strings requirement) and then embeds
//! the patient record as indented JSON. The model is asked for bare JSON,
//! but nothing downstream assumes it complies.

use diarisk_contracts::{
    assessment::{RiskLevel, REQUIRED_FIELDS},
    completion::{ChatMessage, CompletionRequest},
    patient::PatientRecord,
};

/// Sampling temperature used unless the host configures another.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

pub const SYSTEM_INSTRUCTION: &str = "You are a medical assistant providing diabetes risk \
     assessments. Respond with a single JSON object only, with no prose, markdown, or code fences.";

/// Knobs the host can turn on the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromptOptions {
    pub temperature: f64,
    pub json_mode: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            json_mode: true,
        }
    }
}

/// Render the user instruction for `patient`.
pub fn user_instruction(patient: &PatientRecord) -> String {
    let levels = RiskLevel::ALL
        .iter()
        .map(|l| format!("\"{l}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let [risk_level, key_factors, recommendations] = REQUIRED_FIELDS;

    format!(
        "Analyze this patient data and provide a diabetes risk assessment.\n\
         \n\
         Patient data:\n\
         {patient}\n\
         \n\
         Return ONLY a JSON object with exactly these fields:\n\
         - \"{risk_level}\": one of {levels} (exact spelling and capitalization)\n\
         - \"{key_factors}\": a non-empty list of strings naming the key risk factors\n\
         - \"{recommendations}\": a non-empty list of strings with recommendations\n\
         Every list entry must be a non-empty string.",
        patient = patient.to_pretty_json(),
    )
}

/// Build the full request: system instruction, then the user instruction.
pub fn build_request(patient: &PatientRecord, options: &PromptOptions) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(user_instruction(patient)),
        ],
        temperature: options.temperature,
        json_mode: options.json_mode,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use diarisk_contracts::completion::Role;

    use super::*;

    fn patient() -> PatientRecord {
        PatientRecord::from_value(json!({
            "age": 45,
            "bmi": 28.5,
            "glucose_level": 110,
            "symptoms": ["increased thirst", "frequent urination"],
            "cholesterol": { "total": 210, "hdl": 45, "ldl": 130 }
        }))
        .unwrap()
    }

    #[test]
    fn request_has_system_then_user_message() {
        let req = build_request(&patient(), &PromptOptions::default());

        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.messages[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(req.messages[1].role, Role::User);
        assert!((req.temperature - 0.3).abs() < f64::EPSILON);
        assert!(req.json_mode);
    }

    #[test]
    fn user_instruction_restates_schema() {
        let text = user_instruction(&patient());

        for field in REQUIRED_FIELDS {
            assert!(text.contains(&format!("\"{field}\"")), "missing field name {field}");
        }
        assert!(text.contains("\"Low\", \"Medium\", \"High\""), "got: {text}");
        assert!(text.contains("non-empty list of strings"));
    }

    #[test]
    fn user_instruction_embeds_indented_patient_data() {
        let text = user_instruction(&patient());

        assert!(text.contains("\n  \"age\": 45"), "got: {text}");
        assert!(text.contains("\"increased thirst\""));
        assert!(text.contains("\"hdl\": 45"));
    }

    #[test]
    fn options_are_carried_into_the_request() {
        let opts = PromptOptions {
            temperature: 0.0,
            json_mode: false,
        };
        let req = build_request(&PatientRecord::new(), &opts);
        assert_eq!(req.temperature, 0.0);
        assert!(!req.json_mode);
    }
}
