//! Staged validator for model-generated risk assessments.
//!
//! `AssessmentVerifier` implements the `ResponseValidator` trait from
//! `diarisk-core`. Validation runs in fixed stages and stops at the first
//! failure:
//!
//! 1. **Parse**: the text must be a JSON object.
//! 2. **Required fields**: `risk_level`, `key_factors`, `recommendations`
//!    must all be present. Extra keys are ignored.
//! 3. **Risk level**: must be exactly `Low`, `Medium`, or `High`.
//! 4. **Lists**: `key_factors`, then `recommendations`, must each be a
//!    non-empty array of strings that are non-blank after trimming.
//! 5. **Structural**: the three fields are projected into a fresh object,
//!    checked against the assessment JSON Schema with the `jsonschema`
//!    crate, and deserialized into `Assessment`.
//!
//! Each stage reports one human-readable reason. Stage 5 should never fire
//! when stages 1–4 are correct; if it does, the disagreement is reported as
//! an ordinary validation failure. Both passes treat an entry as blank
//! exactly when `str::trim` leaves it empty.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use diarisk_contracts::{
    assessment::{Assessment, RiskLevel, REQUIRED_FIELDS},
    patient::json_kind,
    validation::{ValidationError, ValidationResult},
};
use diarisk_core::traits::ResponseValidator;

use crate::schema::{assessment_json_schema, ASSESSMENT_SCHEMA_ID};

/// The list fields, in the order they are checked.
const LIST_FIELDS: [&str; 2] = ["key_factors", "recommendations"];

/// The DIARISK output validator.
///
/// The schema is compiled once, at construction. A compile failure is kept
/// and reported by every later validation instead of panicking.
pub struct AssessmentVerifier {
    schema: Result<jsonschema::Validator, String>,
}

impl AssessmentVerifier {
    pub fn new() -> Self {
        let schema = jsonschema::validator_for(&assessment_json_schema()).map_err(|e| {
            warn!(
                schema_id = ASSESSMENT_SCHEMA_ID,
                error = %e,
                "assessment schema failed to compile"
            );
            format!("invalid JSON Schema document: {e}")
        });
        Self { schema }
    }

    /// Run every stage, returning the assessment or the first failure.
    pub fn check(&self, raw: &str) -> Result<Assessment, ValidationError> {
        let object = parse_object(raw)?;
        check_required(&object)?;
        check_risk_level(&object)?;
        for field in LIST_FIELDS {
            check_list(&object, field)?;
        }
        self.check_structure(&object)
    }

    // ── Stage 5 ───────────────────────────────────────────────────────────────

    /// Re-validate the projected fields against the JSON Schema, then build
    /// the `Assessment` through its own invariant checks.
    fn check_structure(&self, object: &Map<String, Value>) -> Result<Assessment, ValidationError> {
        let projected: Map<String, Value> = REQUIRED_FIELDS
            .iter()
            .filter_map(|field| object.get(*field).map(|v| (field.to_string(), v.clone())))
            .collect();
        let projected = Value::Object(projected);

        let validator = self
            .schema
            .as_ref()
            .map_err(|reason| ValidationError::Structural(reason.clone()))?;

        if let Some(error) = validator.iter_errors(&projected).next() {
            return Err(ValidationError::Structural(format!(
                "JSON Schema violation at {}: {}",
                error.instance_path, error
            )));
        }

        serde_json::from_value::<Assessment>(projected)
            .map_err(|e| ValidationError::Structural(e.to_string()))
    }
}

impl Default for AssessmentVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseValidator for AssessmentVerifier {
    /// Validate `raw`, converting the first failure into an `Invalid` result.
    fn validate(&self, raw: &str) -> ValidationResult {
        match self.check(raw) {
            Ok(assessment) => {
                debug!(
                    schema_id = ASSESSMENT_SCHEMA_ID,
                    risk_level = %assessment.risk_level(),
                    key_factors = assessment.key_factors().len(),
                    recommendations = assessment.recommendations().len(),
                    "validation complete"
                );
                assessment.into()
            }
            Err(error) => {
                warn!(schema_id = ASSESSMENT_SCHEMA_ID, %error, "validation failed");
                error.into()
            }
        }
    }
}

/// Validate `raw` with a default [`AssessmentVerifier`].
///
/// No network access; suitable for checking arbitrary text.
pub fn validate(raw: &str) -> ValidationResult {
    AssessmentVerifier::new().validate(raw)
}

// ── Stages 1–4 ────────────────────────────────────────────────────────────────

fn parse_object(raw: &str) -> Result<Map<String, Value>, ValidationError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

fn check_required(object: &Map<String, Value>) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !object.contains_key(*field))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

fn check_risk_level(object: &Map<String, Value>) -> Result<RiskLevel, ValidationError> {
    object
        .get("risk_level")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<RiskLevel>().ok())
        .ok_or(ValidationError::InvalidRiskLevel)
}

fn check_list(object: &Map<String, Value>, field: &'static str) -> Result<(), ValidationError> {
    let well_formed = match object.get(field) {
        Some(Value::Array(items)) => {
            !items.is_empty()
                && items
                    .iter()
                    .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty()))
        }
        _ => false,
    };
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidList { field })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use diarisk_contracts::{
        assessment::{Assessment, RiskLevel, REQUIRED_FIELDS},
        validation::{ValidationError, ValidationResult},
    };
    use diarisk_core::traits::ResponseValidator;

    use super::{validate, AssessmentVerifier};
    use crate::schema::assessment_json_schema;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn valid_payload() -> Value {
        json!({
            "risk_level": "Medium",
            "key_factors": ["elevated glucose", "family history"],
            "recommendations": ["consult doctor", "monitor blood sugar"]
        })
    }

    fn with(field: &str, value: Value) -> String {
        let mut payload = valid_payload();
        payload[field] = value;
        payload.to_string()
    }

    fn without(field: &str) -> String {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove(field);
        payload.to_string()
    }

    fn error_of(result: &ValidationResult) -> String {
        assert!(!result.is_valid(), "expected rejection, got {result:?}");
        result.error_message().unwrap()
    }

    // ── Success path ──────────────────────────────────────────────────────────

    #[test]
    fn test_valid_payload_passes() {
        let result = validate(&valid_payload().to_string());

        assert!(result.is_valid(), "unexpected failure: {:?}", result.error());
        let data = result.data().unwrap();
        assert_eq!(data.risk_level(), RiskLevel::Medium);
        assert_eq!(data.key_factors(), ["elevated glucose", "family history"]);
        assert_eq!(data.recommendations(), ["consult doctor", "monitor blood sugar"]);
    }

    /// Serializing any valid assessment and validating it yields the same data.
    #[test]
    fn test_round_trip_preserves_assessment() {
        for level in RiskLevel::ALL {
            let original = Assessment::new(
                level,
                vec!["bmi 31".to_string(), "  sedentary  ".to_string()],
                vec!["increase activity".to_string()],
            )
            .unwrap();

            let text = serde_json::to_string_pretty(&original).unwrap();
            let result = validate(&text);

            assert_eq!(result.data(), Some(&original));
        }
    }

    #[test]
    fn test_extra_fields_are_dropped() {
        let mut payload = valid_payload();
        payload["incomplete"] = json!(true);
        payload["confidence"] = json!("high");

        let result = validate(&payload.to_string());

        let data = result.data().expect("extra fields must be tolerated");
        let reserialized = serde_json::to_value(data).unwrap();
        assert_eq!(reserialized, valid_payload());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let verifier = AssessmentVerifier::new();
        for text in [
            valid_payload().to_string(),
            without("key_factors"),
            "This is not valid JSON".to_string(),
        ] {
            assert_eq!(verifier.validate(&text), verifier.validate(&text));
        }
    }

    // ── Stage 1: parse ────────────────────────────────────────────────────────

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = validate("This is not valid JSON");

        let msg = error_of(&result);
        assert!(msg.starts_with("Invalid JSON: "), "got: {msg}");
        assert!(matches!(result.error(), Some(ValidationError::InvalidJson(_))));
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        for (text, kind) in [
            ("\"Medium\"", "string"),
            ("42", "number"),
            ("[1, 2]", "array"),
            ("null", "null"),
        ] {
            let result = validate(text);
            assert_eq!(
                result.error(),
                Some(&ValidationError::NotAnObject { found: kind }),
                "input: {text}"
            );
            assert!(error_of(&result).starts_with("Invalid JSON"));
        }
    }

    // ── Stage 2: required fields ──────────────────────────────────────────────

    #[test]
    fn test_each_missing_field_is_named() {
        for field in REQUIRED_FIELDS {
            let msg = error_of(&validate(&without(field)));
            assert!(msg.to_lowercase().contains("missing"), "got: {msg}");
            assert!(msg.contains(field), "error should name '{field}': {msg}");
        }
    }

    #[test]
    fn test_all_missing_fields_listed_in_order() {
        let result = validate("{\"summary\": \"fine\"}");
        assert_eq!(
            error_of(&result),
            "Missing fields: risk_level, key_factors, recommendations"
        );
    }

    /// Presence is checked by key; a null value passes stage 2 and fails later.
    #[test]
    fn test_null_field_counts_as_present() {
        let result = validate(&with("risk_level", Value::Null));
        assert_eq!(result.error(), Some(&ValidationError::InvalidRiskLevel));
    }

    // ── Stage 3: risk level ───────────────────────────────────────────────────

    #[test]
    fn test_accepts_every_risk_level() {
        for level in ["Low", "Medium", "High"] {
            assert!(validate(&with("risk_level", json!(level))).is_valid(), "{level}");
        }
    }

    #[test]
    fn test_rejects_other_risk_levels() {
        for bad in [json!("Very High"), json!("low"), json!(""), json!(3), json!(["High"])] {
            let msg = error_of(&validate(&with("risk_level", bad.clone())));
            assert!(msg.contains("risk_level"), "input {bad}: {msg}");
            assert_eq!(msg, "Invalid risk_level. Must be: Low, Medium, or High");
        }
    }

    // ── Stage 4: lists ────────────────────────────────────────────────────────

    #[test]
    fn test_empty_key_factors_rejected() {
        let msg = error_of(&validate(&with("key_factors", json!([]))));
        assert_eq!(msg, "Invalid key_factors: Must be non-empty list of strings");
    }

    #[test]
    fn test_blank_entries_rejected() {
        for bad in [json!([""]), json!(["   "]), json!(["ok", "\t\n"])] {
            let msg = error_of(&validate(&with("key_factors", bad)));
            assert!(msg.contains("key_factors"), "got: {msg}");
        }
    }

    #[test]
    fn test_non_string_and_non_list_values_rejected() {
        for bad in [json!("elevated glucose"), json!([1, 2]), json!([null]), json!({})] {
            let msg = error_of(&validate(&with("recommendations", bad)));
            assert_eq!(msg, "Invalid recommendations: Must be non-empty list of strings");
        }
    }

    #[test]
    fn test_key_factors_reported_before_recommendations() {
        let mut payload = valid_payload();
        payload["key_factors"] = json!([]);
        payload["recommendations"] = json!([]);

        let result = validate(&payload.to_string());
        assert_eq!(
            result.error(),
            Some(&ValidationError::InvalidList { field: "key_factors" })
        );
    }

    /// Stages run in order: a bad risk level wins over a bad list.
    #[test]
    fn test_stages_short_circuit() {
        let mut payload = valid_payload();
        payload["risk_level"] = json!("Extreme");
        payload["key_factors"] = json!([]);

        let result = validate(&payload.to_string());
        assert_eq!(result.error(), Some(&ValidationError::InvalidRiskLevel));
    }

    // ── Stage 5: structural ───────────────────────────────────────────────────

    #[test]
    fn test_schema_document_compiles() {
        assert!(jsonschema::validator_for(&assessment_json_schema()).is_ok());
        assert!(AssessmentVerifier::new().schema.is_ok());
    }

    #[test]
    fn test_schema_agrees_with_field_stages() {
        let validator = jsonschema::validator_for(&assessment_json_schema()).unwrap();

        assert!(validator.is_valid(&valid_payload()));
        assert!(!validator.is_valid(&json!({
            "risk_level": "medium",
            "key_factors": ["bmi"],
            "recommendations": ["rest"]
        })));

        for entry in [
            "  ", "\t\n", "\u{85}", "\u{A0}", "\u{3000}", "\u{2028}", "\u{FEFF}", "\u{200B}",
            " bmi ", "\u{3000}bmi",
        ] {
            let payload = json!({
                "risk_level": "Medium",
                "key_factors": [entry],
                "recommendations": ["rest"]
            });
            assert_eq!(
                validator.is_valid(&payload),
                !entry.trim().is_empty(),
                "entry {entry:?}"
            );
        }
    }

    /// Characters that are not Unicode whitespace count as content, even
    /// where other regex dialects would treat them as blank.
    #[test]
    fn test_non_whitespace_format_characters_are_accepted() {
        for entry in ["\u{FEFF}", "\u{200B}"] {
            let result = validate(&with("key_factors", json!([entry])));
            assert!(result.is_valid(), "entry {entry:?}: {:?}", result.error());
            assert_eq!(result.data().unwrap().key_factors(), [entry]);
        }
    }

    #[test]
    fn test_unicode_whitespace_entries_fail_the_list_stage() {
        for entry in ["\u{85}", "\u{A0}", "\u{3000}", "\u{2028}"] {
            let result = validate(&with("key_factors", json!([entry])));
            assert_eq!(
                result.error(),
                Some(&ValidationError::InvalidList { field: "key_factors" }),
                "entry {entry:?}"
            );
        }
    }

    /// Calling the structural stage directly on data the earlier stages
    /// would have rejected surfaces a `Validation error:` message.
    #[test]
    fn test_structural_stage_reports_violations() {
        let verifier = AssessmentVerifier::new();
        let object = json!({
            "risk_level": "Medium",
            "key_factors": [],
            "recommendations": ["rest"]
        });

        let err = verifier
            .check_structure(object.as_object().unwrap())
            .unwrap_err();

        assert!(matches!(err, ValidationError::Structural(_)));
        assert!(err.to_string().starts_with("Validation error: "), "got: {err}");
    }
}
