//! The JSON Schema document for a risk assessment.
//!
//! Used by the structural pass in [`crate::engine`]. It encodes the same
//! constraints as the field-by-field stages, so a disagreement between the
//! two means one of them is wrong.

use serde_json::{json, Value};

use diarisk_contracts::assessment::{RiskLevel, REQUIRED_FIELDS};

/// Identifier used in log fields.
pub const ASSESSMENT_SCHEMA_ID: &str = "diabetes-risk-assessment-v1";

/// Every character for which `char::is_whitespace` holds, as inclusive
/// ranges. `str::trim` strips exactly these, so "blank" means the same in
/// the schema as in the list stage. ECMAScript `\s` differs (it matches
/// U+FEFF and not U+0085) and must not be used here.
pub(crate) const WHITESPACE_RANGES: [(char, char); 10] = [
    ('\u{0009}', '\u{000D}'),
    ('\u{0020}', '\u{0020}'),
    ('\u{0085}', '\u{0085}'),
    ('\u{00A0}', '\u{00A0}'),
    ('\u{1680}', '\u{1680}'),
    ('\u{2000}', '\u{200A}'),
    ('\u{2028}', '\u{2029}'),
    ('\u{202F}', '\u{202F}'),
    ('\u{205F}', '\u{205F}'),
    ('\u{3000}', '\u{3000}'),
];

/// A pattern matching any string with at least one non-whitespace character.
///
/// The class holds literal characters, not escapes.
fn non_blank_pattern() -> String {
    let class: String = WHITESPACE_RANGES
        .iter()
        .map(|&(lo, hi)| {
            if lo == hi {
                lo.to_string()
            } else {
                format!("{lo}-{hi}")
            }
        })
        .collect();
    format!("[^{class}]")
}

fn non_empty_string_list() -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": {
            "type": "string",
            "pattern": non_blank_pattern()
        }
    })
}

/// Build the assessment schema.
pub fn assessment_json_schema() -> Value {
    let levels: Vec<&str> = RiskLevel::ALL.iter().map(RiskLevel::as_str).collect();

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": REQUIRED_FIELDS,
        "properties": {
            "risk_level": { "type": "string", "enum": levels },
            "key_factors": non_empty_string_list(),
            "recommendations": non_empty_string_list()
        }
    })
}
