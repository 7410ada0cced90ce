//! The validated risk assessment.
//!
//! An `Assessment` can only be obtained through [`Assessment::new`] or serde
//! deserialization, and both paths run the same invariant checks. Holding an
//! `Assessment` therefore proves every field passed validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field names every assessment object must carry, in declaration order.
pub const REQUIRED_FIELDS: [&str; 3] = ["risk_level", "key_factors", "recommendations"];

/// The three risk categories the model may answer with.
///
/// The textual form is case-sensitive: `"Low"`, `"Medium"`, `"High"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Every accepted value, in ascending order of risk.
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| AssessmentError::UnknownRiskLevel(s.to_string()))
    }
}

/// Reasons an `Assessment` cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    #[error("unknown risk level '{0}'")]
    UnknownRiskLevel(String),

    #[error("'{field}' must contain at least one entry")]
    EmptyList { field: &'static str },

    #[error("'{field}' entry {index} is blank")]
    BlankEntry { field: &'static str, index: usize },
}

/// A diabetes risk assessment whose fields have all passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedAssessment")]
pub struct Assessment {
    risk_level: RiskLevel,
    key_factors: Vec<String>,
    recommendations: Vec<String>,
}

impl Assessment {
    /// Construct an assessment, enforcing the non-empty list invariants.
    ///
    /// Both lists must hold at least one entry and no entry may be blank
    /// after trimming. Entries are stored as given, untrimmed.
    pub fn new(
        risk_level: RiskLevel,
        key_factors: Vec<String>,
        recommendations: Vec<String>,
    ) -> Result<Self, AssessmentError> {
        check_list("key_factors", &key_factors)?;
        check_list("recommendations", &recommendations)?;
        Ok(Self {
            risk_level,
            key_factors,
            recommendations,
        })
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn key_factors(&self) -> &[String] {
        &self.key_factors
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

fn check_list(field: &'static str, entries: &[String]) -> Result<(), AssessmentError> {
    if entries.is_empty() {
        return Err(AssessmentError::EmptyList { field });
    }
    match entries.iter().position(|e| e.trim().is_empty()) {
        Some(index) => Err(AssessmentError::BlankEntry { field, index }),
        None => Ok(()),
    }
}

/// Wire shape accepted by serde before the invariants are checked.
/// Unknown keys are ignored.
#[derive(Deserialize)]
struct UncheckedAssessment {
    risk_level: RiskLevel,
    key_factors: Vec<String>,
    recommendations: Vec<String>,
}

impl TryFrom<UncheckedAssessment> for Assessment {
    type Error = AssessmentError;

    fn try_from(raw: UncheckedAssessment) -> Result<Self, Self::Error> {
        Assessment::new(raw.risk_level, raw.key_factors, raw.recommendations)
    }
}
