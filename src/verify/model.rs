use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::decode::{lenient_bool, lenient_unit_interval, null_as_default, optional_verdict};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Verdict vocabulary shared by per-source and aggregate results.
pub enum FactCheckResult {
    Verified,
    PartiallyVerified,
    False,
    #[default]
    Unverifiable,
    Conflicting,
}

impl FactCheckResult {
    pub const ALL: [FactCheckResult; 5] = [
        FactCheckResult::Verified,
        FactCheckResult::PartiallyVerified,
        FactCheckResult::False,
        FactCheckResult::Unverifiable,
        FactCheckResult::Conflicting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FactCheckResult::Verified => "verified",
            FactCheckResult::PartiallyVerified => "partially_verified",
            FactCheckResult::False => "false",
            FactCheckResult::Unverifiable => "unverifiable",
            FactCheckResult::Conflicting => "conflicting",
        }
    }
}

impl fmt::Display for FactCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactCheckResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("'{s}' is not a valid FactCheckResult"))
    }
}

/// The model's judgement of one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualVerdict {
    /// Source label as echoed by the model; not used for alignment.
    #[serde(default, skip_serializing)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "lenient_unit_interval")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: FactCheckResult,
    #[serde(default, deserialize_with = "null_as_default")]
    pub explanation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub supporting_evidence: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contradicting_evidence: Vec<String>,
}

impl IndividualVerdict {
    /// Placeholder for an element that failed to decode.
    pub fn parse_error(reason: impl fmt::Display) -> Self {
        Self {
            source: None,
            is_verified: false,
            confidence: 0.0,
            result: FactCheckResult::Unverifiable,
            explanation: format!("Error parsing result: {reason}"),
            supporting_evidence: Vec::new(),
            contradicting_evidence: Vec::new(),
        }
    }
}

/// One entry of the confidence-ranked summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_unit_interval")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "optional_verdict")]
    pub result: Option<FactCheckResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_evidence: String,
}

/// Cross-source synthesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub sorted_results: Vec<RankedSource>,
    pub consensus: Option<FactCheckResult>,
    pub final_verdict: FactCheckResult,
    pub summary: String,
    pub agreement_score: f64,
}

impl ComparisonResult {
    /// Unverifiable result carrying `summary`.
    pub fn unverifiable(summary: impl Into<String>) -> Self {
        Self {
            sorted_results: Vec::new(),
            consensus: None,
            final_verdict: FactCheckResult::Unverifiable,
            summary: summary.into(),
            agreement_score: 0.0,
        }
    }
}

/// A passage shown to the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceText {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
    pub published_date: Option<String>,
    /// Relevance score when the passage came from the index.
    pub score: Option<f32>,
    pub citations: Option<u64>,
}

impl SourceText {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Pre-classification of a claim's domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainClassification {
    #[serde(deserialize_with = "lenient_bool")]
    pub is_health_related: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub justification: String,
    #[serde(
        default,
        alias = "scientific paper names suggestions",
        deserialize_with = "null_as_default"
    )]
    pub suggested_paper_titles: Vec<String>,
}
