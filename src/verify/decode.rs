//! Tolerant decoding of model replies.
//!
//! Replies are trimmed, unwrapped from a Markdown code fence and parsed as a
//! JSON object. Anything else becomes [`Decoded::Unparsed`]; nothing here
//! returns an error to the caller.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::model::{ComparisonResult, FactCheckResult, IndividualVerdict, RankedSource};

/// A reply that could not be decoded, kept verbatim for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    pub raw: String,
    pub reason: String,
}

/// Outcome of decoding a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Parsed(T),
    Unparsed(ParseFailure),
}

impl<T> Decoded<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Decoded::Parsed(value) => Some(value),
            Decoded::Unparsed(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Decoded::Parsed(_))
    }
}

/// The verification reply as a JSON object, before per-element decoding.
pub type RawDecision = Decoded<Value>;

/// Strips an enclosing code fence and its language tag, then trims.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = rest.split_once("```").map_or(rest, |(body, _)| body);
    let body = match body.split_once('\n') {
        Some((tag, tail)) if is_language_tag(tag) => tail,
        _ => body.strip_prefix("json").unwrap_or(body),
    };
    body.trim()
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Decodes a raw reply into a JSON object.
pub fn decode_reply(reply: &str) -> RawDecision {
    let content = strip_code_fence(reply);
    match serde_json::from_str::<Value>(content) {
        Ok(value @ Value::Object(_)) => Decoded::Parsed(value),
        Ok(other) => Decoded::Unparsed(ParseFailure {
            raw: content.to_string(),
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Decoded::Unparsed(ParseFailure {
            raw: content.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Decodes a reply straight into `T`.
pub fn decode_as<T: DeserializeOwned>(reply: &str) -> Decoded<T> {
    match decode_reply(reply) {
        Decoded::Parsed(value) => {
            let raw = value.to_string();
            match serde_json::from_value(value) {
                Ok(parsed) => Decoded::Parsed(parsed),
                Err(e) => Decoded::Unparsed(ParseFailure {
                    raw,
                    reason: e.to_string(),
                }),
            }
        }
        Decoded::Unparsed(failure) => Decoded::Unparsed(failure),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Splits a decoded reply into per-source verdicts and the comparison.
///
/// Each `individual_results` element decodes on its own; a bad element becomes
/// an unverifiable placeholder. A bad comparison becomes an unverifiable result
/// whose summary names the error.
pub fn parse_verdicts(decision: &RawDecision) -> (Vec<IndividualVerdict>, ComparisonResult) {
    let object = match decision {
        Decoded::Parsed(value) => value,
        Decoded::Unparsed(failure) => {
            warn!(reason = %failure.reason, "Verification reply was not valid JSON");
            return (
                Vec::new(),
                ComparisonResult::unverifiable(format!(
                    "Error parsing comparison: {}",
                    failure.reason
                )),
            );
        }
    };

    let verdicts = match object.get("individual_results") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(parse_individual).collect(),
        Some(other) => {
            warn!(kind = json_kind(other), "individual_results is not an array");
            Vec::new()
        }
    };

    let comparison = match RawComparison::deserialize(object) {
        Ok(raw) => raw.into_comparison(),
        Err(e) => {
            warn!(error = %e, "Failed to decode comparison");
            ComparisonResult::unverifiable(format!("Error parsing comparison: {e}"))
        }
    };

    (verdicts, comparison)
}

fn parse_individual(item: &Value) -> IndividualVerdict {
    IndividualVerdict::deserialize(item).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to decode individual result");
        IndividualVerdict::parse_error(e)
    })
}

#[derive(Deserialize)]
struct RawComparison {
    #[serde(default, deserialize_with = "null_as_default")]
    sorted_results: Vec<Value>,
    #[serde(default, deserialize_with = "optional_verdict")]
    consensus: Option<FactCheckResult>,
    #[serde(default, deserialize_with = "null_as_default")]
    final_verdict: FactCheckResult,
    #[serde(default, deserialize_with = "null_as_default")]
    summary: String,
    #[serde(default, deserialize_with = "lenient_unit_interval")]
    agreement_score: f64,
}

impl RawComparison {
    fn into_comparison(self) -> ComparisonResult {
        let mut ranked: Vec<RankedSource> = self
            .sorted_results
            .iter()
            .filter_map(|item| match RankedSource::deserialize(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable ranked entry");
                    None
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        ComparisonResult {
            sorted_results: ranked,
            consensus: self.consensus,
            final_verdict: self.final_verdict,
            summary: self.summary,
            agreement_score: self.agreement_score,
        }
    }
}

/// Treats `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` and `""` mean no verdict; anything else must be a valid one.
pub(crate) fn optional_verdict<'de, D>(deserializer: D) -> Result<Option<FactCheckResult>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Accepts a boolean or the strings `"true"` / `"false"`.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(de::Error::custom(format!("'{s}' is not a boolean"))),
        },
        other => Err(de::Error::custom(format!(
            "expected a boolean, got {}",
            json_kind(&other)
        ))),
    }
}

/// Accepts a number or numeric string and clamps it into `[0, 1]`. NaN becomes 0.
pub(crate) fn lenient_unit_interval<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Null => 0.0,
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("'{s}' is not a number")))?,
        other => {
            return Err(de::Error::custom(format!(
                "expected a number, got {}",
                json_kind(&other)
            )));
        }
    };
    Ok(clamp_unit(value))
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
