//! Decoding of model output into a summary payload.

use crate::llm::error::LlmError;
use serde_json::{Map, Value};

/// Score used when the model omits one.
pub const DEFAULT_SCORE: u8 = 3;

/// Maximum number of features kept from a response.
pub const MAX_FEATURES: usize = 3;

/// The structured fields extracted from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPayload {
    pub headline: String,
    pub core_features: Vec<String>,
    pub use_case: String,
    /// Always within 1..=5.
    pub score: u8,
    pub score_reason: String,
}

/// Removes a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parses a model response.
///
/// Missing string fields become empty, missing `score` becomes
/// [`DEFAULT_SCORE`], and only the first [`MAX_FEATURES`] features are kept.
/// Either `one_liner_cn` or `headline` may carry the headline.
///
/// # Errors
///
/// Returns [`LlmError::Json`] for undecodable text and
/// [`LlmError::InvalidPayload`] when the value is not an object or the score
/// cannot be converted to an integer.
pub fn parse_summary_payload(text: &str) -> Result<SummaryPayload, LlmError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;
    let Value::Object(object) = value else {
        return Err(LlmError::InvalidPayload(
            "expected a JSON object".to_string(),
        ));
    };

    let headline = string_field(&object, "one_liner_cn")
        .or_else(|| string_field(&object, "headline"))
        .unwrap_or_default();

    let core_features = object
        .get("core_features")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .take(MAX_FEATURES)
                .collect()
        })
        .unwrap_or_default();

    Ok(SummaryPayload {
        headline,
        core_features,
        use_case: string_field(&object, "use_case").unwrap_or_default(),
        score: coerce_score(object.get("score"))?,
        score_reason: string_field(&object, "score_reason").unwrap_or_default(),
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Converts a score to an integer and clamps it into 1..=5.
fn coerce_score(value: Option<&Value>) -> Result<u8, LlmError> {
    let raw = match value {
        None => return Ok(DEFAULT_SCORE),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i,
            // Floats truncate toward zero; the cast saturates.
            None => n.as_f64().map_or(0, |f| f.trunc() as i64),
        },
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| {
            LlmError::InvalidPayload(format!("score '{s}' is not an integer"))
        })?,
        Some(other) => {
            return Err(LlmError::InvalidPayload(format!(
                "score {other} is not an integer"
            )))
        }
    };
    // Clamped into 1..=5, so the narrowing is lossless.
    Ok(raw.clamp(1, 5) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn parses_complete_payload() {
        let payload = parse_summary_payload(
            r#"```json
{
  "one_liner_cn": "A faster Python package manager 🚀",
  "core_features": ["Resolver", "Lockfiles", "Workspaces", "Extra"],
  "use_case": "Python teams tired of slow installs",
  "score": 5,
  "score_reason": "Huge speedups"
}
```"#,
        )
        .unwrap();

        assert_eq!(payload.headline, "A faster Python package manager 🚀");
        assert_eq!(payload.core_features, vec!["Resolver", "Lockfiles", "Workspaces"]);
        assert_eq!(payload.use_case, "Python teams tired of slow installs");
        assert_eq!(payload.score, 5);
        assert_eq!(payload.score_reason, "Huge speedups");
    }

    #[test]
    fn accepts_headline_key_and_defaults() {
        let payload = parse_summary_payload(r#"{"headline": "Short"}"#).unwrap();
        assert_eq!(payload.headline, "Short");
        assert!(payload.core_features.is_empty());
        assert_eq!(payload.use_case, "");
        assert_eq!(payload.score, DEFAULT_SCORE);
    }

    #[test]
    fn clamps_scores() {
        let score = |raw: &str| {
            parse_summary_payload(&format!(r#"{{"score": {raw}}}"#))
                .unwrap()
                .score
        };
        assert_eq!(score("7"), 5);
        assert_eq!(score("0"), 1);
        assert_eq!(score("-3"), 1);
        assert_eq!(score("4.9"), 4);
        assert_eq!(score("\"2\""), 2);
    }

    #[test]
    fn non_numeric_score_is_parse_error() {
        let error = parse_summary_payload(r#"{"score": "excellent"}"#).unwrap_err();
        assert!(error.is_parse_error());
        let error = parse_summary_payload(r#"{"score": [4]}"#).unwrap_err();
        assert!(error.is_parse_error());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let error = parse_summary_payload("Sure! Here is the summary: {").unwrap_err();
        assert!(matches!(error, LlmError::Json(_)));
        let error = parse_summary_payload("[1, 2]").unwrap_err();
        assert!(matches!(error, LlmError::InvalidPayload(_)));
    }
}
