//! Per-repository summary.

use crate::llm::SummaryPayload;
use crate::repository::RepositoryRecord;
use serde::Serialize;
use std::sync::Arc;

/// Headline used when a degraded repository has no description and the
/// model's answer could not be parsed.
pub const PARSE_FAILED_HEADLINE: &str = "Parsing failed";

/// Headline used when a degraded repository has no description and no tier
/// produced an answer.
pub const CALL_FAILED_HEADLINE: &str = "API call failed";

const PARSE_FAILED_FEATURE: &str = "Parsing failed, see the original project";
const CALL_FAILED_FEATURE: &str = "API call failed, please retry later";
const UNAVAILABLE_USE_CASE: &str = "Not available";
const UNAVAILABLE_SCORE_REASON: &str = "Summary unavailable";
const DEGRADED_SCORE: u8 = 3;
const MISSING_HEADLINE: &str = "No summary provided";
const MISSING_FEATURE: &str = "See the original project";
const MISSING_SCORE_REASON: &str = "No reason given";

/// A repository with its generated (or placeholder) summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub repo: Arc<RepositoryRecord>,
    pub headline: String,
    /// At most three entries; never empty for degraded summaries.
    pub core_features: Vec<String>,
    pub use_case: String,
    /// Always within 1..=5.
    pub score: u8,
    pub score_reason: String,
    /// Set by selection, never by summarization.
    pub is_top_pick: bool,
    /// Present only for degraded summaries.
    pub failure_reason: Option<String>,
}

impl ProjectSummary {
    /// A summary built from a parsed model response.
    ///
    /// Fields the model left empty get placeholder text. An empty headline
    /// falls back to the repository description.
    #[must_use]
    pub fn from_payload(repo: Arc<RepositoryRecord>, payload: SummaryPayload) -> Self {
        let headline = match (payload.headline.is_empty(), repo.description().trim()) {
            (false, _) => payload.headline,
            (true, "") => MISSING_HEADLINE.to_string(),
            (true, description) => description.to_string(),
        };
        let core_features = if payload.core_features.is_empty() {
            vec![MISSING_FEATURE.to_string()]
        } else {
            payload.core_features
        };

        Self {
            repo,
            headline,
            core_features,
            use_case: or_placeholder(payload.use_case, UNAVAILABLE_USE_CASE),
            score: payload.score.clamp(1, 5),
            score_reason: or_placeholder(payload.score_reason, MISSING_SCORE_REASON),
            is_top_pick: false,
            failure_reason: None,
        }
    }

    /// A placeholder summary with every field filled.
    ///
    /// The headline falls back to the repository description. `parse_failure`
    /// selects the wording for unparsable responses over failed calls.
    #[must_use]
    pub fn degraded(
        repo: Arc<RepositoryRecord>,
        reason: impl Into<String>,
        parse_failure: bool,
    ) -> Self {
        let (fallback_headline, feature) = if parse_failure {
            (PARSE_FAILED_HEADLINE, PARSE_FAILED_FEATURE)
        } else {
            (CALL_FAILED_HEADLINE, CALL_FAILED_FEATURE)
        };
        let headline = match repo.description().trim() {
            "" => fallback_headline.to_string(),
            description => description.to_string(),
        };

        Self {
            repo,
            headline,
            core_features: vec![feature.to_string()],
            use_case: UNAVAILABLE_USE_CASE.to_string(),
            score: DEGRADED_SCORE,
            score_reason: UNAVAILABLE_SCORE_REASON.to_string(),
            is_top_pick: false,
            failure_reason: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.failure_reason.is_some()
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}
