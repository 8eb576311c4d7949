//! LLM error types.

use serdes_ai::agent::AgentRunError;
use thiserror::Error;

/// Errors from a single provider call or from decoding its answer.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The model client could not be built.
    #[error("Model error: {0}")]
    Model(#[from] serdes_ai_models::ModelError),

    /// The agent run failed (transport, provider status or protocol error).
    #[error("{provider} run failed: {source}")]
    AgentRun {
        provider: &'static str,
        #[source]
        source: AgentRunError,
    },

    /// No answer arrived within the tier's timeout.
    #[error("{provider} timed out after {secs} seconds")]
    Timeout { provider: &'static str, secs: u64 },

    /// The model answered with blank text.
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },

    /// The model's text was not valid JSON.
    #[error("Failed to decode summary JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The model's JSON did not have the expected shape.
    #[error("Invalid summary payload: {0}")]
    InvalidPayload(String),
}

impl LlmError {
    /// Returns true when the model answered but its content was unusable.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::InvalidPayload(_))
    }
}

/// Errors from one call through the provider tiers.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Neither tier has credentials.
    #[error("No LLM provider is configured")]
    NotConfigured,

    /// The primary tier failed and there is no secondary tier.
    #[error("Primary provider failed and no fallback is configured: {0}")]
    PrimaryFailedNoFallback(#[source] LlmError),

    /// The last tier tried failed.
    #[error("{provider} failed: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: LlmError,
    },
}

impl SummarizeError {
    /// Missing configuration cannot be fixed by retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotConfigured)
    }

    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        match self {
            Self::NotConfigured => false,
            Self::PrimaryFailedNoFallback(source) | Self::Provider { source, .. } => {
                source.is_parse_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_is_final() {
        assert!(!SummarizeError::NotConfigured.is_retryable());
        assert!(!SummarizeError::NotConfigured.is_parse_error());
    }

    #[test]
    fn parse_errors_are_classified_through_tiers() {
        let error = SummarizeError::Provider {
            provider: "anthropic",
            source: LlmError::InvalidPayload("expected a JSON object".to_string()),
        };
        assert!(error.is_retryable());
        assert!(error.is_parse_error());

        let error = SummarizeError::PrimaryFailedNoFallback(LlmError::Timeout {
            provider: "gemini",
            secs: 60,
        });
        assert!(!error.is_parse_error());
    }
}
