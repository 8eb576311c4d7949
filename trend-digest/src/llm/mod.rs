//! Summarization through a primary and a secondary LLM tier.
//!
//! Each call goes to the primary tier first and falls through to the
//! secondary tier when the primary is absent or fails, including when its
//! answer cannot be parsed. The whole tiered call is retried. A repository
//! whose summarization still fails gets a degraded placeholder, so the batch
//! always yields one summary per repository.

mod chain;
mod config;
mod error;
mod prompt;
mod provider;
mod response;

pub use chain::TierChain;
pub use config::{build_provider, ProviderConfig, ProviderKind};
pub use error::{LlmError, SummarizeError};
pub use prompt::{
    build_user_prompt, system_prompt, truncate_readme, DEFAULT_SUMMARY_LANGUAGE, EMPTY_README,
    MAX_README_CHARS, TRUNCATION_MARKER,
};
pub use provider::{LlmProvider, ModelProvider};
pub use response::{parse_summary_payload, strip_code_fence, SummaryPayload, DEFAULT_SCORE};

use crate::config::LlmSettings;
use crate::repository::RepositoryRecord;
use crate::retry::RetryPolicy;
use crate::summary::{categorize, ProjectSummary, SummarizationOutcome};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// The summarization fallback chain.
pub struct Summarizer {
    tiers: TierChain,
    retry: RetryPolicy,
    language: String,
}

impl Summarizer {
    /// Creates a summarizer from already-built tiers.
    pub fn new(
        primary: Option<Box<dyn LlmProvider>>,
        secondary: Option<Box<dyn LlmProvider>>,
    ) -> Self {
        Self::with_tiers(TierChain::new(primary, secondary))
    }

    /// Creates a summarizer over an existing tier chain.
    pub fn with_tiers(tiers: TierChain) -> Self {
        Self {
            tiers,
            retry: RetryPolicy::standard(),
            language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
        }
    }

    /// Builds both tiers from settings; a tier without an API key is left out.
    ///
    /// # Errors
    ///
    /// Returns an error if a model client cannot be constructed.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let tiers = TierChain::from_settings(settings)?;
        if !tiers.is_configured() {
            warn!("No LLM tier is configured, every summary will be degraded");
        }

        Ok(Self::with_tiers(tiers).with_language(settings.summary_language.clone()))
    }

    /// Overrides the retry policy for the whole tiered call.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the language the summaries are written in.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.trim().is_empty() {
            self.language = language;
        }
        self
    }

    pub fn is_configured(&self) -> bool {
        self.tiers.is_configured()
    }

    /// Summarizes one repository. Never fails: errors become a degraded summary.
    pub async fn summarize(&self, repo: Arc<RepositoryRecord>) -> ProjectSummary {
        let system = system_prompt(&self.language);
        let prompt = build_user_prompt(&repo, &self.language);

        let result = self
            .retry
            .run(
                "summarize",
                || self.tiers.call(&system, &prompt, parse_summary_payload),
                SummarizeError::is_retryable,
            )
            .await;

        match result {
            Ok(payload) => ProjectSummary::from_payload(repo, payload),
            Err(e) if e.is_parse_error() => {
                error!(repo = repo.name(), error = %e, "Failed to parse LLM response");
                ProjectSummary::degraded(repo, format!("JSON parse error: {e}"), true)
            }
            Err(e) => {
                error!(repo = repo.name(), error = %e, "LLM call failed");
                ProjectSummary::degraded(repo, e.to_string(), false)
            }
        }
    }

    /// Summarizes every repository in order, then selects the top picks.
    pub async fn summarize_all(
        &self,
        repos: Vec<RepositoryRecord>,
        top_pick_count: usize,
    ) -> SummarizationOutcome {
        let total = repos.len();
        let mut summaries = Vec::with_capacity(total);

        for (index, record) in repos.into_iter().enumerate() {
            let repo = Arc::new(record);
            let span = info_span!(
                "summarize",
                repo = %repo.name(),
                position = index + 1,
                total
            );
            info!(parent: &span, "Summarizing repository");
            summaries.push(self.summarize(repo).instrument(span).await);
        }

        let outcome = categorize(summaries, top_pick_count);
        info!(
            top_picks = outcome.top_picks.len(),
            quick_looks = outcome.quick_looks.len(),
            degraded = outcome.degraded_count(),
            "Summarization complete"
        );
        outcome
    }
}
