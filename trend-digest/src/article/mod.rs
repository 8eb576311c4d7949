//! Long-form articles about a single trending repository.
//!
//! Articles go through the same provider tiers as summaries, but the answer is
//! free-form markdown and the prompt carries the whole README.

mod error;
mod prompt;

pub use error::ArticleError;
pub use prompt::{article_system_prompt, build_article_prompt};

use crate::config::LlmSettings;
use crate::llm::{LlmError, SummarizeError, TierChain, DEFAULT_SUMMARY_LANGUAGE};
use crate::repository::RepositoryRecord;
use crate::retry::RetryPolicy;
use tracing::info;

/// Writes articles through a [`TierChain`].
pub struct ArticleGenerator {
    tiers: TierChain,
    retry: RetryPolicy,
    language: String,
}

impl ArticleGenerator {
    pub fn new(tiers: TierChain) -> Self {
        Self {
            tiers,
            retry: RetryPolicy::standard(),
            language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
        }
    }

    /// Builds the tiers from settings, writing in the summary language.
    ///
    /// # Errors
    ///
    /// Returns an error if a model client cannot be constructed.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let mut generator = Self::new(TierChain::from_settings(settings)?);
        if !settings.summary_language.trim().is_empty() {
            generator.language = settings.summary_language.clone();
        }
        Ok(generator)
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.tiers.is_configured()
    }

    /// Generates the article markdown for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ArticleError::Generation`] when no tier produced an article.
    pub async fn generate(&self, record: &RepositoryRecord) -> Result<String, ArticleError> {
        info!(repo = record.name(), "Generating article");
        let system = article_system_prompt(&self.language);
        let prompt = build_article_prompt(record, &self.language);

        let article = self
            .retry
            .run(
                "article",
                || self.tiers.call(&system, &prompt, |text| Ok(text.trim().to_string())),
                SummarizeError::is_retryable,
            )
            .await?;

        info!(repo = record.name(), chars = article.chars().count(), "Article generated");
        Ok(article)
    }
}
