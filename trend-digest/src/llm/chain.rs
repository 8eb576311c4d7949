//! Primary then secondary tier ordering.

use crate::config::LlmSettings;
use crate::llm::config::build_provider;
use crate::llm::error::{LlmError, SummarizeError};
use crate::llm::provider::LlmProvider;
use tracing::warn;

/// The ordered provider tiers shared by summaries and articles.
pub struct TierChain {
    primary: Option<Box<dyn LlmProvider>>,
    secondary: Option<Box<dyn LlmProvider>>,
}

impl TierChain {
    pub fn new(
        primary: Option<Box<dyn LlmProvider>>,
        secondary: Option<Box<dyn LlmProvider>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Builds both tiers from settings; a tier without an API key is left out.
    ///
    /// # Errors
    ///
    /// Returns an error if a model client cannot be constructed.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let primary = match &settings.primary {
            Some(config) => build_provider(config)?,
            None => None,
        };
        let secondary = match &settings.secondary {
            Some(config) => build_provider(config)?,
            None => None,
        };
        Ok(Self::new(primary, secondary))
    }

    pub fn is_configured(&self) -> bool {
        self.primary.is_some() || self.secondary.is_some()
    }

    /// One attempt through the tiers.
    ///
    /// The secondary tier runs when the primary is absent, fails, or its text
    /// is rejected by `parse`.
    pub async fn call<T, F>(
        &self,
        system: &str,
        prompt: &str,
        parse: F,
    ) -> Result<T, SummarizeError>
    where
        F: Fn(&str) -> Result<T, LlmError>,
    {
        let primary_error = match &self.primary {
            Some(primary) => match invoke(primary.as_ref(), system, prompt, &parse).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(provider = primary.name(), error = %e, "Primary tier failed");
                    Some(e)
                }
            },
            None => None,
        };

        match (&self.secondary, primary_error) {
            (Some(secondary), _) => invoke(secondary.as_ref(), system, prompt, &parse)
                .await
                .map_err(|source| SummarizeError::Provider {
                    provider: secondary.name(),
                    source,
                }),
            (None, Some(e)) => Err(SummarizeError::PrimaryFailedNoFallback(e)),
            (None, None) => Err(SummarizeError::NotConfigured),
        }
    }
}

async fn invoke<T, F>(
    provider: &dyn LlmProvider,
    system: &str,
    prompt: &str,
    parse: &F,
) -> Result<T, LlmError>
where
    F: Fn(&str) -> Result<T, LlmError>,
{
    let text = provider.invoke(system, prompt).await?;
    parse(&text)
}
