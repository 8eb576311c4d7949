//! Provider configuration and construction.

use crate::llm::error::LlmError;
use crate::llm::provider::{LlmProvider, ModelProvider};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Gemini.
    Gemini,
    /// Anthropic Claude.
    Anthropic,
    /// OpenAI, or any compatible endpoint through `base-url`.
    #[serde(alias = "openai")]
    OpenAi,
}

impl ProviderKind {
    /// Provider name as serdes-ai knows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::Anthropic => "claude-3-5-haiku-20241022",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one provider tier, as written in the `[llm.primary]`
/// or `[llm.secondary]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    /// Model name (e.g., "gemini-2.5-flash").
    pub model: String,
    /// API key; falls back to the provider's environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl ProviderConfig {
    /// A configuration with the provider's default model and no overrides.
    #[must_use]
    pub fn new(provider: ProviderKind, api_key: Option<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key,
            base_url: None,
            timeout_secs: None,
            temperature: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Endpoint override; `None` keeps the provider's default.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Builds the provider for a tier.
///
/// # Returns
///
/// `Ok(None)` when the tier has no API key, which disables it.
///
/// # Errors
///
/// Returns an error if the model client cannot be constructed.
pub fn build_provider(config: &ProviderConfig) -> Result<Option<Box<dyn LlmProvider>>, LlmError> {
    let Some(api_key) = config.api_key() else {
        warn!(
            provider = %config.provider,
            env = config.provider.api_key_env(),
            "No API key for provider, tier disabled"
        );
        return Ok(None);
    };

    let provider = ModelProvider::new(config, api_key)?;
    info!(provider = %config.provider, model = %config.model, "LLM tier enabled");
    Ok(Some(Box::new(provider)))
}
