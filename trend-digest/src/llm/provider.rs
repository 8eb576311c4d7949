//! The provider capability and its serdes-ai implementation.

use crate::llm::config::{ProviderConfig, ProviderKind};
use crate::llm::error::LlmError;
use async_trait::async_trait;
use serdes_ai::{agent::AgentBuilder, Agent};
use serdes_ai_models::{build_model_with_config, Model};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One LLM tier: a system instruction and a user prompt in, text out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs and errors.
    fn name(&self) -> &'static str;

    /// Sends one request and returns the model's raw text.
    async fn invoke(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// A tier backed by a serdes-ai model.
pub struct ModelProvider {
    kind: ProviderKind,
    model: Arc<dyn Model>,
    model_name: String,
    temperature: f64,
    timeout: Duration,
}

impl ModelProvider {
    /// Builds the model client for a configured tier.
    ///
    /// # Errors
    ///
    /// Returns an error if serdes-ai rejects the provider settings.
    pub fn new(config: &ProviderConfig, api_key: &str) -> Result<Self, LlmError> {
        let timeout = config.timeout();
        let model = build_model_with_config(
            config.provider.as_str(),
            &config.model,
            Some(api_key),
            config.base_url(),
            Some(timeout),
        )?;

        Ok(Self {
            kind: config.provider,
            model,
            model_name: config.model.clone(),
            temperature: config.temperature(),
            timeout,
        })
    }

    /// A plain-text agent for one system instruction.
    fn agent(&self, system: &str) -> Agent<(), String> {
        AgentBuilder::from_arc(Arc::clone(&self.model))
            .system_prompt(system.to_string())
            .temperature(self.temperature)
            .build()
    }
}

#[async_trait]
impl LlmProvider for ModelProvider {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn invoke(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let provider = self.name();
        debug!(provider, model = %self.model_name, "Invoking model");

        let agent = self.agent(system);
        let result = tokio::time::timeout(self.timeout, agent.run(prompt.to_string(), ()))
            .await
            .map_err(|_| LlmError::Timeout {
                provider,
                secs: self.timeout.as_secs(),
            })?
            .map_err(|source| LlmError::AgentRun { provider, source })?;

        let text = result.output;
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse { provider });
        }
        Ok(text)
    }
}
