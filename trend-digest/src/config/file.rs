//! On-disk settings file (`trend-digest.toml`).
//!
//! Every key is optional; absent keys fall through to defaults. Keys use
//! kebab-case:
//!
//! ```toml
//! max-repos = 15
//! top-pick-count = 3
//!
//! [trending]
//! language = "rust"
//! since = "weekly"
//!
//! [llm]
//! summary-language = "English"
//!
//! [llm.primary]
//! provider = "gemini"
//! model = "gemini-2.5-flash"
//!
//! [llm.secondary]
//! provider = "anthropic"
//! model = "claude-3-5-haiku-20241022"
//!
//! [notify]
//! slack-webhook-url = "https://hooks.slack.com/services/..."
//! ```

use super::error::ConfigError;
use crate::acquisition::TrendingRange;
use crate::llm::ProviderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct SettingsFile {
    pub github_token: Option<String>,
    pub max_repos: Option<usize>,
    pub top_pick_count: Option<usize>,
    pub fetch_readme: Option<bool>,
    pub reports_dir: Option<PathBuf>,
    #[serde(default)]
    pub trending: TrendingFile,
    #[serde(default)]
    pub llm: LlmFile,
    #[serde(default)]
    pub notify: NotifyFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct TrendingFile {
    pub language: Option<String>,
    pub since: Option<TrendingRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct LlmFile {
    pub summary_language: Option<String>,
    pub primary: Option<ProviderConfig>,
    pub secondary: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub(crate) struct NotifyFile {
    pub feishu_webhook_url: Option<String>,
    pub dingtalk_webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl SettingsFile {
    /// Reads and parses a settings file.
    pub(crate) fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlError {
            path: path.display().to_string(),
            source,
        })
    }
}
