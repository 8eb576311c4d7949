//! Settings loading.
//!
//! Settings are resolved once at startup and passed by value into each
//! component. Environment variables take precedence over the settings file,
//! which takes precedence over defaults.

mod error;
mod file;

pub use error::ConfigError;

use crate::acquisition::{TrendingQuery, TrendingRange};
use crate::llm::{ProviderConfig, ProviderKind, DEFAULT_SUMMARY_LANGUAGE};
use file::SettingsFile;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "trend-digest.toml";

/// Allowed range for `max_repos`.
pub const MAX_REPOS_RANGE: std::ops::RangeInclusive<usize> = 1..=25;

/// Allowed range for `top_pick_count`.
pub const TOP_PICK_RANGE: std::ops::RangeInclusive<usize> = 1..=5;

/// LLM tier settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub primary: Option<ProviderConfig>,
    pub secondary: Option<ProviderConfig>,
    /// Language the summaries are written in.
    pub summary_language: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            primary: None,
            secondary: None,
            summary_language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
        }
    }
}

/// Webhook settings; a platform is enabled when its settings are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifySettings {
    pub feishu_webhook_url: Option<String>,
    pub dingtalk_webhook_url: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub trending: TrendingQuery,
    pub max_repos: usize,
    pub top_pick_count: usize,
    pub fetch_readme: bool,
    pub github_token: Option<String>,
    pub reports_dir: PathBuf,
    pub llm: LlmSettings,
    pub notify: NotifySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trending: TrendingQuery::default(),
            max_repos: 15,
            top_pick_count: 3,
            fetch_readme: true,
            github_token: None,
            reports_dir: PathBuf::from("reports"),
            llm: LlmSettings::default(),
            notify: NotifySettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the process environment and a settings file.
    ///
    /// # Arguments
    ///
    /// * `path` - Explicit settings file. When `None`, [`DEFAULT_SETTINGS_FILE`]
    ///   is read if it exists in the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, a file cannot be read
    /// or parsed, or a value fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::MissingFile {
                    path: path.display().to_string(),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_SETTINGS_FILE)).filter(|p| p.exists()),
        };

        let parsed = match &file {
            Some(path) => {
                info!(path = %path.display(), "Loading settings file");
                SettingsFile::read(path)?
            }
            None => {
                debug!("No settings file, using environment and defaults");
                SettingsFile::default()
            }
        };

        Self::from_sources(parsed, |key| std::env::var(key).ok())
    }

    /// Resolves settings from a parsed file and an environment lookup.
    fn from_sources<F>(file: SettingsFile, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let language = env("TRENDING_LANGUAGE")
            .or(file.trending.language)
            .filter(|l| !l.trim().is_empty());
        let since = match env("TRENDING_SINCE") {
            Some(raw) => raw
                .parse::<TrendingRange>()
                .map_err(|message| ConfigError::invalid("since", message))?,
            None => file.trending.since.unwrap_or_default(),
        };

        let max_repos = match env("MAX_REPOS") {
            Some(raw) => parse_number("max_repos", &raw)?,
            None => file.max_repos.unwrap_or(defaults.max_repos),
        };
        let top_pick_count = match env("TOP_PICK_COUNT") {
            Some(raw) => parse_number("top_pick_count", &raw)?,
            None => file.top_pick_count.unwrap_or(defaults.top_pick_count),
        };
        let fetch_readme = match env("FETCH_README") {
            Some(raw) => parse_bool("fetch_readme", &raw)?,
            None => file.fetch_readme.unwrap_or(defaults.fetch_readme),
        };

        let llm = LlmSettings {
            primary: resolve_primary(file.llm.primary, &env),
            secondary: resolve_secondary(file.llm.secondary, &env),
            summary_language: env("SUMMARY_LANGUAGE")
                .or(file.llm.summary_language)
                .unwrap_or(defaults.llm.summary_language),
        };

        let notify = NotifySettings {
            feishu_webhook_url: env("FEISHU_WEBHOOK_URL").or(file.notify.feishu_webhook_url),
            dingtalk_webhook_url: env("DINGTALK_WEBHOOK_URL").or(file.notify.dingtalk_webhook_url),
            slack_webhook_url: env("SLACK_WEBHOOK_URL").or(file.notify.slack_webhook_url),
            telegram_bot_token: env("TELEGRAM_BOT_TOKEN").or(file.notify.telegram_bot_token),
            telegram_chat_id: env("TELEGRAM_CHAT_ID").or(file.notify.telegram_chat_id),
        };

        let settings = Self {
            trending: TrendingQuery { language, since },
            max_repos,
            top_pick_count,
            fetch_readme,
            github_token: env("GITHUB_TOKEN").or(file.github_token),
            reports_dir: env("REPORTS_DIR")
                .map(PathBuf::from)
                .or(file.reports_dir)
                .unwrap_or(defaults.reports_dir),
            llm,
            notify,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !MAX_REPOS_RANGE.contains(&self.max_repos) {
            return Err(ConfigError::invalid(
                "max_repos",
                format!("{} is outside 1..=25", self.max_repos),
            ));
        }
        if !TOP_PICK_RANGE.contains(&self.top_pick_count) {
            return Err(ConfigError::invalid(
                "top_pick_count",
                format!("{} is outside 1..=5", self.top_pick_count),
            ));
        }
        Ok(())
    }
}

/// Primary tier: the file's table, else Gemini, else an OpenAI-compatible
/// endpoint, whichever has a key in the environment.
fn resolve_primary(
    configured: Option<ProviderConfig>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Option<ProviderConfig> {
    let mut config = configured.or_else(|| {
        if env(ProviderKind::Gemini.api_key_env()).is_some() {
            Some(ProviderConfig::new(ProviderKind::Gemini, None))
        } else if env(ProviderKind::OpenAi.api_key_env()).is_some() {
            Some(ProviderConfig::new(ProviderKind::OpenAi, None))
        } else {
            None
        }
    })?;

    if let Some(model) = env("LLM_MODEL") {
        config = config.with_model(model);
    }
    if config.provider == ProviderKind::OpenAi {
        if let Some(base_url) = env("OPENAI_BASE_URL") {
            config.base_url = Some(base_url);
        }
    }
    Some(with_env_key(config, env))
}

/// Secondary tier: the file's table, else Anthropic when its key is set.
fn resolve_secondary(
    configured: Option<ProviderConfig>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Option<ProviderConfig> {
    let mut config = configured.or_else(|| {
        env(ProviderKind::Anthropic.api_key_env())
            .map(|_| ProviderConfig::new(ProviderKind::Anthropic, None))
    })?;

    if let Some(model) = env("FALLBACK_MODEL") {
        config = config.with_model(model);
    }
    Some(with_env_key(config, env))
}

fn with_env_key(
    mut config: ProviderConfig,
    env: &dyn Fn(&str) -> Option<String>,
) -> ProviderConfig {
    if config.api_key().is_none() {
        config.api_key = env(config.provider.api_key_env());
    }
    config
}

fn parse_number(field: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::invalid(field, format!("'{raw}' is not a positive integer")))
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(field, format!("'{raw}' is not a boolean"))),
    }
}
