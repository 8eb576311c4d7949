//! Runner error types.

use crate::acquisition::AcquisitionError;
use crate::article::ArticleError;
use crate::config::ConfigError;
use crate::llm::LlmError;
use crate::notify::NotifyError;
use crate::templates::{ReportError, TemplateError};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Invalid settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Both acquisition methods failed.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// An LLM tier could not be constructed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The built-in templates failed to compile.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The notification client could not be constructed.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// No tier produced the requested article.
    #[error(transparent)]
    Article(#[from] ArticleError),

    /// The article could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Acquisition succeeded but returned nothing to summarize.
    #[error("No trending repositories were found")]
    NoRepositories,
}
