//! Article error types.

use crate::llm::SummarizeError;
use thiserror::Error;

/// Errors that stop an article from being produced.
#[derive(Debug, Error)]
pub enum ArticleError {
    /// Every tier failed or none is configured.
    #[error("Failed to generate article: {0}")]
    Generation(#[from] SummarizeError),
}
