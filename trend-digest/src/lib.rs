#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod acquisition;
pub mod article;
pub mod config;
pub mod format;
pub mod llm;
pub mod notify;
pub mod repository;
pub mod retry;
pub mod runner;
pub mod summary;
pub mod templates;

pub use acquisition::{
    AcquisitionError, AcquisitionPipeline, AcquisitionResult, AcquisitionSettings, GitHubSource,
    HttpGitHubSource, SourceTag, TrendingQuery, TrendingRange,
};
pub use article::{ArticleError, ArticleGenerator};
pub use config::{ConfigError, LlmSettings, NotifySettings, Settings};
pub use llm::{
    LlmError, LlmProvider, ModelProvider, ProviderConfig, ProviderKind, SummarizeError,
    Summarizer, TierChain,
};
pub use notify::{DeliveryReport, NotificationManager, Notifier, NotifyError};
pub use repository::{RecordError, RepositoryRecord};
pub use retry::RetryPolicy;
pub use runner::{ArticleSummary, RunOptions, RunSummary, Runner, RunnerError};
pub use summary::{categorize, ProjectSummary, SummarizationOutcome};
pub use templates::{save_article, save_report, ReportError, TemplateError, TemplateRenderer};
