//! Orchestrates one digest run: acquire, summarize, report, notify.

mod error;
mod run_summary;

pub use error::RunnerError;
pub use run_summary::{ArticleSummary, RunSummary};

use crate::acquisition::{AcquisitionPipeline, AcquisitionSettings, GitHubSource, HttpGitHubSource};
use crate::article::ArticleGenerator;
use crate::config::Settings;
use crate::llm::Summarizer;
use crate::notify::NotificationManager;
use crate::retry::RetryPolicy;
use crate::templates::{save_article, save_report, TemplateRenderer};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Per-invocation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print the report instead of saving it, and send nothing.
    pub dry_run: bool,
}

/// Runs the digest against a [`GitHubSource`].
pub struct Runner<S = HttpGitHubSource> {
    pipeline: AcquisitionPipeline<S>,
    summarizer: Summarizer,
    renderer: TemplateRenderer,
    notifier: NotificationManager,
    top_pick_count: usize,
    reports_dir: PathBuf,
}

impl Runner {
    /// Builds a runner talking to GitHub over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or a client cannot be
    /// constructed.
    pub fn new(settings: Settings) -> Result<Self, RunnerError> {
        settings.validate()?;

        let source = HttpGitHubSource::new(settings.github_token.as_deref())?;
        let summarizer = Summarizer::from_settings(&settings.llm)?;
        let notifier = NotificationManager::from_settings(&settings.notify)?;

        Self::from_parts(source, summarizer, notifier, &settings)
    }
}

impl<S: GitHubSource> Runner<S> {
    /// Builds a runner from already-constructed components.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in templates fail to compile.
    pub fn from_parts(
        source: S,
        summarizer: Summarizer,
        notifier: NotificationManager,
        settings: &Settings,
    ) -> Result<Self, RunnerError> {
        let pipeline = AcquisitionPipeline::new(
            source,
            AcquisitionSettings {
                query: settings.trending.clone(),
                max_repos: settings.max_repos,
                fetch_readme: settings.fetch_readme,
            },
        );

        Ok(Self {
            pipeline,
            summarizer,
            renderer: TemplateRenderer::new()?,
            notifier,
            top_pick_count: settings.top_pick_count,
            reports_dir: settings.reports_dir.clone(),
        })
    }

    /// Overrides the listing and README retry policies.
    #[must_use]
    pub fn with_acquisition_retry(mut self, listing: RetryPolicy, readme: RetryPolicy) -> Self {
        self.pipeline = self.pipeline.with_retry_policy(listing, readme);
        self
    }

    /// Executes the full flow.
    ///
    /// # Errors
    ///
    /// Returns an error when acquisition is exhausted or finds nothing.
    /// Report and notification failures are logged and recorded instead.
    pub async fn run(&self, options: RunOptions) -> Result<RunSummary, RunnerError> {
        let acquisition = self.pipeline.acquire().await?;
        if acquisition.repositories.is_empty() {
            return Err(RunnerError::NoRepositories);
        }

        let mut summary = RunSummary::new(acquisition.source_tag, options.dry_run);
        summary.repositories = acquisition.repositories.len();

        if !self.summarizer.is_configured() {
            warn!("Running without an LLM tier");
        }
        let outcome = self
            .summarizer
            .summarize_all(acquisition.repositories.clone(), self.top_pick_count)
            .await;
        summary.top_picks = outcome.top_picks.len();
        summary.quick_looks = outcome.quick_looks.len();
        summary.degraded = outcome.degraded_count();

        let date = acquisition.timestamp.date_naive();
        match self.renderer.render_report(&acquisition, &outcome) {
            Ok(report) if options.dry_run => {
                println!("{report}");
            }
            Ok(report) => match save_report(&self.reports_dir, date, &report) {
                Ok(path) => summary.report_path = Some(path),
                Err(e) => error!(error = %e, "Failed to save report"),
            },
            Err(e) => error!(error = %e, "Failed to render report"),
        }

        if options.dry_run {
            info!(
                platforms = ?self.notifier.platforms(),
                "Dry run, skipping notifications"
            );
        } else {
            summary.deliveries = self.notifier.notify(&outcome, date).await;
        }

        Ok(summary)
    }

    /// Writes a long-form article about the top trending repository.
    ///
    /// The candidate's README is fetched here when enrichment was skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when acquisition fails, no tier produces an article,
    /// or the article cannot be saved.
    pub async fn run_article(
        &self,
        generator: &ArticleGenerator,
        options: RunOptions,
    ) -> Result<ArticleSummary, RunnerError> {
        let acquisition = self.pipeline.acquire().await?;
        let date = acquisition.timestamp.date_naive();
        let Some(candidate) = acquisition.repositories.into_iter().next() else {
            return Err(RunnerError::NoRepositories);
        };
        info!(
            repo = candidate.name(),
            stars_today = candidate.stars_today(),
            url = candidate.url(),
            "Selected article candidate"
        );

        let candidate = if candidate.readme_excerpt().is_empty() {
            match self.pipeline.readme_for(&candidate).await {
                Some(readme) => candidate.with_readme_excerpt(readme),
                None => {
                    warn!(repo = candidate.name(), "No README found, writing from metadata");
                    candidate
                }
            }
        } else {
            candidate
        };

        let article = generator.generate(&candidate).await?;

        // Dry runs print instead of writing
        let article_path = if options.dry_run {
            println!("{article}");
            None
        } else {
            Some(save_article(&self.reports_dir, date, candidate.name(), &article)?)
        };

        Ok(ArticleSummary {
            repository: candidate.name().to_string(),
            source_tag: acquisition.source_tag,
            chars: article.chars().count(),
            article_path,
            dry_run: options.dry_run,
        })
    }
}
