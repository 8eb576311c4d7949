//! Acquisition of the trending repository list.
//!
//! The trending page is scraped first. If that fails after retries, or the
//! page parses into nothing, the search API is queried instead. Only when both
//! fail is acquisition an error. README enrichment runs afterwards and never
//! fails.

mod error;
mod readme;
mod search;
mod source;
mod trending;

pub use error::AcquisitionError;
pub use readme::{fetch_readme, README_CANDIDATES};
pub use search::{build_search_query, SEARCH_WINDOW_DAYS};
pub use source::{GitHubSource, HttpGitHubSource, RAW_CONTENT_URL};
pub use trending::{
    build_trending_url, parse_trending_html, TrendingQuery, TrendingRange, GITHUB_URL,
    TRENDING_URL, UNKNOWN_LANGUAGE,
};

use crate::repository::RepositoryRecord;
use crate::retry::RetryPolicy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Which acquisition path produced the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTag {
    /// The trending page was scraped.
    PrimaryScrape,
    /// The search API fallback was used; no growth signal is available.
    SecondaryApi,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryScrape => "primary-scrape",
            Self::SecondaryApi => "secondary-api",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`AcquisitionPipeline::acquire`].
#[derive(Debug, Clone)]
pub struct AcquisitionResult {
    /// Records in source ranking order.
    pub repositories: Vec<RepositoryRecord>,
    pub source_tag: SourceTag,
    pub timestamp: DateTime<Utc>,
}

/// Parameters for one acquisition.
#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    pub query: TrendingQuery,
    /// Result cap, 1 to 25.
    pub max_repos: usize,
    pub fetch_readme: bool,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            query: TrendingQuery::default(),
            max_repos: 15,
            fetch_readme: true,
        }
    }
}

/// Drives a [`GitHubSource`] through scrape, fallback and enrichment.
pub struct AcquisitionPipeline<S> {
    source: S,
    settings: AcquisitionSettings,
    retry: RetryPolicy,
    readme_retry: RetryPolicy,
}

impl<S: GitHubSource> AcquisitionPipeline<S> {
    /// Creates a pipeline with the standard retry policies.
    pub fn new(source: S, settings: AcquisitionSettings) -> Self {
        Self {
            source,
            settings,
            retry: RetryPolicy::standard(),
            readme_retry: RetryPolicy::readme(),
        }
    }

    /// Overrides both the listing and README retry policies.
    #[must_use]
    pub fn with_retry_policy(mut self, listing: RetryPolicy, readme: RetryPolicy) -> Self {
        self.retry = listing;
        self.readme_retry = readme;
        self
    }

    /// Acquires the repository list.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::Exhausted`] when both the trending scrape
    /// and the search API fail.
    pub async fn acquire(&self) -> Result<AcquisitionResult, AcquisitionError> {
        let (repositories, source_tag) = match self.scrape_trending().await {
            Ok(records) => (records, SourceTag::PrimaryScrape),
            Err(primary) => {
                warn!(error = %primary, "Trending scrape failed, falling back to search API");
                match self.search_recent().await {
                    Ok(records) if !records.is_empty() => (records, SourceTag::SecondaryApi),
                    Ok(_) => {
                        return Err(AcquisitionError::Exhausted {
                            primary: Box::new(primary),
                            secondary: Box::new(AcquisitionError::EmptyListing),
                        })
                    }
                    Err(secondary) => {
                        return Err(AcquisitionError::Exhausted {
                            primary: Box::new(primary),
                            secondary: Box::new(secondary),
                        })
                    }
                }
            }
        };

        info!(
            count = repositories.len(),
            source = %source_tag,
            "Acquired repositories"
        );

        let repositories = if self.settings.fetch_readme {
            self.enrich(repositories).await
        } else {
            repositories
        };

        Ok(AcquisitionResult {
            repositories,
            source_tag,
            timestamp: Utc::now(),
        })
    }

    /// Fetches one record's README outside the enrichment pass.
    pub async fn readme_for(&self, record: &RepositoryRecord) -> Option<String> {
        fetch_readme(&self.source, record, &self.readme_retry).await
    }

    async fn scrape_trending(&self) -> Result<Vec<RepositoryRecord>, AcquisitionError> {
        let html = self
            .retry
            .run(
                "trending",
                || self.source.fetch_trending(&self.settings.query),
                AcquisitionError::is_transient,
            )
            .await?;

        let records = parse_trending_html(&html, self.settings.max_repos);
        if records.is_empty() {
            return Err(AcquisitionError::EmptyListing);
        }
        Ok(records)
    }

    async fn search_recent(&self) -> Result<Vec<RepositoryRecord>, AcquisitionError> {
        let query = build_search_query(
            self.settings.query.language.as_deref(),
            Utc::now().date_naive(),
        );
        let limit = self.settings.max_repos;

        let mut records = self
            .retry
            .run(
                "search",
                || self.source.search_repositories(&query, limit),
                AcquisitionError::is_transient,
            )
            .await?;
        records.truncate(limit);
        Ok(records)
    }

    async fn enrich(&self, repositories: Vec<RepositoryRecord>) -> Vec<RepositoryRecord> {
        let mut enriched = Vec::with_capacity(repositories.len());
        for record in repositories {
            let record = match fetch_readme(&self.source, &record, &self.readme_retry).await {
                Some(text) => record.with_readme_excerpt(text),
                None => record,
            };
            enriched.push(record);
        }
        enriched
    }
}
