//! Remote data sources for acquisition.

use crate::acquisition::error::AcquisitionError;
use crate::acquisition::search::{page_size, records_from_search};
use crate::acquisition::trending::{build_trending_url, TrendingQuery};
use crate::repository::RepositoryRecord;
use async_trait::async_trait;
use octocrab::Octocrab;
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Base URL for raw repository files.
pub const RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Browser identities rotated across trending-page requests.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

/// Picks a client identity for the next request.
pub(crate) fn rotate_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Everything acquisition needs from GitHub.
///
/// Implementations perform a single attempt per call; retries are applied by
/// the pipeline.
#[async_trait]
pub trait GitHubSource: Send + Sync {
    /// Fetches the raw HTML of the trending listing.
    async fn fetch_trending(&self, query: &TrendingQuery) -> Result<String, AcquisitionError>;

    /// Runs a repository search sorted by stars descending.
    async fn search_repositories(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RepositoryRecord>, AcquisitionError>;

    /// Fetches the README through the structured content endpoint, decoded.
    ///
    /// Returns `Ok(None)` when the repository has no README there.
    async fn fetch_readme(
        &self,
        record: &RepositoryRecord,
    ) -> Result<Option<String>, AcquisitionError>;

    /// Fetches a raw file from the default branch; `Ok(None)` when absent.
    async fn fetch_raw_file(
        &self,
        record: &RepositoryRecord,
        file_name: &str,
    ) -> Result<Option<String>, AcquisitionError>;
}

/// [`GitHubSource`] over HTTPS: `reqwest` for HTML and raw files, `octocrab`
/// for the REST API.
pub struct HttpGitHubSource {
    client: Client,
    octocrab: Octocrab,
}

impl HttpGitHubSource {
    /// Builds the source, authenticating API calls when a token is given.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be constructed.
    pub fn new(github_token: Option<&str>) -> Result<Self, AcquisitionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(AcquisitionError::Client)?;

        let mut builder = Octocrab::builder();
        if let Some(token) = github_token.filter(|t| !t.is_empty()) {
            builder = builder.personal_token(token.to_string());
        }
        let octocrab = builder.build()?;

        Ok(Self { client, octocrab })
    }

    /// GETs a URL with a rotated identity, mapping 404 to `None`.
    async fn get_text(&self, url: &str) -> Result<Option<String>, AcquisitionError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, rotate_user_agent())
            .send()
            .await
            .map_err(|source| AcquisitionError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AcquisitionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| AcquisitionError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(Some(body))
    }
}

#[async_trait]
impl GitHubSource for HttpGitHubSource {
    async fn fetch_trending(&self, query: &TrendingQuery) -> Result<String, AcquisitionError> {
        let url = build_trending_url(query);
        debug!(url = %url, "Fetching trending page");
        // A missing trending page is a hard failure, not an empty README.
        self.get_text(&url)
            .await?
            .ok_or(AcquisitionError::Status { url, status: 404 })
    }

    async fn search_repositories(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RepositoryRecord>, AcquisitionError> {
        debug!(query, limit, "Executing repository search");
        let page = self
            .octocrab
            .search()
            .repositories(query)
            .sort("stars")
            .order("desc")
            .per_page(page_size(limit))
            .send()
            .await?;
        Ok(records_from_search(page.items, limit))
    }

    async fn fetch_readme(
        &self,
        record: &RepositoryRecord,
    ) -> Result<Option<String>, AcquisitionError> {
        match self
            .octocrab
            .repos(record.owner(), record.repo_name())
            .get_readme()
            .send()
            .await
        {
            Ok(content) => Ok(content.decoded_content()),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_raw_file(
        &self,
        record: &RepositoryRecord,
        file_name: &str,
    ) -> Result<Option<String>, AcquisitionError> {
        let url = format!("{RAW_CONTENT_URL}/{}/HEAD/{file_name}", record.name());
        self.get_text(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_through_known_identities() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&rotate_user_agent()));
        }
    }
}
