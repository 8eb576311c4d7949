//! Fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use trend_digest::{
    AcquisitionError, GitHubSource, LlmError, LlmProvider, RepositoryRecord, TrendingQuery,
};

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

pub fn unavailable(url: &str) -> AcquisitionError {
    failing(url, 503)
}

pub fn failing(url: &str, status: u16) -> AcquisitionError {
    AcquisitionError::Status {
        url: url.to_string(),
        status,
    }
}

/// Scripted GitHub: fixed answers per endpoint, with call recording.
#[derive(Default)]
pub struct FakeGitHub {
    pub trending_html: Option<String>,
    pub search_results: Option<Vec<RepositoryRecord>>,
    pub structured_readmes: HashMap<String, String>,
    pub raw_files: HashMap<String, String>,
    /// Status every content-endpoint README call fails with.
    pub readme_failure: Option<u16>,
    /// Status every raw-file request fails with.
    pub raw_failure: Option<u16>,
    pub trending_calls: AtomicUsize,
    pub readme_calls: AtomicUsize,
    pub search_queries: Mutex<Vec<String>>,
    pub raw_requests: Mutex<Vec<String>>,
}

impl FakeGitHub {
    /// Serves the trending fixture page.
    pub fn trending() -> Self {
        Self {
            trending_html: Some(fixture("trending.html")),
            ..Self::default()
        }
    }
}

#[async_trait]
impl GitHubSource for FakeGitHub {
    async fn fetch_trending(&self, _query: &TrendingQuery) -> Result<String, AcquisitionError> {
        self.trending_calls.fetch_add(1, Ordering::SeqCst);
        self.trending_html
            .clone()
            .ok_or_else(|| unavailable("https://github.com/trending"))
    }

    async fn search_repositories(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RepositoryRecord>, AcquisitionError> {
        self.search_queries.lock().unwrap().push(query.to_string());
        match &self.search_results {
            Some(records) => Ok(records.iter().take(limit).cloned().collect()),
            None => Err(unavailable("https://api.github.com/search/repositories")),
        }
    }

    async fn fetch_readme(
        &self,
        record: &RepositoryRecord,
    ) -> Result<Option<String>, AcquisitionError> {
        self.readme_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.readme_failure {
            let url = format!("https://api.github.com/repos/{}/readme", record.name());
            return Err(failing(&url, status));
        }
        Ok(self.structured_readmes.get(record.name()).cloned())
    }

    async fn fetch_raw_file(
        &self,
        record: &RepositoryRecord,
        file_name: &str,
    ) -> Result<Option<String>, AcquisitionError> {
        let key = format!("{}/{file_name}", record.name());
        self.raw_requests.lock().unwrap().push(file_name.to_string());
        if let Some(status) = self.raw_failure {
            return Err(failing(&format!("https://raw.githubusercontent.com/{key}"), status));
        }
        Ok(self.raw_files.get(&key).cloned())
    }
}

/// Lets a test keep a handle on the fake after a pipeline takes ownership.
pub struct SharedSource(pub Arc<FakeGitHub>);

#[async_trait]
impl GitHubSource for SharedSource {
    async fn fetch_trending(&self, query: &TrendingQuery) -> Result<String, AcquisitionError> {
        self.0.fetch_trending(query).await
    }

    async fn search_repositories(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RepositoryRecord>, AcquisitionError> {
        self.0.search_repositories(query, limit).await
    }

    async fn fetch_readme(
        &self,
        record: &RepositoryRecord,
    ) -> Result<Option<String>, AcquisitionError> {
        self.0.fetch_readme(record).await
    }

    async fn fetch_raw_file(
        &self,
        record: &RepositoryRecord,
        file_name: &str,
    ) -> Result<Option<String>, AcquisitionError> {
        self.0.fetch_raw_file(record, file_name).await
    }
}

pub fn search_record(name: &str, stars: u64) -> RepositoryRecord {
    RepositoryRecord::new(
        name,
        format!("https://github.com/{name}"),
        "Fresh project",
        "Rust",
        stars,
        0,
    )
    .unwrap()
}

/// LLM tier that answers per repository, keyed by the name in the prompt.
///
/// Repositories without a scripted score time out.
pub struct FakeModel {
    pub name: &'static str,
    pub scores: HashMap<&'static str, u8>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeModel {
    pub fn new(name: &'static str, scores: &[(&'static str, u8)]) -> Self {
        Self {
            name,
            scores: scores.iter().copied().collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl LlmProvider for FakeModel {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn invoke(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hit = self
            .scores
            .iter()
            .find(|(repo, _)| prompt.contains(&format!("**Name**: {repo}\n")));

        match hit {
            Some((repo, score)) => Ok(format!(
                "```json\n{{\"one_liner_cn\": \"{repo} by {}\", \"core_features\": [\"Fast\", \"Small\"], \
                 \"use_case\": \"Daily work\", \"score\": {score}, \"score_reason\": \"Solid\"}}\n```",
                self.name
            )),
            None => Err(LlmError::Timeout {
                provider: self.name,
                secs: 60,
            }),
        }
    }
}
