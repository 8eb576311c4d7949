//! Repository records produced by acquisition.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while constructing a [`RepositoryRecord`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The name is not in `owner/repo` form.
    #[error("Invalid repository name '{0}': expected 'owner/repo'")]
    InvalidName(String),
}

/// One discovered project.
///
/// Fields are private so a record cannot change once it has been handed to
/// summarization; the README excerpt is attached through
/// [`RepositoryRecord::with_readme_excerpt`] before that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRecord {
    name: String,
    url: String,
    description: String,
    language: String,
    stars: u64,
    stars_today: u64,
    readme_excerpt: String,
}

impl RepositoryRecord {
    /// Creates a record, validating that `name` is `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidName`] when the name does not contain
    /// exactly one `/` with non-empty segments on both sides.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        language: impl Into<String>,
        stars: u64,
        stars_today: u64,
    ) -> Result<Self, RecordError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(RecordError::InvalidName(name));
        }

        Ok(Self {
            name,
            url: url.into(),
            description: description.into(),
            language: language.into(),
            stars,
            stars_today,
            readme_excerpt: String::new(),
        })
    }

    /// Returns the record with its README excerpt attached.
    #[must_use]
    pub fn with_readme_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.readme_excerpt = excerpt.into();
        self
    }

    /// Full name in `owner/repo` form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner segment of the name.
    pub fn owner(&self) -> &str {
        self.name.split_once('/').map_or("", |(owner, _)| owner)
    }

    /// Repository segment of the name.
    pub fn repo_name(&self) -> &str {
        self.name.split_once('/').map_or("", |(_, repo)| repo)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Total star count.
    pub fn stars(&self) -> u64 {
        self.stars
    }

    /// Stars gained in the trending window; 0 when the source cannot tell.
    pub fn stars_today(&self) -> u64 {
        self.stars_today
    }

    /// Raw README text, empty when none could be fetched.
    pub fn readme_excerpt(&self) -> &str {
        &self.readme_excerpt
    }
}

/// Checks the `owner/repo` invariant.
pub(crate) fn is_valid_name(name: &str) -> bool {
    match name.split_once('/') {
        Some((owner, repo)) => !owner.is_empty() && !repo.is_empty() && !repo.contains('/'),
        None => false,
    }
}
