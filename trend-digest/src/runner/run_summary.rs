//! Run summary types.

use crate::acquisition::SourceTag;
use crate::notify::DeliveryReport;
use std::path::PathBuf;

/// Summary of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of repositories acquired.
    pub repositories: usize,

    /// Which acquisition path produced them.
    pub source_tag: SourceTag,

    pub top_picks: usize,
    pub quick_looks: usize,

    /// Summaries that fell back to placeholder text.
    pub degraded: usize,

    /// Where the report was written; `None` for dry runs or when saving failed.
    pub report_path: Option<PathBuf>,

    /// One entry per notification platform.
    pub deliveries: Vec<DeliveryReport>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates an empty summary for the given source.
    #[must_use]
    pub fn new(source_tag: SourceTag, dry_run: bool) -> Self {
        Self {
            repositories: 0,
            source_tag,
            top_picks: 0,
            quick_looks: 0,
            degraded: 0,
            report_path: None,
            deliveries: Vec::new(),
            dry_run,
        }
    }

    /// Returns true if every summary is degraded.
    #[must_use]
    pub fn all_degraded(&self) -> bool {
        self.repositories > 0 && self.degraded == self.repositories
    }

    /// Deliveries that did not go through.
    pub fn failed_deliveries(&self) -> impl Iterator<Item = &DeliveryReport> {
        self.deliveries.iter().filter(|d| !d.delivered)
    }
}

/// Summary of an article run.
#[derive(Debug, Clone)]
pub struct ArticleSummary {
    /// The repository the article is about (`owner/repo`).
    pub repository: String,
    pub source_tag: SourceTag,
    /// Characters in the generated article.
    pub chars: usize,
    /// Where the article was written; `None` for dry runs.
    pub article_path: Option<PathBuf>,
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(repositories: usize, degraded: usize) -> RunSummary {
        RunSummary {
            repositories,
            degraded,
            ..RunSummary::new(SourceTag::PrimaryScrape, false)
        }
    }

    #[test]
    fn all_degraded_needs_every_summary() {
        assert!(summary(3, 3).all_degraded());
        assert!(!summary(3, 2).all_degraded());
        assert!(!summary(0, 0).all_degraded());
    }

    #[test]
    fn lists_failed_deliveries() {
        let mut run = summary(1, 0);
        run.deliveries = vec![
            DeliveryReport {
                platform: "slack",
                delivered: true,
                error: None,
            },
            DeliveryReport {
                platform: "telegram",
                delivered: false,
                error: Some("telegram returned HTTP 401: Unauthorized".to_string()),
            },
        ];

        let failed: Vec<_> = run.failed_deliveries().map(|d| d.platform).collect();
        assert_eq!(failed, vec!["telegram"]);
    }
}
