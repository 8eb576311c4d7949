//! Best-effort README enrichment.

use crate::acquisition::source::GitHubSource;
use crate::repository::RepositoryRecord;
use crate::retry::RetryPolicy;
use tracing::debug;

/// Raw file names tried, in order, when the content endpoint has nothing.
pub const README_CANDIDATES: &[&str] = &["README.md", "readme.md", "README", "readme.rst"];

/// Fetches README text for a record, or `None` when no README could be read.
///
/// Errors never escape: the structured endpoint is tried first (retried on
/// transient failures), then each raw-file candidate once.
pub async fn fetch_readme<S>(
    source: &S,
    record: &RepositoryRecord,
    retry: &RetryPolicy,
) -> Option<String>
where
    S: GitHubSource + ?Sized,
{
    let structured = retry
        .run(
            "readme",
            || source.fetch_readme(record),
            |error| error.is_transient(),
        )
        .await;

    match structured {
        Ok(Some(text)) if !text.trim().is_empty() => return Some(text),
        Ok(_) => debug!(repo = record.name(), "Content endpoint returned no README"),
        Err(e) => debug!(repo = record.name(), error = %e, "Content endpoint failed"),
    }

    for file_name in README_CANDIDATES {
        match source.fetch_raw_file(record, file_name).await {
            Ok(Some(text)) if !text.trim().is_empty() => return Some(text),
            Ok(_) => {}
            Err(e) => {
                debug!(repo = record.name(), file = file_name, error = %e, "Raw README request failed");
            }
        }
    }

    debug!(repo = record.name(), "No README found");
    None
}
