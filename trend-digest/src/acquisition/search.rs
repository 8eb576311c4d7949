//! Search API fallback: query construction and response mapping.
//!
//! The search API has no notion of a daily star delta, so every record it
//! produces carries `stars_today == 0`.

use crate::acquisition::trending::{GITHUB_URL, UNKNOWN_LANGUAGE};
use crate::repository::RepositoryRecord;
use chrono::{Duration, NaiveDate};
use octocrab::models::Repository;
use tracing::warn;

/// How far back the `created:>` filter reaches.
pub const SEARCH_WINDOW_DAYS: i64 = 7;

/// Builds the search query for recently created repositories.
///
/// Format: `created:>{today - 7 days}[ language:{language}]`
#[must_use]
pub fn build_search_query(language: Option<&str>, today: NaiveDate) -> String {
    let since = today - Duration::days(SEARCH_WINDOW_DAYS);
    let mut query = format!("created:>{}", since.format("%Y-%m-%d"));
    if let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) {
        query.push_str(" language:");
        query.push_str(language);
    }
    query
}

/// Page size requested from the search API; it never exceeds the result cap.
pub(crate) fn page_size(limit: usize) -> u8 {
    u8::try_from(limit.clamp(1, 100)).unwrap_or(100)
}

/// Maps search hits to records, keeping API order and at most `limit`.
///
/// Hits whose name violates the `owner/repo` invariant are dropped with a warning.
pub(crate) fn records_from_search(items: Vec<Repository>, limit: usize) -> Vec<RepositoryRecord> {
    items
        .into_iter()
        .filter_map(|item| {
            let name = item.full_name.unwrap_or(item.name);
            let url = item
                .html_url
                .map(|u| u.to_string())
                .unwrap_or_else(|| format!("{GITHUB_URL}/{name}"));
            let language = item
                .language
                .as_ref()
                .and_then(|l| l.as_str())
                .filter(|l| !l.is_empty())
                .unwrap_or(UNKNOWN_LANGUAGE)
                .to_string();

            match RepositoryRecord::new(
                name.clone(),
                url,
                item.description.unwrap_or_default(),
                language,
                u64::from(item.stargazers_count.unwrap_or(0)),
                0,
            ) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(name = %name, error = %e, "Dropping malformed search result");
                    None
                }
            }
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_search_query() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(build_search_query(None, today), "created:>2026-03-03");
        assert_eq!(
            build_search_query(Some("rust"), today),
            "created:>2026-03-03 language:rust"
        );
        assert_eq!(build_search_query(Some("  "), today), "created:>2026-03-03");
    }

    #[test]
    fn maps_search_hits_without_growth_signal() {
        let items: Vec<Repository> = serde_json::from_str(
            r#"[
                {"id": 1, "name": "one", "full_name": "a/one",
                 "url": "https://api.github.com/repos/a/one",
                 "html_url": "https://github.com/a/one",
                 "description": "First", "stargazers_count": 900, "language": "Rust"},
                {"id": 2, "name": "broken",
                 "url": "https://api.github.com/repos/broken",
                 "description": null, "stargazers_count": 800, "language": null},
                {"id": 3, "name": "two", "full_name": "b/two",
                 "url": "https://api.github.com/repos/b/two",
                 "description": null, "language": null}
            ]"#,
        )
        .unwrap();

        let records = records_from_search(items, 15);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "a/one");
        assert_eq!(records[0].url(), "https://github.com/a/one");
        assert_eq!(records[0].stars(), 900);
        assert_eq!(records[1].url(), "https://github.com/b/two");
        assert_eq!(records[1].description(), "");
        assert_eq!(records[1].stars(), 0);
        assert_eq!(records[1].language(), UNKNOWN_LANGUAGE);
        assert!(records.iter().all(|r| r.stars_today() == 0));
    }

    #[test]
    fn page_size_tracks_limit() {
        assert_eq!(page_size(15), 15);
        assert_eq!(page_size(0), 1);
        assert_eq!(page_size(500), 100);
    }
}
