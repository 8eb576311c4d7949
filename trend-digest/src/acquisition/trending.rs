//! GitHub Trending page: URL construction and HTML parsing.
//!
//! The trending page is unversioned markup, so parsing is tolerant: each
//! `article.Box-row` block is read independently and a block without a
//! resolvable `owner/repo` link is skipped rather than failing the page.

use crate::repository::RepositoryRecord;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Base URL of the trending listing.
pub const TRENDING_URL: &str = "https://github.com/trending";

/// Base URL used to build repository links.
pub const GITHUB_URL: &str = "https://github.com";

/// Language reported when a block has no language element.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

static ROW: LazyLock<Selector> = LazyLock::new(|| selector("article.Box-row"));
static NAME_LINK: LazyLock<Selector> = LazyLock::new(|| selector("h2 a"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static STARGAZERS: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[href$="/stargazers"]"#));
static LANGUAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[itemprop="programmingLanguage"]"#));
static STARS_TODAY: LazyLock<Selector> =
    LazyLock::new(|| selector("span.d-inline-block.float-sm-right"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static trending selector is valid CSS")
}

/// Time window of the trending listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingRange {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TrendingRange {
    /// Value of the `since` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for TrendingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!(
                "unknown trending range '{other}', expected daily, weekly or monthly"
            )),
        }
    }
}

/// What to ask the trending page for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendingQuery {
    /// Language path segment (e.g. "rust"); `None` lists all languages.
    pub language: Option<String>,
    /// Time window.
    pub since: TrendingRange,
}

/// Builds the trending listing URL.
///
/// The language is a path segment; `since` is only sent for non-daily windows.
#[must_use]
pub fn build_trending_url(query: &TrendingQuery) -> String {
    let mut url = match Url::parse(TRENDING_URL) {
        Ok(url) => url,
        Err(_) => return TRENDING_URL.to_string(),
    };

    if let Some(language) = query.language.as_deref().filter(|l| !l.trim().is_empty()) {
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(language.trim());
        }
    }

    if query.since != TrendingRange::Daily {
        url.query_pairs_mut().append_pair("since", query.since.as_str());
    }

    url.to_string()
}

/// Parses the trending page into at most `max_repos` records, in page order.
#[must_use]
pub fn parse_trending_html(html: &str, max_repos: usize) -> Vec<RepositoryRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for block in document.select(&ROW) {
        if records.len() >= max_repos {
            break;
        }
        match parse_block(block) {
            Some(record) => records.push(record),
            None => debug!("Skipping trending block without a resolvable repository name"),
        }
    }

    records
}

/// Parses one `article.Box-row` block.
fn parse_block(block: ElementRef<'_>) -> Option<RepositoryRecord> {
    let href = block.select(&NAME_LINK).next()?.value().attr("href")?;
    let name = href.trim().trim_matches('/');

    let description = block
        .select(&DESCRIPTION)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let stars = block
        .select(&STARGAZERS)
        .next()
        .and_then(|el| parse_count(&element_text(el)))
        .unwrap_or(0);

    let language = block
        .select(&LANGUAGE)
        .next()
        .map(element_text)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    // Format: "1,234 stars today"
    let stars_today = block
        .select(&STARS_TODAY)
        .next()
        .map(element_text)
        .and_then(|text| text.split_whitespace().next().and_then(parse_count))
        .unwrap_or(0);

    RepositoryRecord::new(
        name,
        format!("{GITHUB_URL}/{name}"),
        description,
        language,
        stars,
        stars_today,
    )
    .ok()
}

/// Collects an element's text with whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a count like "12,345".
fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}
