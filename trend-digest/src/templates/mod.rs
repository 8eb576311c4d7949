//! Markdown rendering and report output.
//!
//! Summaries and the daily report are rendered with Handlebars. Reports are
//! written as one file per day.

mod error;
mod renderer;

pub use error::{ReportError, TemplateError};
pub use renderer::{create_handlebars_registry, TemplateRenderer};

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generates the report file name for a day.
///
/// Format: "github-trending-{YYYY-MM-DD}.md"
#[must_use]
pub fn report_file_name(date: NaiveDate) -> String {
    format!("github-trending-{}.md", date.format("%Y-%m-%d"))
}

/// Generates the article file name for a repository.
///
/// Format: "ARTICLE_{YYYY-MM-DD}_{owner}_{repo}.md"
#[must_use]
pub fn article_file_name(date: NaiveDate, repo_name: &str) -> String {
    format!(
        "ARTICLE_{}_{}.md",
        date.format("%Y-%m-%d"),
        repo_name.replace('/', "_")
    )
}

/// Writes a report into `dir`, creating the directory if needed.
///
/// An existing report for the same day is overwritten.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn save_report(dir: &Path, date: NaiveDate, content: &str) -> Result<PathBuf, ReportError> {
    let path = write_markdown(dir, &report_file_name(date), content)?;
    info!(path = %path.display(), bytes = content.len(), "Report saved");
    Ok(path)
}

/// Writes a repository article next to the daily reports.
///
/// # Errors
///
/// Same as [`save_report`].
pub fn save_article(
    dir: &Path,
    date: NaiveDate,
    repo_name: &str,
    content: &str,
) -> Result<PathBuf, ReportError> {
    let path = write_markdown(dir, &article_file_name(date, repo_name), content)?;
    info!(path = %path.display(), bytes = content.len(), "Article saved");
    Ok(path)
}

fn write_markdown(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;

    let path = dir.join(file_name);
    std::fs::write(&path, content).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}
