//! Prompt construction.

use crate::format::thousands;
use crate::repository::RepositoryRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum README characters sent to the model.
pub const MAX_README_CHARS: usize = 2000;

/// Appended after a cut README.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Substituted for a missing or image-only README.
pub const EMPTY_README: &str = "(README is empty)";

/// Output language used when none is configured.
pub const DEFAULT_SUMMARY_LANGUAGE: &str = "English";

static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| pattern(r"!\[.*?\]\(.*?\)"));
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)<img[^>]*>"));

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static README pattern is a valid regex")
}

/// Builds the fixed system instruction.
///
/// The required JSON shape and the scoring rubric are part of the
/// instruction; `language` selects the language of the generated prose.
#[must_use]
pub fn system_prompt(language: &str) -> String {
    format!(
        "You are a technical writer and open-source analyst. Analyze a GitHub project and \
produce a concise, insightful summary written in {language}.\n\
\n\
Focus on:\n\
1. The core problem the project solves\n\
2. Technical highlights and innovations\n\
3. Who the project is for\n\
4. How mature and active the project looks\n\
\n\
Reply with exactly this JSON object and nothing else (no markdown code fences):\n\
{{\n\
    \"one_liner_cn\": \"a playful one-sentence teaser, at most 20 words, emoji allowed\",\n\
    \"core_features\": [\"feature 1\", \"feature 2\", \"feature 3\"],\n\
    \"use_case\": \"who should use it and which pain point it removes, at most 50 words\",\n\
    \"score\": 4,\n\
    \"score_reason\": \"reason for the score, at most 20 words\"\n\
}}\n\
\n\
Scoring (score 1-5):\n\
- 5: groundbreaking, strongly recommended\n\
- 4: excellent, worth following\n\
- 3: solid, useful for specific scenarios\n\
- 2: ordinary, worth a glance\n\
- 1: early-stage or niche tool"
    )
}

/// Builds the per-repository user prompt.
#[must_use]
pub fn build_user_prompt(record: &RepositoryRecord, language: &str) -> String {
    let description = if record.description().trim().is_empty() {
        "No description"
    } else {
        record.description()
    };
    let stars_today = match record.stars_today() {
        0 => "N/A".to_string(),
        n => thousands(n),
    };

    format!(
        "Analyze the following GitHub project:\n\
\n\
**Name**: {name}\n\
**URL**: {url}\n\
**Description**: {description}\n\
**Language**: {repo_language}\n\
**Stars**: {stars}\n\
**Stars today**: {stars_today}\n\
\n\
**README (excerpt)**:\n\
```\n\
{readme}\n\
```\n\
\n\
Write the analysis in {language} and return the required JSON object.",
        name = record.name(),
        url = record.url(),
        repo_language = record.language(),
        stars = thousands(record.stars()),
        readme = truncate_readme(record.readme_excerpt()),
    )
}

/// Strips image markup, then keeps at most [`MAX_README_CHARS`] characters.
#[must_use]
pub fn truncate_readme(content: &str) -> String {
    let without_markdown = MARKDOWN_IMAGE.replace_all(content, "");
    let stripped = HTML_IMAGE.replace_all(&without_markdown, "");
    let stripped = stripped.trim();

    if stripped.is_empty() {
        return EMPTY_README.to_string();
    }

    match stripped.char_indices().nth(MAX_README_CHARS) {
        Some((cut, _)) => format!("{}\n{TRUNCATION_MARKER}", stripped[..cut].trim_end()),
        None => stripped.to_string(),
    }
}
