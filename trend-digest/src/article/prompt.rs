//! Article prompts.

use crate::format::thousands;
use crate::llm::EMPTY_README;
use crate::repository::RepositoryRecord;

/// Builds the writer persona for long-form articles.
#[must_use]
pub fn article_system_prompt(language: &str) -> String {
    format!(
        "You are a popular tech blogger with a large developer audience. You write in \
{language}.\n\
\n\
Your style:\n\
1. Catchy headlines that still promise real substance\n\
2. Plain explanations of complex code, with analogies\n\
3. Light humor and generous emoji 🚀🔥\n\
4. Clear structure with the key points in bold\n\
5. Depth: your own opinions and a hands-on demo, not a README translation\n\
\n\
Write a high-quality article about the GitHub project the user describes."
    )
}

/// Builds the article request. The README is sent in full.
#[must_use]
pub fn build_article_prompt(record: &RepositoryRecord, language: &str) -> String {
    let description = if record.description().trim().is_empty() {
        "No description"
    } else {
        record.description()
    };
    let readme = match record.readme_excerpt().trim() {
        "" => EMPTY_README,
        text => text,
    };

    format!(
        "Analyze the GitHub project below and write an article of about 2000 words.\n\
\n\
**Name**: {name}\n\
**URL**: {url}\n\
**Description**: {description}\n\
**Stars**: {stars}\n\
\n\
**README**:\n\
```\n\
{readme}\n\
```\n\
\n\
Requirements:\n\
1. Open with a single, compelling title.\n\
2. Sections:\n\
   - 🫣 The pain point: start from a problem developers hit every day\n\
   - 😎 The project: what it is, in one sentence\n\
   - ✨ Core features: 3-5 highlights and why each one matters\n\
   - 👨‍💻 Hands-on: install and usage examples based on the README\n\
   - 🚀 When to use it: who needs it and in which situations\n\
   - 🤔 Verdict: is it worth adopting, and where is it heading\n\
3. Markdown, key points in bold, code blocks tagged with their language.\n\
\n\
Write the article in {language}.",
        name = record.name(),
        url = record.url(),
        stars = thousands(record.stars()),
    )
}
