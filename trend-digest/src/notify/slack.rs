//! Slack Block Kit message.

use super::{limit, Notifier};
use crate::format::{star_rating, thousands};
use crate::summary::ProjectSummary;
use chrono::NaiveDate;
use serde_json::{json, Value};

pub struct SlackNotifier {
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
        }
    }
}

impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn endpoint(&self) -> &str {
        &self.webhook_url
    }

    fn build_payload(&self, summaries: &[ProjectSummary], date: NaiveDate) -> Value {
        let mut blocks = vec![
            json!({
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("🔥 GitHub Daily Trends - {}", date.format("%Y-%m-%d")),
                },
            }),
            json!({ "type": "divider" }),
        ];

        blocks.extend(limit(summaries).iter().map(|summary| {
            let repo = &summary.repo;
            json!({
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!(
                        "*<{}|{}>*\n{}\n{} | {} | ⭐ {}",
                        repo.url(),
                        repo.name(),
                        summary.headline,
                        star_rating(summary.score),
                        repo.language(),
                        thousands(repo.stars()),
                    ),
                },
            })
        }));

        json!({ "blocks": blocks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::{date, summaries};

    #[test]
    fn builds_blocks() {
        let notifier = SlackNotifier::new("https://hooks.slack.com/services/T/B/X");
        let payload = notifier.build_payload(&summaries(2), date());

        let blocks = payload["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0]["text"]["text"], "🔥 GitHub Daily Trends - 2026-03-10");
        assert_eq!(blocks[1]["type"], "divider");
        assert_eq!(
            blocks[3]["text"]["text"],
            "*<https://github.com/owner/repo-1|owner/repo-1>*\nHeadline 1\n⭐⭐⭐⭐ | Rust | ⭐ 12,345"
        );
    }
}
