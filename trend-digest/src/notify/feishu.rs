//! Feishu (Lark) interactive card.

use super::{limit, Notifier};
use crate::format::{star_rating, thousands};
use crate::summary::ProjectSummary;
use chrono::NaiveDate;
use serde_json::{json, Value};

pub struct FeishuNotifier {
    webhook_url: String,
}

impl FeishuNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
        }
    }
}

impl Notifier for FeishuNotifier {
    fn name(&self) -> &'static str {
        "feishu"
    }

    fn endpoint(&self) -> &str {
        &self.webhook_url
    }

    fn build_payload(&self, summaries: &[ProjectSummary], date: NaiveDate) -> Value {
        let summaries = limit(summaries);

        let mut elements = vec![
            json!({
                "tag": "div",
                "text": {
                    "tag": "lark_md",
                    "content": format!(
                        "🔥 **GitHub Daily Picks** | {}\nFound {} projects",
                        date.format("%Y-%m-%d"),
                        summaries.len()
                    ),
                },
            }),
            json!({ "tag": "hr" }),
        ];

        for summary in summaries {
            let repo = &summary.repo;
            elements.push(json!({
                "tag": "div",
                "text": {
                    "tag": "lark_md",
                    "content": format!(
                        "**[{}]({})**\n{}\n{} | {} | ⭐{}",
                        repo.name(),
                        repo.url(),
                        summary.headline,
                        star_rating(summary.score),
                        repo.language(),
                        thousands(repo.stars()),
                    ),
                },
            }));
            elements.push(json!({ "tag": "hr" }));
        }

        json!({
            "msg_type": "interactive",
            "card": {
                "header": {
                    "title": { "tag": "plain_text", "content": "🚀 GitHub Daily Trends" },
                    "template": "blue",
                },
                "elements": elements,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::{date, summaries};

    #[test]
    fn builds_interactive_card() {
        let notifier = FeishuNotifier::new("https://open.feishu.cn/hook/abc");
        let payload = notifier.build_payload(&summaries(2), date());

        assert_eq!(payload["msg_type"], "interactive");
        assert_eq!(payload["card"]["header"]["template"], "blue");

        let elements = payload["card"]["elements"].as_array().unwrap();
        // header, hr, then a div and hr per summary
        assert_eq!(elements.len(), 6);
        assert_eq!(
            elements[0]["text"]["content"],
            "🔥 **GitHub Daily Picks** | 2026-03-10\nFound 2 projects"
        );
        assert_eq!(
            elements[2]["text"]["content"],
            "**[owner/repo-0](https://github.com/owner/repo-0)**\nHeadline 0\n⭐⭐⭐⭐ | Rust | ⭐12,345"
        );
    }
}
