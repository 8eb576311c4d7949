//! DingTalk markdown message.

use super::{limit, Notifier};
use crate::format::{star_rating, thousands};
use crate::summary::ProjectSummary;
use chrono::NaiveDate;
use serde_json::{json, Value};

const TITLE: &str = "GitHub Daily Trends";

pub struct DingTalkNotifier {
    webhook_url: String,
}

impl DingTalkNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
        }
    }
}

impl Notifier for DingTalkNotifier {
    fn name(&self) -> &'static str {
        "dingtalk"
    }

    fn endpoint(&self) -> &str {
        &self.webhook_url
    }

    fn build_payload(&self, summaries: &[ProjectSummary], date: NaiveDate) -> Value {
        let mut lines = vec![format!("## 🔥 {TITLE} ({})", date.format("%Y-%m-%d")), String::new()];

        for summary in limit(summaries) {
            let repo = &summary.repo;
            lines.push(format!("### [{}]({})", repo.name(), repo.url()));
            lines.push(format!("> {}", summary.headline));
            lines.push(format!(
                "- Language: {} | Stars: {}",
                repo.language(),
                thousands(repo.stars())
            ));
            lines.push(format!("- Rating: {}", star_rating(summary.score)));
            lines.push(format!("- Use case: {}", summary.use_case));
            lines.push(String::new());
        }

        json!({
            "msgtype": "markdown",
            "markdown": {
                "title": TITLE,
                "text": lines.join("\n"),
            },
        })
    }
}
