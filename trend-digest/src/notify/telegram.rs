//! Telegram Bot API `sendMessage` with HTML formatting.

use super::{limit, Notifier};
use crate::format::{star_rating, thousands};
use crate::summary::ProjectSummary;
use chrono::NaiveDate;
use serde_json::{json, Value};

/// Telegram Bot API base URL.
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: impl Into<String>) -> Self {
        Self {
            endpoint: format!("{TELEGRAM_API_URL}/bot{bot_token}/sendMessage"),
            chat_id: chat_id.into(),
        }
    }
}

/// Escapes text for Telegram's HTML parse mode.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_payload(&self, summaries: &[ProjectSummary], date: NaiveDate) -> Value {
        let mut lines = vec![
            format!("<b>🔥 GitHub Daily Trends | {}</b>", date.format("%Y-%m-%d")),
            String::new(),
        ];

        for summary in limit(summaries) {
            let repo = &summary.repo;
            lines.push(format!(
                "<b><a href=\"{}\">{}</a></b>",
                escape_html(repo.url()),
                escape_html(repo.name())
            ));
            lines.push(format!("<i>{}</i>", escape_html(&summary.headline)));
            lines.push(format!(
                "{} | {} | ⭐{}",
                star_rating(summary.score),
                escape_html(repo.language()),
                thousands(repo.stars())
            ));
            lines.push(String::new());
        }

        json!({
            "chat_id": self.chat_id,
            "text": lines.join("\n"),
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        })
    }
}
