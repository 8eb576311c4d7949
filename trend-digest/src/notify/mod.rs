//! Webhook notifications.
//!
//! Each chat platform is a [`Notifier`] that knows its endpoint and how to
//! shape a message. [`NotificationManager`] owns the HTTP client and posts to
//! every enabled platform in turn. A failed delivery is reported, never raised.

mod dingtalk;
mod error;
mod feishu;
mod slack;
mod telegram;

pub use dingtalk::DingTalkNotifier;
pub use error::NotifyError;
pub use feishu::FeishuNotifier;
pub use slack::SlackNotifier;
pub use telegram::{TelegramNotifier, TELEGRAM_API_URL};

use crate::config::NotifySettings;
use crate::retry::RetryPolicy;
use crate::summary::{ProjectSummary, SummarizationOutcome};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

/// Most summaries included in one message.
pub const MAX_SUMMARIES: usize = 5;

/// Request timeout for webhook calls.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// One chat platform.
pub trait Notifier: Send + Sync {
    /// Platform name for logs and delivery reports.
    fn name(&self) -> &'static str;

    /// URL the payload is posted to.
    fn endpoint(&self) -> &str;

    /// Shapes the message body. Only the first [`MAX_SUMMARIES`] entries of
    /// `summaries` are included.
    fn build_payload(&self, summaries: &[ProjectSummary], date: NaiveDate) -> Value;
}

pub(crate) fn limit(summaries: &[ProjectSummary]) -> &[ProjectSummary] {
    &summaries[..summaries.len().min(MAX_SUMMARIES)]
}

/// Outcome of posting to one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub platform: &'static str,
    pub delivered: bool,
    pub error: Option<String>,
}

/// Posts digests to every enabled platform.
pub struct NotificationManager {
    client: Client,
    notifiers: Vec<Box<dyn Notifier>>,
    retry: RetryPolicy,
}

impl NotificationManager {
    /// Creates a manager for the given platforms.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(NotifyError::Client)?;

        Ok(Self {
            client,
            notifiers,
            retry: RetryPolicy::fixed(3, Duration::from_secs(2)),
        })
    }

    /// Enables each platform whose settings are present. Telegram needs both
    /// the bot token and the chat id.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(settings: &NotifySettings) -> Result<Self, NotifyError> {
        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

        if let Some(url) = &settings.feishu_webhook_url {
            notifiers.push(Box::new(FeishuNotifier::new(url)));
        }
        if let Some(url) = &settings.dingtalk_webhook_url {
            notifiers.push(Box::new(DingTalkNotifier::new(url)));
        }
        if let Some(url) = &settings.slack_webhook_url {
            notifiers.push(Box::new(SlackNotifier::new(url)));
        }
        match (&settings.telegram_bot_token, &settings.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                notifiers.push(Box::new(TelegramNotifier::new(token, chat_id)));
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("Telegram needs both a bot token and a chat id, skipping");
            }
            (None, None) => {}
        }

        Self::new(notifiers)
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Names of the enabled platforms.
    pub fn platforms(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Posts the outcome's notification candidates to every platform.
    ///
    /// Returns one report per platform, or nothing when no platform is
    /// enabled or there is nothing to send.
    pub async fn notify(
        &self,
        outcome: &SummarizationOutcome,
        date: NaiveDate,
    ) -> Vec<DeliveryReport> {
        if self.notifiers.is_empty() {
            info!("No notification platforms configured, skipping");
            return Vec::new();
        }

        let candidates = outcome.notification_candidates();
        if candidates.is_empty() {
            info!("No summaries to send, skipping notifications");
            return Vec::new();
        }

        let mut reports = Vec::with_capacity(self.notifiers.len());
        for notifier in &self.notifiers {
            let payload = notifier.build_payload(candidates, date);
            let report = match self.deliver(notifier.as_ref(), &payload).await {
                Ok(()) => {
                    info!(platform = notifier.name(), "Notification sent");
                    DeliveryReport {
                        platform: notifier.name(),
                        delivered: true,
                        error: None,
                    }
                }
                Err(e) => {
                    error!(platform = notifier.name(), error = %e, "Notification failed");
                    DeliveryReport {
                        platform: notifier.name(),
                        delivered: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            reports.push(report);
        }

        reports
    }

    async fn deliver(&self, notifier: &dyn Notifier, payload: &Value) -> Result<(), NotifyError> {
        let platform = notifier.name();
        self.retry
            .run(
                platform,
                || post(&self.client, platform, notifier.endpoint(), payload),
                NotifyError::is_transient,
            )
            .await
    }
}

async fn post(
    client: &Client,
    platform: &'static str,
    endpoint: &str,
    payload: &Value,
) -> Result<(), NotifyError> {
    let response = client
        .post(endpoint)
        .json(payload)
        .send()
        .await
        .map_err(|source| NotifyError::Http { platform, source })?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::Status {
        platform,
        status: status.as_u16(),
        body,
    })
}
