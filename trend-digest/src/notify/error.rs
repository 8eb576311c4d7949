//! Notification error types.

use thiserror::Error;

/// Errors from delivering one notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure.
    #[error("{platform} request failed: {source}")]
    Http {
        platform: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The webhook answered with a non-success status.
    #[error("{platform} returned HTTP {status}: {body}")]
    Status {
        platform: &'static str,
        status: u16,
        body: String,
    },
}

impl NotifyError {
    /// Transport failures, HTTP 429 and 5xx are retried. Other statuses mean
    /// the webhook rejected the message and a repeat would fail the same way.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Client(_) => false,
            Self::Http { .. } => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> NotifyError {
        NotifyError::Status {
            platform: "slack",
            status,
            body: String::new(),
        }
    }

    #[test]
    fn only_server_side_statuses_are_transient() {
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(400).is_transient());
        assert!(!status(404).is_transient());
    }

    #[test]
    fn status_error_names_platform() {
        let error = NotifyError::Status {
            platform: "dingtalk",
            status: 400,
            body: "bad token".to_string(),
        };
        assert_eq!(error.to_string(), "dingtalk returned HTTP 400: bad token");
    }
}
