//! Acquisition error types.

use crate::repository::RecordError;
use thiserror::Error;

/// Errors that can occur while acquiring the trending listing.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Network-level failure talking to an HTTP endpoint.
    #[error("HTTP request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("'{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    /// The trending page parsed into zero repositories.
    #[error("No repositories could be parsed from the trending page")]
    EmptyListing,

    /// A source returned a repository that violates the record invariants.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Both the trending scrape and the search API failed.
    #[error("All acquisition methods exhausted (trending: {primary}; search API: {secondary})")]
    Exhausted {
        primary: Box<AcquisitionError>,
        secondary: Box<AcquisitionError>,
    },
}

impl AcquisitionError {
    /// Returns true for failures worth retrying at the transport layer:
    /// timeouts, connection errors, HTTP 5xx and 429.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { source, .. } => {
                source.is_timeout()
                    || source.is_connect()
                    || source.is_request()
                    || source.is_body()
                    || source.status().is_some_and(|s| is_transient_status(s.as_u16()))
            }
            Self::Status { status, .. } => is_transient_status(*status),
            Self::GitHub(error) => is_transient_github_error(error),
            Self::Client(_)
            | Self::EmptyListing
            | Self::Record(_)
            | Self::Exhausted { .. } => false,
        }
    }
}

/// HTTP statuses treated as transient.
pub(crate) fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn is_transient_github_error(error: &octocrab::Error) -> bool {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            is_transient_status(source.status_code.as_u16())
        }
        octocrab::Error::Http { .. }
        | octocrab::Error::Hyper { .. }
        | octocrab::Error::Service { .. } => true,
        // Malformed bodies, bad URIs and auth setup fail the same way every time.
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        for status in [429, 500, 502, 503] {
            assert!(is_transient_status(status), "{status}");
        }
        for status in [200, 301, 403, 404, 422] {
            assert!(!is_transient_status(status), "{status}");
        }
    }

    #[test]
    fn structural_errors_are_not_transient() {
        assert!(!AcquisitionError::EmptyListing.is_transient());
        let error = AcquisitionError::Status {
            url: "https://github.com/trending".to_string(),
            status: 404,
        };
        assert!(!error.is_transient());
        let error = AcquisitionError::Status {
            url: "https://github.com/trending".to_string(),
            status: 503,
        };
        assert!(error.is_transient());
    }

    #[test]
    fn malformed_api_body_is_not_transient() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let error = AcquisitionError::GitHub(octocrab::Error::Serde {
            source,
            backtrace: std::backtrace::Backtrace::disabled(),
        });
        assert!(!error.is_transient());
    }
}
