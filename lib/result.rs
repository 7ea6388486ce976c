use std::path::PathBuf;

use thiserror::Error;

use crate::{repo::RepoIdParseError, sources::github::GithubError};

/**
    Errors for user-supplied input that fails a local format check.

    These are always detected before any network request is made.
*/
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("invalid repository identifier: {0}")]
    InvalidRepo(#[from] RepoIdParseError),
}

/**
    Errors for fetching release and repository data from upstream.
*/
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("{}", describe_upstream(.status, .reason))]
    UpstreamUnavailable { status: Option<u16>, reason: String },
    #[error("{section} data is unavailable: {reason}")]
    PartialDataUnavailable {
        section: &'static str,
        reason: String,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ReleaseError {
    pub(crate) fn upstream(err: &GithubError) -> Self {
        Self::UpstreamUnavailable {
            status: err.status(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn partial(section: &'static str, err: &GithubError) -> Self {
        Self::PartialDataUnavailable {
            section,
            reason: err.to_string(),
        }
    }

    /**
        The HTTP status that caused this error, if any.
    */
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_upstream(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(status) => format!("upstream unavailable (HTTP {status}): {reason}"),
        None => format!("upstream unavailable: {reason}"),
    }
}

pub type ReleaseResult<T> = Result<T, ReleaseError>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("GitHub error: {0}")]
    GitHub(#[from] GithubError),
    #[error(transparent)]
    Release(#[from] ReleaseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type SiteResult<T> = Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_keeps_status() {
        let err = ReleaseError::UpstreamUnavailable {
            status: Some(503),
            reason: "service unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("HTTP 503"));

        let err = ReleaseError::UpstreamUnavailable {
            status: None,
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(!err.to_string().contains("HTTP"));
    }
}
