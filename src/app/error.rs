use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::MAX_ATTACHMENTS;

#[derive(Error, Debug)]
pub enum XcliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("State file is corrupt: {0}")]
    StateCorrupt(String),

    #[error("A post can carry at most {} attachments", MAX_ATTACHMENTS)]
    AttachmentLimitExceeded,

    #[error("Attachment unavailable: {0}")]
    AttachmentUnavailable(String),

    #[error("Nothing to post")]
    EmptyDraft,

    #[error("{0}")]
    Other(String),
}

impl XcliError {
    /// Single-line rendering for the status bar.
    pub fn one_line(&self) -> String {
        self.to_string()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub type Result<T> = std::result::Result<T, XcliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_keeps_body_verbatim() {
        let err = XcliError::Remote {
            status: 403,
            body: r#"{"title":"Forbidden"}"#.into(),
        };
        assert_eq!(err.to_string(), r#"HTTP 403: {"title":"Forbidden"}"#);
    }

    #[test]
    fn test_one_line_collapses_multiline_bodies() {
        let err = XcliError::Remote {
            status: 500,
            body: "{\n  \"detail\": \"boom\"\n}".into(),
        };
        assert_eq!(err.one_line(), "HTTP 500: { \"detail\": \"boom\" }");
    }

    #[test]
    fn test_attachment_limit_message() {
        assert_eq!(
            XcliError::AttachmentLimitExceeded.to_string(),
            "A post can carry at most 4 attachments"
        );
    }
}
