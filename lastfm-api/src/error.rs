//! Error types for the Last.fm API client.
//!
//! Every failure is a [`LastfmError`]. Callers that need to branch on the
//! class of failure (a missing artist is usually benign, a rejected
//! signature is not) should match on [`LastfmError::kind`] instead of the
//! message text.

use thiserror::Error;

/// Errors that can occur when interacting with the Last.fm API.
#[derive(Debug, Error)]
pub enum LastfmError {
    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP status whose body carried no parseable service error.
    #[error("HTTP status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The service returned an error object in its response envelope.
    ///
    /// Common codes:
    /// - `4`  — authentication failed
    /// - `9`  — invalid session key
    /// - `13` — invalid method signature
    /// - `29` — rate limit exceeded
    #[error("API error (code {code}): {message}")]
    Api {
        /// Last.fm error code (not HTTP status).
        code: i64,
        /// Human-readable error message from the API.
        message: String,
    },

    /// The service reported that the requested entity does not exist.
    #[error("{method}: not found ({lookup}): {message}")]
    NotFound {
        /// API method that was called, e.g. `artist.getInfo`.
        method: String,
        /// Identifying fields of the lookup, e.g. `artist=Cher`.
        lookup: String,
        /// Message from the API.
        message: String,
    },

    /// A signed call was made without a usable session.
    #[error("not logged in")]
    NotLoggedIn,

    /// Too many items were passed to a batch operation.
    #[error("a maximum of {max} {what} is allowed, got {got}")]
    TooMany {
        /// What was counted (`tags`, `scrobbles`).
        what: &'static str,
        /// Service limit.
        max: usize,
        /// Number of items supplied.
        got: usize,
    },

    /// A required field is missing on one entry of a batch.
    #[error("field \"{field}\" not set on entry {index}")]
    MissingField {
        /// Zero-based position in the batch.
        index: usize,
        /// Wire name of the missing field.
        field: &'static str,
    },

    /// Failed to parse a JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error (session read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for other errors (e.g. missing config directory).
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of a [`LastfmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arguments rejected locally; no request was sent.
    Validation,
    /// A signed call had no session to sign with; no request was sent.
    Authentication,
    /// The service does not know the requested entity.
    NotFound,
    /// Any other service or transport failure.
    Api,
    /// Local session storage failed.
    Storage,
}

impl LastfmError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooMany { .. } | Self::MissingField { .. } => ErrorKind::Validation,
            Self::NotLoggedIn => ErrorKind::Authentication,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Http(_) | Self::Status { .. } | Self::Api { .. } | Self::Json(_) => {
                ErrorKind::Api
            }
            Self::Io(_) | Self::Other(_) => ErrorKind::Storage,
        }
    }

    /// `true` for [`ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Convenience alias for `Result<T, LastfmError>`.
pub type Result<T> = std::result::Result<T, LastfmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_classify_as_validation() {
        let err = LastfmError::TooMany {
            what: "tags",
            max: 10,
            got: 11,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "a maximum of 10 tags is allowed, got 11");

        let err = LastfmError::MissingField {
            index: 3,
            field: "timestamp",
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "field \"timestamp\" not set on entry 3");
    }

    #[test]
    fn service_errors_classify() {
        let err = LastfmError::NotFound {
            method: "artist.getInfo".into(),
            lookup: "artist=Nobody".into(),
            message: "The artist you supplied could not be found".into(),
        };
        assert!(err.is_not_found());

        let err = LastfmError::Api {
            code: 13,
            message: "Invalid method signature supplied".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(!err.is_not_found());

        let err = LastfmError::Status {
            status: 502,
            body: "Bad Gateway".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(LastfmError::NotLoggedIn.kind(), ErrorKind::Authentication);
    }
}
