//! Error types for the likes exporter.

use thiserror::Error;

/// Main error type for all exporter operations.
///
/// Every variant is fatal to a run: nothing in the pipeline retries or
/// recovers locally.
#[derive(Debug, Error)]
pub enum LikesError {
    /// Upstream answered with a non-2xx status.
    #[error("HTTP {status} {status_text} for {url}")]
    Http {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, empty if unknown.
        status_text: String,
        /// URL that was requested.
        url: String,
    },

    /// Payload did not match its schema. Holds every violation, comma-separated.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No bundled script exposed a client id.
    #[error("Could not resolve client id: all {0} script fetches failed")]
    CredentialNotFound(usize),

    /// The profile page carried no user deep link.
    #[error("Could not resolve user id for {0}")]
    UserNotFound(String),

    /// A schema was requested that the validator never compiled.
    #[error("No compiled schema for {0}")]
    UnknownSchema(&'static str),

    /// A bundled schema document failed to compile.
    #[error("Invalid schema {id}: {message}")]
    SchemaCompile {
        /// Schema identifier.
        id: &'static str,
        /// Compiler message.
        message: String,
    },

    /// HTTP request failed.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for LikesError {
    fn from(err: tokio::task::JoinError) -> Self {
        LikesError::Task(err.to_string())
    }
}

/// Result type alias for exporter operations.
pub type Result<T> = std::result::Result<T, LikesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_names_url_and_status() {
        let err = LikesError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
            url: "https://api-v2.soundcloud.com/users/1/likes".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Not Found"));
        assert!(msg.contains("/users/1/likes"));
    }
}
