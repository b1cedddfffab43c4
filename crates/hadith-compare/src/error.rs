//! Error types for the comparison harness

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that abort a comparison run
///
/// All of these are fatal: the harness is a manually invoked diagnostic
/// and carries no retry policy. The one soft failure mode, a non-success
/// status while paginating, is not an error at all — it is recorded on
/// the [`PageAggregate`](crate::client::PageAggregate) instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Required environment variable is missing
    #[error("environment variable '{var}' not set")]
    MissingEnv { var: String },

    /// Environment variable is set but does not parse
    #[error("environment variable '{var}' has invalid value '{value}'")]
    InvalidEnv { var: String, value: String },

    /// Database connection or query failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP transport failure (DNS, refused connection, timeout)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status on a non-paginated fetch
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    /// Response body did not parse as JSON
    #[error("invalid JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
