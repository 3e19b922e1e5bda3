//! Error types for the Kronicle SDK
//!
//! One `Error` enum covers configuration failures, transport failures, backend
//! operation failures, and tabular conversion failures, following Rust idioms
//! with the `thiserror` crate. Transport-level variants know whether they are
//! retryable so the request layer can decide locally.

use std::time::Duration;
use thiserror::Error;

use crate::types::ChannelPayload;

/// Result type alias for operations that can fail with a Kronicle SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Kronicle SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing session setup. Raised at client construction or when a
    /// request target cannot be resolved, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or connection failure before a response was received.
    #[error("connection error: {0}")]
    Connection(String),

    /// A single request attempt exceeded its timeout.
    #[error("request timeout after {0:?}")]
    Timeout(Duration),

    /// Rate limit exceeded (429).
    #[error("rate limit exceeded")]
    RateLimit {
        /// Time to wait before retrying, if the backend provided one
        retry_after: Option<Duration>,
    },

    /// The backend returned an error status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Retries were exhausted; wraps the last underlying failure.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetryExhausted {
        /// Total attempts made, including the first
        attempts: u32,
        /// The last underlying error
        #[source]
        source: Box<Error>,
    },

    /// The backend returned a response the client could not interpret.
    #[error("invalid response: {0}")]
    ResponseValidation(String),

    /// The backend reported a failed operation in an otherwise valid response.
    #[error("operation failed: {message}")]
    Operation {
        /// Backend-provided description of the failure
        message: String,
        /// The payload returned with the failure, when the backend sent one
        payload: Option<Box<ChannelPayload>>,
    },

    /// Every batch of a push failed; wraps the first batch error.
    #[error("all {batches} push batches failed: {source}")]
    AllBatchesFailed {
        /// Number of batches submitted
        batches: usize,
        /// The first batch's error
        #[source]
        source: Box<Error>,
    },

    /// A tabular view could not be converted back into records.
    #[error("schema error: {0}")]
    Schema(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an error from an HTTP response status and body.
    ///
    /// 429 carries the `retry-after` header through so the retry layer can
    /// honor it; everything else becomes an [`Error::Api`] with the message
    /// pulled from the backend's error body when it parses.
    pub fn from_response(status: u16, body: &str, headers: &http::HeaderMap) -> Self {
        if status == 429 {
            let retry_after = headers
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Error::RateLimit { retry_after };
        }

        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|e| e.message())
            .unwrap_or_else(|_| body.to_string());

        Error::Api { status, message }
    }

    /// Check whether this error is retryable.
    ///
    /// Connection failures, timeouts, 429 and 5xx are retryable; other HTTP
    /// statuses and everything raised before a request was issued are fatal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Connection(_) => true,
            Error::Timeout(_) => true,
            Error::RateLimit { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get the backend-requested retry delay, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status code carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::RateLimit { .. } => Some(429),
            Error::RetryExhausted { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Error body shape the Kronicle backend returns for failed requests.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiErrorBody {
    fn message(self) -> String {
        match (self.error, self.message) {
            (Some(error), Some(message)) => format!("{error}: {message}"),
            (Some(error), None) => error,
            (None, Some(message)) => message,
            (None, None) => "unknown error".to_string(),
        }
    }
}
