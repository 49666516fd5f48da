use thiserror::Error;

/// Errors from [`crate::inference::InferenceService`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Transport error text.
        message: String,
    },
    /// The request could not reach the service.
    #[error("request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Transport error text.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to parse inference response: {message}")]
    ParseError {
        /// Decoder error text.
        message: String,
    },
    /// The task running the request panicked or was cancelled before it
    /// produced a reply.
    #[error("inference task aborted: {message}")]
    Aborted {
        /// Join error text.
        message: String,
    },
}
