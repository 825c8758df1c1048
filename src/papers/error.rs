use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the paper search provider.
pub enum PaperSearchError {
    /// Request could not be sent (DNS, TLS, timeout, client build).
    #[error("paper search request to '{url}' failed: {message}")]
    Request {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Provider answered with a non-success status.
    #[error("paper search returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (trimmed).
        body: String,
    },

    /// Response body was not the expected JSON.
    #[error("failed to decode paper search response: {0}")]
    Decode(String),
}
