use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by text-generation backends.
pub enum LlmError {
    /// Provider name is not one of the supported backends.
    #[error("unknown AI provider '{value}' (expected one of: local, openai, mistral, gemini)")]
    UnknownProvider {
        /// The configured value.
        value: String,
    },

    /// A hosted backend was selected without an API key.
    #[error("{provider} backend requires {var} to be set")]
    MissingCredential {
        /// Backend name.
        provider: &'static str,
        /// Environment variable carrying the key.
        var: &'static str,
    },

    /// Request could not be sent or the client failed.
    #[error("{provider} request failed: {message}")]
    Request {
        /// Backend name.
        provider: &'static str,
        /// Error message.
        message: String,
    },

    /// Backend answered with a non-success status.
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        /// Backend name.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body (trimmed).
        body: String,
    },

    /// Backend answered without any text.
    #[error("{provider} returned an empty response")]
    EmptyResponse {
        /// Backend name.
        provider: &'static str,
    },

    /// No answer within the configured timeout.
    #[error("{provider} timed out after {secs}s")]
    Timeout {
        /// Backend name.
        provider: &'static str,
        /// Timeout in seconds.
        secs: u64,
    },

    /// Backend response envelope could not be decoded.
    #[error("failed to decode {provider} response: {message}")]
    Decode {
        /// Backend name.
        provider: &'static str,
        /// Error message.
        message: String,
    },
}
