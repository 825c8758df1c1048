use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by vector index operations.
pub enum VectorDbError {
    /// Could not reach the index endpoint (or build the HTTP client).
    #[error("failed to connect to vector index at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The control plane does not know the index.
    #[error("vector index not found: {index}")]
    IndexNotFound {
        /// Index name.
        index: String,
    },

    /// Upsert failed.
    #[error("failed to upsert records to namespace '{namespace}': {message}")]
    UpsertFailed {
        /// Namespace.
        namespace: String,
        /// Error message.
        message: String,
    },

    /// Search failed.
    #[error("failed to search namespace '{namespace}': {message}")]
    SearchFailed {
        /// Namespace.
        namespace: String,
        /// Error message.
        message: String,
    },

    /// Delete failed.
    #[error("failed to delete records from namespace '{namespace}': {message}")]
    DeleteFailed {
        /// Namespace.
        namespace: String,
        /// Error message.
        message: String,
    },
}
