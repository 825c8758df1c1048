use thiserror::Error;

use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors returned by semantic index sessions and lookups.
///
/// Cleanup failures are logged, never returned.
pub enum IndexError {
    /// Writing session chunks failed (cleanup still ran).
    #[error("failed to index session chunks: {0}")]
    Write(#[source] VectorDbError),

    /// Searching the session namespace failed (cleanup still ran).
    #[error("failed to search session chunks: {0}")]
    Search(#[source] VectorDbError),

    /// Searching the persistent namespace failed.
    #[error("persistent snippet search failed: {0}")]
    Persistent(#[source] VectorDbError),
}
