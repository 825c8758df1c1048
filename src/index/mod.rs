//! Ephemeral semantic index sessions.
//!
//! Each [`SemanticIndex::run_session`] call chunks the retrieved works, writes
//! them under a namespace unique to the session, runs one over-fetching,
//! reranked search for the claim and deletes every record it wrote, on
//! success, on error and on cancellation.

pub mod chunk;
pub mod config;
pub mod error;
pub mod semantic;
pub mod session;

#[cfg(test)]
mod tests;

pub use chunk::{Chunk, chunk_works, split_windows};
pub use config::IndexConfig;
pub use error::IndexError;
pub use semantic::{SemanticIndex, Snippet, select_snippets};
pub use session::SessionToken;
