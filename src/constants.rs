//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants (e.g. request sizes) from primary ones to avoid drift.
//!
//! # Provider Limits
//!
//! The batch sizes below mirror the payload limits of the hosted vector index: integrated
//! embedding accepts at most 96 text records per upsert and deletes are capped at 1000 ids
//! per request. Raising them through configuration is allowed but will be rejected upstream.

use std::time::Duration;

/// Default chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 800;
/// Default overlap between consecutive chunks, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Records per upsert call.
pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 96;
/// Ids per delete call.
pub const DEFAULT_DELETE_BATCH_SIZE: usize = 1000;

/// Hits scoring below this are discarded.
pub const DEFAULT_MIN_SCORE: f32 = 0.3;

/// Candidates requested from the index per snippet returned.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 3;
/// Reranked candidates kept per snippet returned.
pub const DEFAULT_RERANK_FACTOR: usize = 2;

/// Snippets handed to the verifier by the orchestrator.
pub const DEFAULT_SNIPPET_TOP_K: usize = 6;

/// Papers requested when the caller does not say.
pub const DEFAULT_PAPER_LIMIT: u32 = 3;
/// Inclusive bounds for the paper-search limit.
pub const MIN_PAPER_LIMIT: u32 = 1;
pub const MAX_PAPER_LIMIT: u32 = 10;

/// Length of the random hex token identifying an index session.
pub const SESSION_TOKEN_LEN: usize = 8;

pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_INDEX_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Returned as the summary when there is nothing to verify against.
pub const NO_SOURCES_SUMMARY: &str = "No source texts provided.";

/// Returns `true` if `limit` is an acceptable paper-search limit.
pub fn is_valid_paper_limit(limit: u32) -> bool {
    (MIN_PAPER_LIMIT..=MAX_PAPER_LIMIT).contains(&limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_smaller_than_chunk() {
        assert!(DEFAULT_CHUNK_OVERLAP < DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_paper_limit_bounds() {
        assert!(!is_valid_paper_limit(0));
        assert!(is_valid_paper_limit(1));
        assert!(is_valid_paper_limit(DEFAULT_PAPER_LIMIT));
        assert!(is_valid_paper_limit(10));
        assert!(!is_valid_paper_limit(11));
    }

    #[test]
    fn test_rerank_keeps_fewer_than_fetched() {
        assert!(DEFAULT_RERANK_FACTOR <= DEFAULT_OVERFETCH_FACTOR);
    }
}
