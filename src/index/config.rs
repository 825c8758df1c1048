use crate::config::ConfigError;
use crate::config::env;
use crate::constants::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_DELETE_BATCH_SIZE, DEFAULT_MIN_SCORE,
    DEFAULT_OVERFETCH_FACTOR, DEFAULT_RERANK_FACTOR, DEFAULT_UPSERT_BATCH_SIZE,
};

/// Prefix of per-session namespaces.
pub const DEFAULT_TEMP_NAMESPACE_PREFIX: &str = "claim-session";

/// Provider caps on records per upsert and ids per delete.
pub const MAX_UPSERT_BATCH_SIZE: usize = 96;
pub const MAX_DELETE_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
/// Chunking, batching and filtering settings for semantic index sessions.
pub struct IndexConfig {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows.
    pub chunk_overlap: usize,
    pub upsert_batch_size: usize,
    pub delete_batch_size: usize,
    /// Hits scoring below this are dropped.
    pub min_score: f32,
    /// Candidates fetched per requested snippet.
    pub overfetch_factor: usize,
    /// Reranked results kept per requested snippet.
    pub rerank_factor: usize,
    pub temp_namespace_prefix: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            upsert_batch_size: DEFAULT_UPSERT_BATCH_SIZE,
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
            min_score: DEFAULT_MIN_SCORE,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
            rerank_factor: DEFAULT_RERANK_FACTOR,
            temp_namespace_prefix: DEFAULT_TEMP_NAMESPACE_PREFIX.to_string(),
        }
    }
}

impl IndexConfig {
    const ENV_CHUNK_SIZE: &'static str = "CLAIMCHECK_CHUNK_SIZE";
    const ENV_CHUNK_OVERLAP: &'static str = "CLAIMCHECK_CHUNK_OVERLAP";
    const ENV_UPSERT_BATCH: &'static str = "CLAIMCHECK_UPSERT_BATCH";
    const ENV_DELETE_BATCH: &'static str = "CLAIMCHECK_DELETE_BATCH";
    const ENV_MIN_SCORE: &'static str = "CLAIMCHECK_MIN_SCORE";
    const ENV_OVERFETCH_FACTOR: &'static str = "CLAIMCHECK_OVERFETCH_FACTOR";
    const ENV_RERANK_FACTOR: &'static str = "CLAIMCHECK_RERANK_FACTOR";
    const ENV_TEMP_NAMESPACE_PREFIX: &'static str = "CLAIMCHECK_TEMP_NAMESPACE_PREFIX";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chunk_size: env::usize_or(Self::ENV_CHUNK_SIZE, defaults.chunk_size),
            chunk_overlap: env::usize_or(Self::ENV_CHUNK_OVERLAP, defaults.chunk_overlap),
            upsert_batch_size: env::usize_or(Self::ENV_UPSERT_BATCH, defaults.upsert_batch_size),
            delete_batch_size: env::usize_or(Self::ENV_DELETE_BATCH, defaults.delete_batch_size),
            min_score: env::f32_or(Self::ENV_MIN_SCORE, defaults.min_score),
            overfetch_factor: env::usize_or(Self::ENV_OVERFETCH_FACTOR, defaults.overfetch_factor),
            rerank_factor: env::usize_or(Self::ENV_RERANK_FACTOR, defaults.rerank_factor),
            temp_namespace_prefix: env::string_or(
                Self::ENV_TEMP_NAMESPACE_PREFIX,
                defaults.temp_namespace_prefix,
            ),
        }
    }

    /// Validates internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(invalid(Self::ENV_CHUNK_SIZE, "must be greater than 0"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(invalid(
                Self::ENV_CHUNK_OVERLAP,
                "must be smaller than chunk size",
            ));
        }
        if !(1..=MAX_UPSERT_BATCH_SIZE).contains(&self.upsert_batch_size) {
            return Err(invalid(
                Self::ENV_UPSERT_BATCH,
                format!("must be between 1 and {MAX_UPSERT_BATCH_SIZE}"),
            ));
        }
        if !(1..=MAX_DELETE_BATCH_SIZE).contains(&self.delete_batch_size) {
            return Err(invalid(
                Self::ENV_DELETE_BATCH,
                format!("must be between 1 and {MAX_DELETE_BATCH_SIZE}"),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(invalid(Self::ENV_MIN_SCORE, "must be between 0.0 and 1.0"));
        }
        if self.overfetch_factor == 0 {
            return Err(invalid(Self::ENV_OVERFETCH_FACTOR, "must be at least 1"));
        }
        if self.rerank_factor == 0 || self.rerank_factor > self.overfetch_factor {
            return Err(invalid(
                Self::ENV_RERANK_FACTOR,
                "must be between 1 and the over-fetch factor",
            ));
        }
        if self.temp_namespace_prefix.trim().is_empty() {
            return Err(invalid(Self::ENV_TEMP_NAMESPACE_PREFIX, "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.into(),
    }
}
