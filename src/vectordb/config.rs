use std::time::Duration;

use crate::config::ConfigError;
use crate::config::env;
use crate::constants::DEFAULT_INDEX_TIMEOUT;

/// Default index name resolved through the control plane.
pub const DEFAULT_INDEX_NAME: &str = "fact-checker";
/// Long-lived namespace holding the curated corpus.
pub const DEFAULT_PERSISTENT_NAMESPACE: &str = "pdf-vault";
/// Reranker used for second-stage scoring.
pub const DEFAULT_RERANK_MODEL: &str = "bge-reranker-v2-m3";
/// Control-plane endpoint.
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
/// Data-plane API version header value.
pub const DEFAULT_API_VERSION: &str = "2025-04";

#[derive(Debug, Clone)]
/// Pinecone connection settings.
pub struct PineconeConfig {
    /// API key sent as `Api-Key`.
    pub api_key: String,
    /// Index name (used to resolve the host when `index_host` is unset).
    pub index_name: String,
    /// Data-plane host, e.g. `https://fact-checker-abc123.svc.pinecone.io`.
    pub index_host: Option<String>,
    /// Control-plane base URL.
    pub control_plane_url: String,
    /// Namespace searched by persistent lookups.
    pub persistent_namespace: String,
    /// Reranking model name.
    pub rerank_model: String,
    /// `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            index_host: None,
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
            persistent_namespace: DEFAULT_PERSISTENT_NAMESPACE.to_string(),
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_INDEX_TIMEOUT,
        }
    }
}

impl PineconeConfig {
    pub(crate) const ENV_API_KEY: &'static str = "CLAIMCHECK_PINECONE_API_KEY";
    const ENV_INDEX_NAME: &'static str = "CLAIMCHECK_PINECONE_INDEX_NAME";
    const ENV_INDEX_HOST: &'static str = "CLAIMCHECK_PINECONE_INDEX_HOST";
    const ENV_NAMESPACE: &'static str = "CLAIMCHECK_PINECONE_NAMESPACE";
    const ENV_RERANK_MODEL: &'static str = "CLAIMCHECK_PINECONE_RERANK_MODEL";
    const ENV_TIMEOUT_SECS: &'static str = "CLAIMCHECK_PINECONE_TIMEOUT_SECS";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::string_or(Self::ENV_API_KEY, defaults.api_key),
            index_name: env::string_or(Self::ENV_INDEX_NAME, defaults.index_name),
            index_host: env::optional_string(Self::ENV_INDEX_HOST),
            control_plane_url: defaults.control_plane_url,
            persistent_namespace: env::string_or(Self::ENV_NAMESPACE, defaults.persistent_namespace),
            rerank_model: env::string_or(Self::ENV_RERANK_MODEL, defaults.rerank_model),
            api_version: defaults.api_version,
            timeout: env::secs_or(Self::ENV_TIMEOUT_SECS, defaults.timeout),
        }
    }

    /// Requires an API key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            });
        }
        Ok(())
    }
}
