use crate::config::ConfigError;
use crate::config::env;
use crate::constants::DEFAULT_SNIPPET_TOP_K;
use crate::index::IndexConfig;
use crate::llm::LlmConfig;
use crate::papers::PaperSearchConfig;
use crate::vectordb::PineconeConfig;

#[derive(Debug, Clone)]
/// Everything a [`FactChecker`](super::FactChecker) needs to build its collaborators.
pub struct ServiceConfig {
    pub papers: PaperSearchConfig,
    pub pinecone: PineconeConfig,
    pub index: IndexConfig,
    pub llm: LlmConfig,
    /// Passages kept per session.
    pub snippet_top_k: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            papers: PaperSearchConfig::default(),
            pinecone: PineconeConfig::default(),
            index: IndexConfig::default(),
            llm: LlmConfig::default(),
            snippet_top_k: DEFAULT_SNIPPET_TOP_K,
        }
    }
}

impl ServiceConfig {
    const ENV_SNIPPET_TOP_K: &'static str = "CLAIMCHECK_SNIPPET_TOP_K";

    /// Loads every section from environment variables (with defaults).
    pub fn from_env() -> Self {
        Self {
            papers: PaperSearchConfig::from_env(),
            pinecone: PineconeConfig::from_env(),
            index: IndexConfig::from_env(),
            llm: LlmConfig::from_env(),
            snippet_top_k: env::usize_or(Self::ENV_SNIPPET_TOP_K, DEFAULT_SNIPPET_TOP_K),
        }
    }

    /// Checks the settings that cannot be overridden per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pinecone.validate()?;
        self.index.validate()?;
        if self.snippet_top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SNIPPET_TOP_K,
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Returns a copy with per-request credentials applied.
    pub fn with_overrides(&self, core_api_key: Option<&str>, ai_api_key: Option<&str>) -> Self {
        let mut config = self.clone();
        if let Some(key) = core_api_key {
            config.papers = config.papers.with_api_key(key);
        }
        if let Some(key) = ai_api_key {
            config.llm = config.llm.with_api_key(key);
        }
        config
    }
}
