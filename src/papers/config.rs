use std::time::Duration;

use crate::config::ConfigError;
use crate::config::env;
use crate::constants::DEFAULT_SEARCH_TIMEOUT;

/// CORE API v3 base URL.
pub const DEFAULT_CORE_URL: &str = "https://api.core.ac.uk/v3";

#[derive(Debug, Clone)]
/// Paper search provider settings.
pub struct PaperSearchConfig {
    /// Base URL (no trailing slash needed).
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for PaperSearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CORE_URL.to_string(),
            api_key: String::new(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

impl PaperSearchConfig {
    pub(crate) const ENV_API_KEY: &'static str = "CLAIMCHECK_CORE_API_KEY";
    const ENV_URL: &'static str = "CLAIMCHECK_CORE_URL";
    const ENV_TIMEOUT_SECS: &'static str = "CLAIMCHECK_CORE_TIMEOUT_SECS";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::string_or(Self::ENV_URL, defaults.base_url),
            api_key: env::string_or(Self::ENV_API_KEY, defaults.api_key),
            timeout: env::secs_or(Self::ENV_TIMEOUT_SECS, defaults.timeout),
        }
    }

    /// Returns a copy using `api_key` instead of the configured key.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self.clone()
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
