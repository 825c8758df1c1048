use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::env;
use crate::constants::{DEFAULT_AI_TIMEOUT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

use super::error::LlmError;

/// Local generation server.
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOCAL_USERNAME: &str = "admin";
pub const DEFAULT_LOCAL_MODEL: &str = "heavy";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_MISTRAL_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported text-generation backends.
pub enum ProviderKind {
    Local,
    OpenAi,
    Mistral,
    Gemini,
}

impl ProviderKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Local => "local",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Mistral => "mistral",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ProviderKind::Local),
            "openai" => Ok(ProviderKind::OpenAi),
            "mistral" => Ok(ProviderKind::Mistral),
            "gemini" => Ok(ProviderKind::Gemini),
            _ => Err(LlmError::UnknownProvider {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
/// Backend selection and per-backend settings.
///
/// `provider` stays a raw string until [`build_generator`](super::build_generator)
/// parses it, so an unknown value fails when the generator is constructed.
pub struct LlmConfig {
    pub provider: String,

    pub local_url: String,
    pub local_username: String,
    pub local_password: String,
    pub local_model: String,

    pub openai_api_key: Option<String>,
    pub openai_model: String,

    pub mistral_api_key: Option<String>,
    pub mistral_model: String,
    pub mistral_url: String,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Local.as_str().to_string(),
            local_url: DEFAULT_LOCAL_URL.to_string(),
            local_username: DEFAULT_LOCAL_USERNAME.to_string(),
            local_password: String::new(),
            local_model: DEFAULT_LOCAL_MODEL.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            mistral_api_key: None,
            mistral_model: DEFAULT_MISTRAL_MODEL.to_string(),
            mistral_url: DEFAULT_MISTRAL_URL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_AI_TIMEOUT,
        }
    }
}

impl LlmConfig {
    pub(crate) const ENV_PROVIDER: &'static str = "CLAIMCHECK_AI_PROVIDER";
    const ENV_LOCAL_URL: &'static str = "CLAIMCHECK_LOCAL_LLM_URL";
    const ENV_LOCAL_USERNAME: &'static str = "CLAIMCHECK_LOCAL_LLM_USERNAME";
    const ENV_LOCAL_PASSWORD: &'static str = "CLAIMCHECK_LOCAL_LLM_PASSWORD";
    const ENV_LOCAL_MODEL: &'static str = "CLAIMCHECK_LOCAL_LLM_MODEL";
    pub(crate) const ENV_OPENAI_API_KEY: &'static str = "CLAIMCHECK_OPENAI_API_KEY";
    const ENV_OPENAI_MODEL: &'static str = "CLAIMCHECK_OPENAI_MODEL";
    pub(crate) const ENV_MISTRAL_API_KEY: &'static str = "CLAIMCHECK_MISTRAL_API_KEY";
    const ENV_MISTRAL_MODEL: &'static str = "CLAIMCHECK_MISTRAL_MODEL";
    pub(crate) const ENV_GEMINI_API_KEY: &'static str = "CLAIMCHECK_GEMINI_API_KEY";
    const ENV_GEMINI_MODEL: &'static str = "CLAIMCHECK_GEMINI_MODEL";
    const ENV_TIMEOUT_SECS: &'static str = "CLAIMCHECK_AI_TIMEOUT_SECS";

    /// Loads config from environment variables (with defaults).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env::string_or(Self::ENV_PROVIDER, defaults.provider),
            local_url: env::string_or(Self::ENV_LOCAL_URL, defaults.local_url),
            local_username: env::string_or(Self::ENV_LOCAL_USERNAME, defaults.local_username),
            local_password: env::string_or(Self::ENV_LOCAL_PASSWORD, defaults.local_password),
            local_model: env::string_or(Self::ENV_LOCAL_MODEL, defaults.local_model),
            openai_api_key: env::optional_string(Self::ENV_OPENAI_API_KEY),
            openai_model: env::string_or(Self::ENV_OPENAI_MODEL, defaults.openai_model),
            mistral_api_key: env::optional_string(Self::ENV_MISTRAL_API_KEY),
            mistral_model: env::string_or(Self::ENV_MISTRAL_MODEL, defaults.mistral_model),
            mistral_url: defaults.mistral_url,
            gemini_api_key: env::optional_string(Self::ENV_GEMINI_API_KEY),
            gemini_model: env::string_or(Self::ENV_GEMINI_MODEL, defaults.gemini_model),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            timeout: env::secs_or(Self::ENV_TIMEOUT_SECS, defaults.timeout),
        }
    }

    pub fn provider_kind(&self) -> Result<ProviderKind, LlmError> {
        self.provider.parse()
    }

    /// Returns a copy whose selected hosted backend uses `api_key`.
    ///
    /// The local backend authenticates with username/password and ignores it.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        let api_key = Some(api_key.into());
        let mut config = self.clone();
        match self.provider_kind() {
            Ok(ProviderKind::OpenAi) => config.openai_api_key = api_key,
            Ok(ProviderKind::Mistral) => config.mistral_api_key = api_key,
            Ok(ProviderKind::Gemini) => config.gemini_api_key = api_key,
            Ok(ProviderKind::Local) | Err(_) => {}
        }
        config
    }
}
