use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::config::{LlmConfig, ProviderKind};
use super::error::LlmError;
use super::hosted::GenaiGenerator;
use super::local::LocalGenerator;
use super::mistral::MistralGenerator;

#[async_trait]
/// A text-generation backend: one system prompt, one user prompt, one reply.
pub trait TextGenerator: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

/// Builds the configured backend. Fails on an unknown provider or a missing key.
pub fn build_generator(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>, LlmError> {
    let kind = config.provider_kind()?;

    let generator: Arc<dyn TextGenerator> = match kind {
        ProviderKind::Local => Arc::new(LocalGenerator::new(config)?),
        ProviderKind::OpenAi => Arc::new(GenaiGenerator::new(
            kind,
            require_key(kind, &config.openai_api_key, LlmConfig::ENV_OPENAI_API_KEY)?,
            &config.openai_model,
            config,
        )),
        ProviderKind::Gemini => Arc::new(GenaiGenerator::new(
            kind,
            require_key(kind, &config.gemini_api_key, LlmConfig::ENV_GEMINI_API_KEY)?,
            &config.gemini_model,
            config,
        )),
        ProviderKind::Mistral => Arc::new(MistralGenerator::new(
            require_key(kind, &config.mistral_api_key, LlmConfig::ENV_MISTRAL_API_KEY)?,
            config,
        )?),
    };

    info!(provider = %kind, "Text generator ready");
    Ok(generator)
}

fn require_key(
    kind: ProviderKind,
    key: &Option<String>,
    var: &'static str,
) -> Result<String, LlmError> {
    key.as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or(LlmError::MissingCredential {
            provider: kind.as_str(),
            var,
        })
}

/// Runs `fut` under `timeout`, mapping expiry to [`LlmError::Timeout`].
pub(crate) async fn with_timeout<F, T>(
    provider: &'static str,
    timeout: Duration,
    fut: F,
) -> Result<T, LlmError>
where
    F: Future<Output = Result<T, LlmError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| LlmError::Timeout {
            provider,
            secs: timeout.as_secs(),
        })?
}

/// Returns the trimmed reply, or [`LlmError::EmptyResponse`] when blank.
pub(crate) fn non_empty(provider: &'static str, text: Option<String>) -> Result<String, LlmError> {
    text.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(LlmError::EmptyResponse { provider })
}
