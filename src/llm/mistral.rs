use std::time::Duration;

use async_openai::types::chat::ChatCompletionResponseMessage;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::backend::{TextGenerator, non_empty, with_timeout};
use super::config::{LlmConfig, ProviderKind};
use super::error::LlmError;

const PROVIDER: &str = ProviderKind::Mistral.as_str();

/// Completion envelope reduced to the assistant messages. `finish_reason`
/// is not read: Mistral emits values outside the OpenAI set.
#[derive(Debug, Deserialize)]
pub(crate) struct MistralCompletion {
    #[serde(default)]
    choices: Vec<MistralChoice>,
}

#[derive(Debug, Deserialize)]
struct MistralChoice {
    message: ChatCompletionResponseMessage,
}

/// Mistral through its OpenAI-compatible chat completions endpoint.
pub struct MistralGenerator {
    http: HttpClient,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl MistralGenerator {
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self, LlmError> {
        let http = HttpClient::builder()
            .build()
            .map_err(|e| LlmError::Request {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            url: format!("{}/chat/completions", config.mistral_url.trim_end_matches('/')),
            api_key,
            model: config.mistral_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        })
    }

    async fn call(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let completion: MistralCompletion =
            resp.json().await.map_err(|e| LlmError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        first_choice_text(completion)
    }
}

pub(crate) fn first_choice_text(completion: MistralCompletion) -> Result<String, LlmError> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content);
    non_empty(PROVIDER, content)
}

#[async_trait]
impl TextGenerator for MistralGenerator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        debug!(model = %self.model, "Calling mistral generator");
        with_timeout(PROVIDER, self.timeout, self.call(system, user)).await
    }
}
