use std::time::Duration;

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use tracing::{debug, error};

use super::backend::{TextGenerator, non_empty, with_timeout};
use super::config::{LlmConfig, ProviderKind};
use super::error::LlmError;

/// OpenAI and Gemini through `genai`, with the key pinned on the client.
pub struct GenaiGenerator {
    provider: &'static str,
    client: Client,
    model: String,
    options: ChatOptions,
    timeout: Duration,
}

impl GenaiGenerator {
    pub fn new(kind: ProviderKind, api_key: String, model: &str, config: &LlmConfig) -> Self {
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );
        let client = Client::builder().with_auth_resolver(auth_resolver).build();

        let options = ChatOptions::default()
            .with_temperature(f64::from(config.temperature))
            .with_max_tokens(config.max_tokens);

        Self {
            provider: kind.as_str(),
            client,
            model: model.to_string(),
            options,
            timeout: config.timeout,
        }
    }

    async fn call(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&self.options))
            .await
            .map_err(|e| {
                error!(provider = self.provider, "Provider error: {}", e);
                LlmError::Request {
                    provider: self.provider,
                    message: e.to_string(),
                }
            })?;

        non_empty(self.provider, response.first_text().map(str::to_string))
    }
}

#[async_trait]
impl TextGenerator for GenaiGenerator {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        debug!(provider = self.provider, model = %self.model, "Calling hosted generator");
        with_timeout(self.provider, self.timeout, self.call(system, user)).await
    }
}
