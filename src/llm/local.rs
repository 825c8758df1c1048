use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backend::{TextGenerator, non_empty, with_timeout};
use super::config::{LlmConfig, ProviderKind};
use super::error::LlmError;

const PROVIDER: &str = ProviderKind::Local.as_str();

/// Self-hosted generation server speaking `POST /api/generate` with basic auth.
pub struct LocalGenerator {
    http: HttpClient,
    url: String,
    username: String,
    password: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    system: &'a str,
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

impl LocalGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = HttpClient::builder()
            .build()
            .map_err(|e| LlmError::Request {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            url: format!("{}/api/generate", config.local_url.trim_end_matches('/')),
            username: config.local_username.clone(),
            password: config.local_password.clone(),
            model: config.local_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        })
    }

    async fn call(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            prompt: user,
            system,
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
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

        let parsed: GenerateResponse = resp.json().await.map_err(|e| LlmError::Decode {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        non_empty(PROVIDER, parsed.response)
    }
}

#[async_trait]
impl TextGenerator for LocalGenerator {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        debug!(model = %self.model, url = %self.url, "Calling local generator");
        with_timeout(PROVIDER, self.timeout, self.call(system, user)).await
    }
}
