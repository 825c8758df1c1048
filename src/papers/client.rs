use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::config::PaperSearchConfig;
use super::error::PaperSearchError;
use super::model::{PaperQuery, RawWork};

#[async_trait]
/// Academic paper search provider.
pub trait PaperSearch: Send + Sync {
    /// Returns at most `query.limit` works, in provider order.
    async fn search(&self, query: &PaperQuery) -> Result<Vec<RawWork>, PaperSearchError>;
}

/// CORE API v3 client.
#[derive(Clone)]
pub struct CoreClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SearchWorksResponse {
    #[serde(default)]
    results: Vec<RawWork>,
}

impl CoreClient {
    pub fn new(config: &PaperSearchConfig) -> Result<Self, PaperSearchError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaperSearchError::Request {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search/works", self.base_url)
    }
}

/// Builds the JSON body of a `search/works` call.
pub(crate) fn search_body(query: &PaperQuery) -> serde_json::Value {
    let mut body = json!({
        "q": query.query,
        "limit": query.limit,
        "extract": query.extract,
    });
    if let Some(sort) = query.sort_param() {
        body["sort"] = json!(sort);
    }
    body
}

#[async_trait]
impl PaperSearch for CoreClient {
    #[instrument(skip(self, query), fields(limit = query.limit))]
    async fn search(&self, query: &PaperQuery) -> Result<Vec<RawWork>, PaperSearchError> {
        let url = self.search_url();

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&search_body(query))
            .send()
            .await
            .map_err(|e| PaperSearchError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PaperSearchError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let parsed: SearchWorksResponse = resp
            .json()
            .await
            .map_err(|e| PaperSearchError::Decode(e.to_string()))?;

        let mut works = parsed.results;
        works.truncate(query.limit as usize);
        debug!(count = works.len(), "Paper search returned");
        Ok(works)
    }
}
