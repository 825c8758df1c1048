use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::config::PineconeConfig;
use super::error::VectorDbError;
use super::model::{CHUNK_TEXT_FIELD, SearchHit, SearchRequest, TextRecord};

/// Fields requested with every hit.
const HIT_FIELDS: [&str; 4] = [CHUNK_TEXT_FIELD, "title", "source", "citations"];

#[async_trait]
/// Minimal interface over a text-in, text-out vector index.
///
/// Embedding and reranking happen on the provider side; callers only deal in text.
pub trait VectorIndex: Send + Sync {
    /// Writes records into `namespace`, replacing any with the same id.
    async fn upsert_records(
        &self,
        namespace: &str,
        records: Vec<TextRecord>,
    ) -> Result<(), VectorDbError>;

    /// Runs one text query against `namespace`.
    async fn search_records(
        &self,
        namespace: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, VectorDbError>;

    /// Deletes records by id. Unknown ids are ignored.
    async fn delete_records(&self, namespace: &str, ids: Vec<String>)
    -> Result<(), VectorDbError>;
}

#[derive(Clone)]
/// Pinecone data-plane client for an integrated-inference index.
pub struct PineconeClient {
    http: HttpClient,
    host: String,
    api_key: String,
    api_version: String,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: SearchResultBody,
}

#[derive(Default, Deserialize)]
struct SearchResultBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

impl PineconeClient {
    /// Creates a client, resolving the index host through the control plane if not configured.
    pub async fn connect(config: &PineconeConfig) -> Result<Self, VectorDbError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: config.control_plane_url.clone(),
                message: e.to_string(),
            })?;

        let host = match &config.index_host {
            Some(host) => normalize_host(host),
            None => Self::describe_host(&http, config).await?,
        };

        debug!(host = %host, index = %config.index_name, "Vector index client ready");

        Ok(Self {
            http,
            host,
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Returns the resolved data-plane host.
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn describe_host(
        http: &HttpClient,
        config: &PineconeConfig,
    ) -> Result<String, VectorDbError> {
        let url = format!(
            "{}/indexes/{}",
            config.control_plane_url.trim_end_matches('/'),
            config.index_name
        );

        let resp = http
            .get(&url)
            .header("Api-Key", &config.api_key)
            .header("X-Pinecone-API-Version", &config.api_version)
            .send()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(VectorDbError::IndexNotFound {
                index: config.index_name.clone(),
            });
        }

        let resp = check_status(resp)
            .await
            .map_err(|message| VectorDbError::ConnectionFailed {
                url: url.clone(),
                message,
            })?;

        let body: DescribeIndexResponse =
            resp.json()
                .await
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url,
                    message: e.to_string(),
                })?;

        Ok(normalize_host(&body.host))
    }

    fn records_url(&self, namespace: &str, action: &str) -> String {
        format!("{}/records/namespaces/{}/{}", self.host, namespace, action)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
    }
}

#[async_trait]
impl VectorIndex for PineconeClient {
    async fn upsert_records(
        &self,
        namespace: &str,
        records: Vec<TextRecord>,
    ) -> Result<(), VectorDbError> {
        if records.is_empty() {
            return Ok(());
        }

        let upsert_failed = |message: String| VectorDbError::UpsertFailed {
            namespace: namespace.to_string(),
            message,
        };

        let mut body = String::new();
        for record in &records {
            let line = serde_json::to_string(record).map_err(|e| upsert_failed(e.to_string()))?;
            body.push_str(&line);
            body.push('\n');
        }

        let resp = self
            .post(&self.records_url(namespace, "upsert"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| upsert_failed(e.to_string()))?;

        check_status(resp).await.map_err(upsert_failed)?;
        Ok(())
    }

    async fn search_records(
        &self,
        namespace: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        let search_failed = |message: String| VectorDbError::SearchFailed {
            namespace: namespace.to_string(),
            message,
        };

        let mut body = json!({
            "query": {
                "inputs": { "text": request.text },
                "top_k": request.top_k,
            },
            "fields": HIT_FIELDS,
        });
        if let Some(rerank) = &request.rerank {
            body["rerank"] = json!(rerank);
        }

        let resp = self
            .post(&self.records_url(namespace, "search"))
            .json(&body)
            .send()
            .await
            .map_err(|e| search_failed(e.to_string()))?;

        let resp = check_status(resp).await.map_err(search_failed)?;
        let parsed: SearchResponse = resp.json().await.map_err(|e| search_failed(e.to_string()))?;

        Ok(parsed.result.hits)
    }

    async fn delete_records(
        &self,
        namespace: &str,
        ids: Vec<String>,
    ) -> Result<(), VectorDbError> {
        if ids.is_empty() {
            return Ok(());
        }

        let delete_failed = |message: String| VectorDbError::DeleteFailed {
            namespace: namespace.to_string(),
            message,
        };

        let resp = self
            .post(&format!("{}/vectors/delete", self.host))
            .json(&json!({ "ids": ids, "namespace": namespace }))
            .send()
            .await
            .map_err(|e| delete_failed(e.to_string()))?;

        check_status(resp).await.map_err(delete_failed)?;
        Ok(())
    }
}

/// Adds `https://` to bare hosts and strips trailing slashes.
pub(crate) fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

async fn check_status(resp: Response) -> Result<Response, String> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(format!("HTTP {}: {}", status.as_u16(), body.trim()))
}
