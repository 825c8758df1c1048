use serde::{Deserialize, Serialize};

/// Payload field holding the embedded text.
pub const CHUNK_TEXT_FIELD: &str = "chunk_text";

/// A text record; the index embeds `chunk_text` server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub chunk_text: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<u64>,
}

impl TextRecord {
    pub fn new(id: impl Into<String>, chunk_text: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chunk_text: chunk_text.into(),
            title: title.into(),
            citations: None,
        }
    }

    pub fn with_citations(mut self, citations: Option<u64>) -> Self {
        self.citations = citations;
        self
    }
}

/// Second-stage reranking applied by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankSpec {
    pub model: String,
    pub top_n: usize,
    pub rank_fields: Vec<String>,
}

impl RerankSpec {
    /// Reranks on the chunk text.
    pub fn on_chunk_text(model: impl Into<String>, top_n: usize) -> Self {
        Self {
            model: model.into(),
            top_n,
            rank_fields: vec![CHUNK_TEXT_FIELD.to_string()],
        }
    }
}

/// One text query against a namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub text: String,
    pub top_k: usize,
    pub rerank: Option<RerankSpec>,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>, top_k: usize) -> Self {
        Self {
            text: text.into(),
            top_k,
            rerank: None,
        }
    }

    pub fn with_rerank(mut self, rerank: RerankSpec) -> Self {
        self.rerank = Some(rerank);
        self
    }
}

/// Fields returned with a hit. Missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HitFields {
    #[serde(default)]
    pub chunk_text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub citations: Option<u64>,
}

impl HitFields {
    /// Title, falling back to the source label, then `"Unknown"`.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.source.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// A scored search hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: f32,
    #[serde(default)]
    pub fields: HitFields,
}
