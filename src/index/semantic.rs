use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::papers::Work;
use crate::vectordb::config::{DEFAULT_PERSISTENT_NAMESPACE, DEFAULT_RERANK_MODEL};
use crate::vectordb::{RerankSpec, SearchHit, SearchRequest, TextRecord, VectorIndex};

use super::chunk::chunk_works;
use super::config::IndexConfig;
use super::error::IndexError;
use super::session::{SessionGuard, SessionToken};

/// A passage selected for verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    pub id: String,
    pub text: String,
    pub title: String,
    pub score: f32,
    pub citations: Option<u64>,
}

impl From<SearchHit> for Snippet {
    fn from(hit: SearchHit) -> Self {
        Self {
            title: hit.fields.display_title(),
            id: hit.id,
            text: hit.fields.chunk_text,
            score: hit.score,
            citations: hit.fields.citations,
        }
    }
}

/// Orders hits by descending score, drops those below `min_score`, keeps the
/// first occurrence of each exact text and truncates to `top_k`.
pub fn select_snippets(mut hits: Vec<SearchHit>, min_score: f32, top_k: usize) -> Vec<Snippet> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| hit.score >= min_score)
        .filter(|hit| seen.insert(hit.fields.chunk_text.clone()))
        .take(top_k)
        .map(Snippet::from)
        .collect()
}

/// Session-scoped semantic narrowing over a text vector index.
#[derive(Clone)]
pub struct SemanticIndex {
    index: Arc<dyn VectorIndex>,
    config: IndexConfig,
    persistent_namespace: String,
    rerank_model: String,
}

impl SemanticIndex {
    pub fn new(index: Arc<dyn VectorIndex>, config: IndexConfig) -> Self {
        Self {
            index,
            config,
            persistent_namespace: DEFAULT_PERSISTENT_NAMESPACE.to_string(),
            rerank_model: DEFAULT_RERANK_MODEL.to_string(),
        }
    }

    pub fn with_persistent_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.persistent_namespace = namespace.into();
        self
    }

    pub fn with_rerank_model(mut self, model: impl Into<String>) -> Self {
        self.rerank_model = model.into();
        self
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Indexes the works' text under a fresh session namespace, returns the
    /// `top_k` best distinct passages for `claim`, and deletes everything written.
    ///
    /// Cleanup runs whether or not indexing and search succeed; if this future is
    /// dropped first, cleanup is spawned in the background.
    #[instrument(skip_all, fields(works = works.len(), top_k = top_k))]
    pub async fn run_session(
        &self,
        claim: &str,
        works: &[Work],
        top_k: usize,
    ) -> Result<Vec<Snippet>, IndexError> {
        let chunks = chunk_works(works, self.config.chunk_size, self.config.chunk_overlap);
        if chunks.is_empty() || top_k == 0 {
            info!(chunks = chunks.len(), "Nothing to index, skipping session");
            return Ok(Vec::new());
        }

        let token = SessionToken::mint();
        let namespace = token.namespace(&self.config.temp_namespace_prefix);
        info!(session = %token, namespace = %namespace, chunks = chunks.len(), "Starting index session");

        let records: Vec<TextRecord> = chunks.into_iter().map(|c| c.into_record(&token)).collect();
        let mut guard = SessionGuard::new(
            Arc::clone(&self.index),
            namespace,
            self.config.delete_batch_size,
        );

        let outcome = self.index_and_search(&mut guard, records, claim, top_k).await;
        guard.release().await;

        let hits = outcome?;
        let candidates = hits.len();
        let snippets = select_snippets(hits, self.config.min_score, top_k);
        info!(session = %token, candidates, kept = snippets.len(), "Index session finished");
        Ok(snippets)
    }

    async fn index_and_search(
        &self,
        guard: &mut SessionGuard,
        records: Vec<TextRecord>,
        claim: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        let batch_size = self.config.upsert_batch_size.max(1);
        for batch in records.chunks(batch_size) {
            guard.track(batch.iter().map(|r| r.id.clone()));
            self.index
                .upsert_records(guard.namespace(), batch.to_vec())
                .await
                .map_err(IndexError::Write)?;
        }
        debug!(records = records.len(), "Session chunks indexed");

        let candidates = top_k.saturating_mul(self.config.overfetch_factor);
        let rerank_top_n = top_k.saturating_mul(self.config.rerank_factor);
        let request = SearchRequest::new(claim, candidates)
            .with_rerank(RerankSpec::on_chunk_text(&self.rerank_model, rerank_top_n));

        self.index
            .search_records(guard.namespace(), &request)
            .await
            .map_err(IndexError::Search)
    }

    /// Searches the persistent namespace; `min_score` overrides the configured threshold.
    #[instrument(skip(self, query))]
    pub async fn search_persistent(
        &self,
        query: &str,
        top_k: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<Snippet>, IndexError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let request = SearchRequest::new(query, top_k)
            .with_rerank(RerankSpec::on_chunk_text(&self.rerank_model, top_k));

        let hits = self
            .index
            .search_records(&self.persistent_namespace, &request)
            .await
            .map_err(IndexError::Persistent)?;

        for hit in &hits {
            debug!(id = %hit.id, score = hit.score, "Persistent hit");
        }

        Ok(select_snippets(
            hits,
            min_score.unwrap_or(self.config.min_score),
            top_k,
        ))
    }

    /// Persistent-namespace passages for a claim, with the configured threshold.
    pub async fn search_snippets_for_claim(
        &self,
        claim: &str,
        top_k: usize,
    ) -> Result<Vec<Snippet>, IndexError> {
        self.search_persistent(claim, top_k, None).await
    }
}
