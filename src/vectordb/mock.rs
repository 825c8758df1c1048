use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::client::VectorIndex;
use super::error::VectorDbError;
use super::model::{HitFields, SearchHit, SearchRequest, TextRecord};

/// In-memory [`VectorIndex`] scoring by bag-of-words cosine similarity.
///
/// Records every call so tests can assert on batching and cleanup.
#[derive(Default)]
pub struct MockVectorIndex {
    namespaces: RwLock<HashMap<String, HashMap<String, TextRecord>>>,
    upsert_batches: RwLock<Vec<(String, usize)>>,
    delete_batches: RwLock<Vec<(String, usize)>>,
    searches: RwLock<Vec<(String, SearchRequest)>>,
    fail_upsert: AtomicBool,
    fail_search: AtomicBool,
    fail_delete: AtomicBool,
    search_delay: RwLock<Option<Duration>>,
    delete_delay: RwLock<Option<Duration>>,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts records directly, bypassing call recording.
    pub fn seed(&self, namespace: &str, records: Vec<TextRecord>) {
        if let Ok(mut namespaces) = self.namespaces.write() {
            let ns = namespaces.entry(namespace.to_string()).or_default();
            for record in records {
                ns.insert(record.id.clone(), record);
            }
        }
    }

    pub fn record_count(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .ok()
            .and_then(|n| n.get(namespace).map(HashMap::len))
            .unwrap_or(0)
    }

    pub fn total_records(&self) -> usize {
        self.namespaces
            .read()
            .map(|n| n.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    /// Namespaces currently holding at least one record.
    pub fn live_namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .namespaces
            .read()
            .map(|n| {
                n.iter()
                    .filter(|(_, records)| !records.is_empty())
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// `(namespace, batch_len)` for each upsert call.
    pub fn upsert_batches(&self) -> Vec<(String, usize)> {
        self.upsert_batches.read().map(|b| b.clone()).unwrap_or_default()
    }

    /// `(namespace, batch_len)` for each delete call.
    pub fn delete_batches(&self) -> Vec<(String, usize)> {
        self.delete_batches.read().map(|b| b.clone()).unwrap_or_default()
    }

    /// Every search request, in call order.
    pub fn searches(&self) -> Vec<(String, SearchRequest)> {
        self.searches.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn set_fail_upsert(&self, fail: bool) {
        self.fail_upsert.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Makes every search sleep before answering.
    pub fn set_search_delay(&self, delay: Option<Duration>) {
        if let Ok(mut d) = self.search_delay.write() {
            *d = delay;
        }
    }

    /// Makes every delete sleep before removing anything.
    pub fn set_delete_delay(&self, delay: Option<Duration>) {
        if let Ok(mut d) = self.delete_delay.write() {
            *d = delay;
        }
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn upsert_records(
        &self,
        namespace: &str,
        records: Vec<TextRecord>,
    ) -> Result<(), VectorDbError> {
        let upsert_failed = |message: &str| VectorDbError::UpsertFailed {
            namespace: namespace.to_string(),
            message: message.to_string(),
        };

        self.upsert_batches
            .write()
            .map_err(|_| upsert_failed("lock poisoned"))?
            .push((namespace.to_string(), records.len()));

        if self.fail_upsert.load(Ordering::SeqCst) {
            return Err(upsert_failed("injected failure"));
        }

        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|_| upsert_failed("lock poisoned"))?;
        let ns = namespaces.entry(namespace.to_string()).or_default();
        for record in records {
            ns.insert(record.id.clone(), record);
        }

        Ok(())
    }

    async fn search_records(
        &self,
        namespace: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        let search_failed = |message: &str| VectorDbError::SearchFailed {
            namespace: namespace.to_string(),
            message: message.to_string(),
        };

        self.searches
            .write()
            .map_err(|_| search_failed("lock poisoned"))?
            .push((namespace.to_string(), request.clone()));

        let delay = self.search_delay.read().ok().and_then(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_search.load(Ordering::SeqCst) {
            return Err(search_failed("injected failure"));
        }

        let namespaces = self
            .namespaces
            .read()
            .map_err(|_| search_failed("lock poisoned"))?;

        let Some(records) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<SearchHit> = records
            .values()
            .map(|record| SearchHit {
                id: record.id.clone(),
                score: text_similarity(&request.text, &record.chunk_text),
                fields: HitFields {
                    chunk_text: record.chunk_text.clone(),
                    title: Some(record.title.clone()),
                    source: None,
                    citations: record.citations,
                },
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(request.top_k);
        if let Some(rerank) = &request.rerank {
            hits.truncate(rerank.top_n);
        }

        Ok(hits)
    }

    async fn delete_records(
        &self,
        namespace: &str,
        ids: Vec<String>,
    ) -> Result<(), VectorDbError> {
        let delete_failed = |message: &str| VectorDbError::DeleteFailed {
            namespace: namespace.to_string(),
            message: message.to_string(),
        };

        self.delete_batches
            .write()
            .map_err(|_| delete_failed("lock poisoned"))?
            .push((namespace.to_string(), ids.len()));

        let delay = self.delete_delay.read().ok().and_then(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(delete_failed("injected failure"));
        }

        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|_| delete_failed("lock poisoned"))?;
        if let Some(records) = namespaces.get_mut(namespace) {
            for id in &ids {
                records.remove(id);
            }
        }

        Ok(())
    }
}

/// Cosine similarity over lowercase word sets, in `[0, 1]`.
pub fn text_similarity(a: &str, b: &str) -> f32 {
    let a = word_set(a);
    let b = word_set(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(&b).count() as f32;
    shared / ((a.len() as f32).sqrt() * (b.len() as f32).sqrt())
}

fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
