use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::client::PaperSearch;
use super::error::PaperSearchError;
use super::model::{PaperQuery, RawWork};

/// Returns a fixed list of works, truncated to the query limit.
#[derive(Default)]
pub struct MockPaperSearch {
    works: RwLock<Vec<RawWork>>,
    queries: RwLock<Vec<PaperQuery>>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockPaperSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_works(works: Vec<RawWork>) -> Self {
        Self {
            works: RwLock::new(works),
            ..Self::default()
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<PaperQuery> {
        self.queries.read().map(|q| q.clone()).unwrap_or_default()
    }
}

/// Convenience constructor for mock works.
pub fn raw_work(title: &str, full_text: Option<&str>, abstract_text: Option<&str>) -> RawWork {
    RawWork {
        title: Some(title.to_string()),
        full_text: full_text.map(str::to_string),
        abstract_text: abstract_text.map(str::to_string),
        ..RawWork::default()
    }
}

#[async_trait]
impl PaperSearch for MockPaperSearch {
    async fn search(&self, query: &PaperQuery) -> Result<Vec<RawWork>, PaperSearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.write() {
            queries.push(query.clone());
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(PaperSearchError::Status {
                status: 503,
                body: "injected failure".to_string(),
            });
        }

        let works = self
            .works
            .read()
            .map_err(|_| PaperSearchError::Decode("lock poisoned".to_string()))?;
        Ok(works.iter().take(query.limit as usize).cloned().collect())
    }
}
