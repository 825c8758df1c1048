use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::SESSION_TOKEN_LEN;
use crate::vectordb::VectorIndex;

/// Random per-session identifier: 8 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn mint() -> Self {
        let mut hex = Uuid::new_v4().simple().to_string();
        hex.truncate(SESSION_TOKEN_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Session namespace `{prefix}-{token}`.
    pub fn namespace(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.0)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tracks every id written during a session and deletes them on release.
///
/// Ids are tracked before the write that carries them and stay tracked until
/// their delete call has returned. If the guard is dropped before that (the
/// session future was cancelled, possibly mid-cleanup), whatever is still
/// tracked is purged on the current runtime.
pub(crate) struct SessionGuard {
    index: Arc<dyn VectorIndex>,
    namespace: String,
    ids: Vec<String>,
    delete_batch_size: usize,
    released: bool,
}

impl SessionGuard {
    pub(crate) fn new(index: Arc<dyn VectorIndex>, namespace: String, delete_batch_size: usize) -> Self {
        Self {
            index,
            namespace,
            ids: Vec::new(),
            delete_batch_size,
            released: false,
        }
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    pub(crate) fn track<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.ids.extend(ids);
    }

    /// Deletes tracked ids batch by batch. A batch leaves the guard only once
    /// its delete call has returned.
    pub(crate) async fn release(mut self) -> usize {
        let total = self.ids.len();
        let batch_size = self.delete_batch_size.max(1);
        let mut deleted = 0;

        while !self.ids.is_empty() {
            let end = batch_size.min(self.ids.len());
            let batch = self.ids[..end].to_vec();
            if delete_batch(self.index.as_ref(), &self.namespace, batch).await {
                deleted += end;
            }
            self.ids.drain(..end);
        }

        self.released = true;
        if total > 0 {
            info!(namespace = %self.namespace, deleted, total, "Session cleanup finished");
        }
        deleted
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.released || self.ids.is_empty() {
            return;
        }

        let index = Arc::clone(&self.index);
        let namespace = std::mem::take(&mut self.namespace);
        let ids = std::mem::take(&mut self.ids);
        let batch = self.delete_batch_size;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(namespace = %namespace, ids = ids.len(), "Session abandoned, purging in background");
                handle.spawn(async move {
                    purge(index.as_ref(), &namespace, ids, batch).await;
                });
            }
            Err(_) => {
                warn!(namespace = %namespace, ids = ids.len(), "Session abandoned outside a runtime, records left behind");
            }
        }
    }
}

async fn delete_batch(index: &dyn VectorIndex, namespace: &str, batch: Vec<String>) -> bool {
    let len = batch.len();
    match index.delete_records(namespace, batch).await {
        Ok(()) => {
            debug!(namespace = %namespace, batch = len, "Deleted session batch");
            true
        }
        Err(e) => {
            warn!(namespace = %namespace, batch = len, error = %e, "Failed to delete session batch");
            false
        }
    }
}

/// Deletes `ids` in batches. Failures are logged; returns the number of ids
/// in batches that succeeded.
async fn purge(
    index: &dyn VectorIndex,
    namespace: &str,
    ids: Vec<String>,
    batch_size: usize,
) -> usize {
    if ids.is_empty() {
        return 0;
    }

    let total = ids.len();
    let mut deleted = 0;
    for batch in ids.chunks(batch_size.max(1)) {
        if delete_batch(index, namespace, batch.to_vec()).await {
            deleted += batch.len();
        }
    }

    info!(namespace = %namespace, deleted, total, "Session cleanup finished");
    deleted
}
