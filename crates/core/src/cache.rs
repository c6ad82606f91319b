//! In-memory lookahead cache for search results.
//!
//! Maps a normalised query (plus its row limit) to the cities it produced.
//! There is no TTL and no per-entry eviction: once the entry count passes a
//! threshold the whole map is dropped by `reset_if_over`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::City;
use crate::query::Limit;

/// Cache key: trimmed query text and the limit it was fetched with.
///
/// Equality is exact and case-sensitive on the query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub limit: Limit,
}

impl CacheKey {
    pub fn new(query: impl Into<String>, limit: Limit) -> Self {
        Self { query: query.into(), limit }
    }
}

/// Shared, process-wide result cache.
///
/// Uses a HashMap behind a tokio RwLock; results are stored as `Arc<[City]>`
/// so hits are a refcount bump rather than a deep copy.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<CacheKey, Arc<[City]>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match lookup.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<[City]>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Insert or overwrite an entry.
    pub async fn put(&self, key: CacheKey, results: Arc<[City]>) {
        self.entries.write().await.insert(key, results);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Current entry count.
    pub async fn size(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Clear everything if the entry count exceeds `max`.
    ///
    /// The check and the clear happen under one write lock. Returns the
    /// number of entries dropped (0 when under the threshold).
    pub async fn reset_if_over(&self, max: usize) -> usize {
        let mut entries = self.entries.write().await;
        let len = entries.len();
        if len > max {
            entries.clear();
            tracing::debug!(dropped = len, threshold = max, "query cache reset");
            len
        } else {
            0
        }
    }
}
