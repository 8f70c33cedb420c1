//! In-process TTL cache for classification results
//!
//! Keyed by image reference. Entries expire lazily: an expired entry is
//! removed by the lookup that finds it, never by a background task. The
//! cache is constructed explicitly and injected wherever it is needed, so
//! tests get isolation from a fresh instance.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::ColorAnalysis;

/// Freshness window for cached results
const DEFAULT_TTL: Duration = Duration::from_secs(600);
/// Default bound on live entries
const DEFAULT_MAX_ENTRIES: usize = 1024;

/// One cached classification plus the instant it was stored
struct CacheEntry {
    analysis: ColorAnalysis,
    stored_at: Instant,
}

/// Time-bounded memoizing store for per-image analysis results
pub struct AnalysisCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_TTL, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_limits(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Returns the cached result for `key` while it is still fresh
    ///
    /// An entry older than the freshness window is removed during this call
    /// and the lookup reports a miss. Readers on different keys share the
    /// read lock; the write lock is only taken to drop an expired entry.
    pub async fn lookup(&self, key: &str) -> Option<ColorAnalysis> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    tracing::debug!(key = %key, "Analysis cache hit");
                    return Some(entry.analysis.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        // Re-check under the write lock; a concurrent store may have
        // refreshed the entry since the read lock was released.
        if let Some(entry) = entries.get(key) {
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.analysis.clone());
            }
            entries.remove(key);
            tracing::debug!(key = %key, "Expired analysis evicted");
        }
        None
    }

    /// Stores a result for `key`, overwriting any existing entry
    ///
    /// When the cache is full and `key` is new, the stalest entry is evicted
    /// to keep the entry count bounded.
    pub async fn store(&self, key: &str, analysis: ColorAnalysis) {
        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            let stalest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(stalest) = stalest {
                entries.remove(&stalest);
                tracing::debug!(evicted = %stalest, max_entries = self.max_entries, "Analysis cache at capacity");
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                analysis,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, expired or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
