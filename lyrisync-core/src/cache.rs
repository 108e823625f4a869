//! Time-to-live cache for a provider's song index.

use crate::error::Result;
use crate::matcher::IndexEntry;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// How long a fetched index stays fresh (5 minutes)
pub const INDEX_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// A fetched index and when it was fetched
#[derive(Debug)]
pub struct CachedIndex {
    pub entries: Arc<[IndexEntry]>,
    pub fetched_at: Instant,
}

impl CachedIndex {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Index cache owned by one provider.
///
/// The cached value is only ever replaced as a whole. Concurrent lookups
/// that find it stale may each refresh it; readers see either the old or
/// the new index, never a mix.
#[derive(Debug)]
pub struct IndexCache {
    ttl: Duration,
    inner: RwLock<Option<Arc<CachedIndex>>>,
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexCache {
    /// Create an empty cache with the default TTL
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(INDEX_CACHE_TTL)
    }

    /// Create an empty cache with a custom TTL
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(None),
        }
    }

    /// Get the cached index if it is still fresh
    pub async fn get(&self) -> Option<Arc<[IndexEntry]>> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|cached| cached.is_fresh(self.ttl))
            .map(|cached| Arc::clone(&cached.entries))
    }

    /// Return the fresh cached index, or run `fetch` and store its result.
    ///
    /// The lock is not held while `fetch` runs. A failed fetch leaves the
    /// previous value in place and returns the error.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` returns.
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<Arc<[IndexEntry]>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<IndexEntry>>> + Send,
    {
        if let Some(entries) = self.get().await {
            debug!("Using cached index ({} entries)", entries.len());
            return Ok(entries);
        }

        debug!("Index cache empty or stale, refreshing");
        let entries: Arc<[IndexEntry]> = fetch().await?.into();

        let fresh = Arc::new(CachedIndex {
            entries: Arc::clone(&entries),
            fetched_at: Instant::now(),
        });
        *self.inner.write().await = Some(fresh);

        Ok(entries)
    }

    /// Drop the cached value
    pub async fn invalidate(&self) {
        *self.inner.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entries(n: usize) -> Vec<IndexEntry> {
        (0..n)
            .map(|i| IndexEntry::new("Artist", format!("Song {i}"), format!("{i}.json")))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_cache_fetches() {
        let cache = IndexCache::new();
        assert!(cache.get().await.is_none());

        let index = cache.get_or_refresh(|| async { Ok(entries(2)) }).await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(cache.get().await.unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_cache_is_reused() {
        let cache = IndexCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .get_or_refresh(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(entries(1))
                })
                .await
                .unwrap();
            tokio::time::advance(Duration::from_secs(60)).await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_cache_is_replaced() {
        let cache = IndexCache::new();
        cache.get_or_refresh(|| async { Ok(entries(1)) }).await.unwrap();

        tokio::time::advance(INDEX_CACHE_TTL + Duration::from_secs(1)).await;
        assert!(cache.get().await.is_none());

        let index = cache.get_or_refresh(|| async { Ok(entries(3)) }).await.unwrap();
        assert_eq!(index.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_surfaces_error() {
        let cache = IndexCache::with_ttl(Duration::from_secs(1));
        cache.get_or_refresh(|| async { Ok(entries(1)) }).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        let result = cache
            .get_or_refresh(|| async { Err(CoreError::invalid_format("bad index")) })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = IndexCache::new();
        cache.get_or_refresh(|| async { Ok(entries(1)) }).await.unwrap();
        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_readers_keep_their_snapshot() {
        let cache = IndexCache::with_ttl(Duration::ZERO);
        let first = cache.get_or_refresh(|| async { Ok(entries(1)) }).await.unwrap();
        let second = cache.get_or_refresh(|| async { Ok(entries(4)) }).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 4);
    }
}
