use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use herald_types::{CacheEntry, TtlClass};
use thiserror::Error;
use std::time::Instant;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Backend(String),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Response Cache (spec.md §4.C). Writes never block reads; stale entries
/// are never served — after TTL the next caller pays the fetch cost
/// (spec.md §5, "stale-while-revalidate is not used").
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str, ttl: Duration) -> Result<Option<Vec<u8>>, CacheError>;
    async fn put(&self, key: &str, body: Vec<u8>, class: TtlClass) -> Result<(), CacheError>;
    async fn invalidate(&self, prefix: &str) -> Result<(), CacheError>;
    async fn stats(&self) -> CacheStats;
}

struct Inner {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// In-process cache; writes are last-writer-wins, no explicit locking beyond
/// the single mutex (spec.md §5 — "writes are last-writer-wins; no explicit
/// locking"). A clustered backend would implement the same [`Cache`] trait.
pub struct InMemoryCache {
    inner: Mutex<Inner>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str, ttl: Duration) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let hit = match inner.entries.get(key) {
            Some(entry) if !entry.is_expired(now, ttl) => Some(entry.body.clone()),
            _ => None,
        };
        if hit.is_some() {
            inner.hits += 1;
        } else {
            inner.misses += 1;
        }
        Ok(hit)
    }

    async fn put(&self, key: &str, body: Vec<u8>, class: TtlClass) -> Result<(), CacheError> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                canonical_key: key.to_string(),
                body,
                inserted_at: Instant::now(),
                ttl_class: class,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, prefix: &str) -> Result<(), CacheError> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.entries.retain(|k, _| !k.starts_with(prefix));
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().expect("cache lock poisoned");
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_before_ttl_returns_same_bytes() {
        let cache = InMemoryCache::new();
        cache
            .put("riot:NA1:summoner:X", b"body".to_vec(), TtlClass::Summoner)
            .await
            .unwrap();

        let got = cache
            .get("riot:NA1:summoner:X", Duration::from_secs(900))
            .await
            .unwrap();
        assert_eq!(got, Some(b"body".to_vec()));
    }

    #[tokio::test]
    async fn get_after_ttl_is_a_miss() {
        let cache = InMemoryCache::new();
        cache
            .put("k", b"body".to_vec(), TtlClass::LiveGame)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        let got = cache.get("k", Duration::from_millis(10)).await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn invalidate_drops_matching_prefix_only() {
        let cache = InMemoryCache::new();
        cache.put("riot:NA1:a", vec![1], TtlClass::Ranked).await.unwrap();
        cache.put("riot:EUW1:a", vec![2], TtlClass::Ranked).await.unwrap();

        cache.invalidate("riot:NA1:").await.unwrap();

        assert_eq!(
            cache.get("riot:NA1:a", Duration::from_secs(60)).await.unwrap(),
            None
        );
        assert_eq!(
            cache.get("riot:EUW1:a", Duration::from_secs(60)).await.unwrap(),
            Some(vec![2])
        );
    }
}
