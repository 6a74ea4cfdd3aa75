use moka::future::Cache;

use super::{CacheKey, MetadataCache};
use crate::{
    error::AppResult,
    models::{CachedLookup, MovieLookup},
};

/// In-process cache; lives as long as the server
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, CachedLookup>,
}

impl MemoryCache {
    /// No eviction, entries kept for the process lifetime
    pub fn unbounded() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Evicts once `capacity` titles are held
    pub fn bounded(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn from_capacity(capacity: Option<u64>) -> Self {
        match capacity {
            Some(capacity) => Self::bounded(capacity),
            None => Self::unbounded(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Applies pending evictions so `entry_count` is current
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait::async_trait]
impl MetadataCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<MovieLookup>> {
        Ok(self.inner.get(&key.to_string()).await.map(|c| c.lookup))
    }

    async fn put(&self, key: &CacheKey, value: &MovieLookup) -> AppResult<()> {
        self.inner
            .insert(key.to_string(), CachedLookup::now(value.clone()))
            .await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieInfo;

    fn info(plot: &str) -> MovieLookup {
        MovieLookup::Found(MovieInfo {
            poster: None,
            plot: plot.to_string(),
            year: "1995".to_string(),
            genre: "Crime".to_string(),
            director: "Michael Mann".to_string(),
            actors: "Al Pacino".to_string(),
        })
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = MemoryCache::unbounded();
        let key = CacheKey::MovieInfo("Heat".to_string());

        assert_eq!(cache.get(&key).await.unwrap(), None);
        cache.put(&key, &info("A heist.")).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(info("A heist.")));
    }

    #[tokio::test]
    async fn test_negative_lookup_is_cached() {
        let cache = MemoryCache::unbounded();
        let key = CacheKey::MovieInfo("Nonexistent".to_string());
        cache.put(&key, &MovieLookup::NotFound).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(MovieLookup::NotFound));
    }

    #[tokio::test]
    async fn test_bounded_cache_respects_capacity() {
        let cache = MemoryCache::bounded(2);
        for i in 0..10 {
            let key = CacheKey::MovieInfo(format!("Movie {}", i));
            cache.put(&key, &info("plot")).await.unwrap();
        }
        cache.sync().await;
        assert!(cache.entry_count() <= 2);
    }

    #[tokio::test]
    async fn test_from_capacity() {
        let cache = MemoryCache::from_capacity(None);
        assert_eq!(cache.name(), "memory");
        for i in 0..10 {
            let key = CacheKey::MovieInfo(format!("Movie {}", i));
            cache.put(&key, &MovieLookup::NotFound).await.unwrap();
        }
        cache.sync().await;
        assert_eq!(cache.entry_count(), 10);
    }
}
