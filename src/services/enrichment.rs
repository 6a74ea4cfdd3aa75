use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    cache::{CacheKey, MetadataCache},
    cached,
    error::{AppError, AppResult},
    models::{MovieInfo, MovieLookup},
    services::providers::MetadataProvider,
};

/// Cached metadata lookups for recommended titles
///
/// Kept outside the recommendation core: ranking never waits on the network.
#[derive(Clone)]
pub struct EnrichmentService {
    provider: Arc<dyn MetadataProvider>,
    cache: Arc<dyn MetadataCache>,
    /// Shared across clones so the limit holds service-wide
    permits: Arc<Semaphore>,
}

/// Lookups in flight at once unless configured otherwise
pub const DEFAULT_CONCURRENCY: usize = 4;

impl EnrichmentService {
    pub fn new(provider: Arc<dyn MetadataProvider>, cache: Arc<dyn MetadataCache>) -> Self {
        tracing::info!(
            provider = provider.name(),
            cache = cache.name(),
            "Enrichment enabled"
        );
        Self {
            provider,
            cache,
            permits: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
        }
    }

    /// Caps concurrent lookups; zero is treated as one
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// Metadata for one exact title, from cache when possible
    pub async fn lookup(&self, title: &str) -> AppResult<MovieLookup> {
        cached!(
            self.cache,
            CacheKey::MovieInfo(title.to_string()),
            self.provider.fetch(title)
        )
    }

    /// Looks up every title with bounded concurrency, keeping input order
    ///
    /// A failed lookup becomes `None` so one bad title never sinks the page.
    pub async fn enrich_all(&self, titles: &[String]) -> Vec<Option<MovieInfo>> {
        let mut tasks = JoinSet::new();
        for (i, title) in titles.iter().enumerate() {
            let service = self.clone();
            let title = title.clone();
            tasks.spawn(async move {
                let result = match service.permits.clone().acquire_owned().await {
                    Ok(_permit) => service.lookup(&title).await,
                    Err(e) => Err(AppError::Internal(format!("Enrichment limiter closed: {}", e))),
                };
                (i, title, result)
            });
        }

        let mut results = vec![None; titles.len()];
        let mut failures = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((i, _, Ok(lookup))) => results[i] = lookup.into_info(),
                Ok((_, title, Err(e))) => {
                    failures += 1;
                    tracing::warn!(title = %title, error = %e, "Metadata lookup failed");
                }
                Err(e) => {
                    failures += 1;
                    tracing::error!(error = %e, "Metadata task join error");
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                requested = titles.len(),
                failures,
                "Partial enrichment failure"
            );
        }

        results
    }
}
