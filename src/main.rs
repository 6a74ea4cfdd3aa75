use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tagmatch_api::{
    cache::{create_redis_client, CacheWriterHandle, MemoryCache, MetadataCache, RedisCache},
    config::{CacheBackend, Config},
    routes::create_router,
    services::{EnrichmentService, OmdbProvider},
    state::{AppState, DatasetSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let source = DatasetSource {
        movies_csv: config.movies_csv.clone(),
        credits_csv: config.credits_csv.clone(),
        strategy: config.similarity_strategy,
    };
    let index = source
        .load()
        .await
        .context("Failed to build recommendation index")?;

    let (enrichment, cache_writer) = build_enrichment(&config)?;

    let mut state = AppState::new(index)
        .with_source(source)
        .with_default_k(config.default_recommendations)
        .with_max_detailed_k(config.max_detailed_recommendations);
    if let Some(enrichment) = enrichment {
        state = state.with_enrichment(enrichment);
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        let attempted = handle.shutdown().await;
        tracing::info!(attempted, "Cache writes flushed");
    }

    Ok(())
}

/// Provider and cache per configuration; `None` when no OMDb key is set
fn build_enrichment(
    config: &Config,
) -> anyhow::Result<(Option<EnrichmentService>, Option<CacheWriterHandle>)> {
    let Some(api_key) = config.omdb_api_key.clone() else {
        tracing::error!("OMDB_API_KEY is not set; recommendation details are disabled");
        return Ok((None, None));
    };

    let provider = OmdbProvider::new(
        api_key,
        config.omdb_api_url.clone(),
        Duration::from_millis(config.enrichment_timeout_ms),
        config.enrichment_max_retries,
    )?;

    let mut cache_writer = None;
    let cache: Arc<dyn MetadataCache> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCache::from_capacity(config.cache_capacity)),
        CacheBackend::Redis => {
            let client = create_redis_client(&config.redis_url)?;
            let (cache, handle) = RedisCache::new(client, config.cache_ttl_secs);
            cache_writer = Some(handle);
            Arc::new(cache)
        }
    };

    Ok((
        Some(
            EnrichmentService::new(Arc::new(provider), cache)
                .with_concurrency(config.enrichment_concurrency),
        ),
        cache_writer,
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
