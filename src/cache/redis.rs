use redis::AsyncCommands;
use redis::Client;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{CacheKey, MetadataCache};
use crate::{
    error::{AppError, AppResult},
    models::{CachedLookup, MovieLookup},
};

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Shared Redis cache; entries expire after `ttl` seconds
#[derive(Clone)]
pub struct RedisCache {
    redis_client: Client,
    ttl: u64,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<usize>,
}

impl CacheWriterHandle {
    /// Signals the writer task and waits until pending writes are flushed
    ///
    /// Returns the number of writes the task attempted over its lifetime.
    pub async fn shutdown(self) -> usize {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        match self.writer.await {
            Ok(attempted) => attempted,
            Err(e) => {
                tracing::error!(error = %e, "Cache writer task failed");
                0
            }
        }
    }
}

impl RedisCache {
    /// Creates the cache and spawns its background writer
    ///
    /// Writes go through a channel so a slow Redis never delays a response.
    pub fn new(redis_client: Client, ttl: u64) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(Self::cache_writer_task(client, write_rx, shutdown_rx));

        let cache = Self {
            redis_client,
            ttl,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, writer })
    }

    /// Drains write messages until shutdown, then flushes what is left
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) -> usize {
        tracing::info!("Cache writer task started");
        let mut attempted = 0;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    attempted += 1;
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    while let Some(msg) = write_rx.recv().await {
                        attempted += 1;
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!(attempted, "Cache writer task stopped");
                    return attempted;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Queues a write and returns immediately
    fn set_in_background(&self, key: &CacheKey, value: &CachedLookup) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl: self.ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[async_trait::async_trait]
impl MetadataCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<MovieLookup>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let entry: CachedLookup = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                tracing::debug!(key = %key, cached_at = %entry.cached_at, "Redis cache hit");
                Ok(Some(entry.lookup))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &CacheKey, value: &MovieLookup) -> AppResult<()> {
        self.set_in_background(key, &CachedLookup::now(value.clone()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
