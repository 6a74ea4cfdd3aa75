//! Metadata cache backends.
//!
//! Lookups are keyed by exact title. Backends store the [`MovieLookup`]
//! itself, so a title OMDb does not know is remembered as well.

pub mod memory;
pub mod redis;

mod macros;

pub use memory::MemoryCache;
pub use redis::{create_redis_client, CacheWriterHandle, RedisCache};

use std::fmt::Display;

use crate::{error::AppResult, models::MovieLookup};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieInfo(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // case preserved: title lookup is exact
            CacheKey::MovieInfo(title) => write!(f, "movie_info:{}", title),
        }
    }
}

/// Storage for enrichment lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<MovieLookup>>;

    async fn put(&self, key: &CacheKey, value: &MovieLookup) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
