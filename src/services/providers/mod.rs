//! Sources of display metadata for recommended titles.

use crate::{error::AppResult, models::MovieLookup};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Looks up display metadata by exact title
///
/// A title the provider does not know is `Ok(MovieLookup::NotFound)`, not an
/// error; errors are reserved for transport and upstream failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch(&self, title: &str) -> AppResult<MovieLookup>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
