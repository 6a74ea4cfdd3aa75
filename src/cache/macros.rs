/// Returns the cached value for a key, or awaits `$block`, stores its
/// result and returns it.
///
/// `$cache` must implement [`MetadataCache`](crate::cache::MetadataCache);
/// errors from either side propagate with `?`, so this expands to an
/// `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let lookup = cached!(self.cache, CacheKey::MovieInfo(title.to_string()), async move {
///     self.provider.fetch(title).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.put(&key, &value).await?;
            Ok(value)
        }
    }};
}
