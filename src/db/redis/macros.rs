/// Cache-aside wrapper around an expensive computation.
///
/// Checks the cache first; on a hit the cached value is returned as-is.
/// On a miss the block runs and its result is written back through the
/// background writer. A failing cache read is demoted to a warning and
/// the block runs anyway, so a Redis outage degrades to slower responses
/// instead of errors. The expansion evaluates to an [`AppResult`], so it
/// composes with `?` at any point in the caller, not just tail position.
///
/// [`AppResult`]: crate::error::AppResult
///
/// # Arguments
/// * `$cache`: The cache instance, providing `get_from_cache` and
///   `set_in_background`.
/// * `$key`: The `CacheKey` for this value.
/// * `$ttl`: Time-to-live for the cached value, in seconds.
/// * `$block`: Async block computing the value on a miss.
///
/// # Example
/// ```ignore
/// let outcome = cached!(cache, cache_key, 300, async move {
///     compute_expensive_value().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok::<_, $crate::error::AppError>(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, computing live");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
