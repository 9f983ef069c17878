//! Page data cache using moka
//!
//! Server-side cache of the data each public page is rendered from, keyed by
//! page path. Writes to a collection invalidate the pages configured for it
//! in [`ContentConfig::revalidate`](crate::ContentConfig).

use crate::config::ContentConfig;
use indexmap::IndexMap;
use moka::future::Cache;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache (approximate until pending tasks run)
    pub entry_count: u64,
}

/// Cache of page data with collection-driven invalidation
#[derive(Debug, Clone)]
pub struct PageCache {
    inner: Cache<String, Arc<Value>>,
    revalidate: Arc<IndexMap<String, Vec<String>>>,
}

impl PageCache {
    /// Create cache with max capacity and no invalidation rules
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
            revalidate: Arc::new(IndexMap::new()),
        }
    }

    /// Create cache from editor configuration
    #[must_use]
    pub fn from_config(config: &ContentConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.cache_capacity);
        if config.cache_ttl_secs > 0 {
            builder = builder.time_to_live(Duration::from_secs(config.cache_ttl_secs));
        }
        Self {
            inner: builder.build(),
            revalidate: Arc::new(config.revalidate.clone()),
        }
    }

    /// Insert page data
    #[inline]
    pub async fn insert(&self, page: impl Into<String>, data: Value) {
        self.inner.insert(page.into(), Arc::new(data)).await;
    }

    /// Get page data from cache
    #[inline]
    pub async fn get(&self, page: &str) -> Option<Arc<Value>> {
        self.inner.get(page).await
    }

    /// Get cached page data or fetch it
    ///
    /// A failed fetch is not cached.
    ///
    /// # Errors
    /// Returns the fetch error
    pub async fn try_get_or_fetch<E, F, Fut>(&self, page: &str, fetch: F) -> Result<Arc<Value>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(cached) = self.get(page).await {
            return Ok(cached);
        }

        let data = Arc::new(fetch().await?);
        self.inner.insert(page.to_string(), Arc::clone(&data)).await;
        Ok(data)
    }

    /// Invalidate a single page
    #[inline]
    pub async fn invalidate(&self, page: &str) {
        self.inner.invalidate(page).await;
    }

    /// Invalidate every page affected by a write to `collection`
    ///
    /// Returns the invalidated page paths.
    pub async fn invalidate_collection(&self, collection: &str) -> Vec<String> {
        let pages = self.revalidate.get(collection).cloned().unwrap_or_default();
        for page in &pages {
            self.inner.invalidate(page.as_str()).await;
        }
        if !pages.is_empty() {
            tracing::debug!("Invalidated {} page(s) for {}", pages.len(), collection);
        }
        pages
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}
