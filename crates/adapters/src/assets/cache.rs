use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bag_config_application::{ApplicationError, AssetLoader};
use bag_config_domain::SceneRoot;
use log::debug;
use lru::LruCache;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// URL-keyed scene cache with least-recently-used eviction.
///
/// Handles are shared; callers that mutate a scene clone it first. Failed
/// loads are not remembered, so the next request for the URL tries again.
pub struct CachedAssetLoader {
    inner: Arc<dyn AssetLoader>,
    cache: Mutex<LruCache<String, Arc<SceneRoot>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedAssetLoader {
    pub fn new(inner: Arc<dyn AssetLoader>, capacity: usize) -> Result<Self, ApplicationError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            ApplicationError::InvalidInput("asset cache capacity must be non-zero".to_string())
        })?;
        Ok(Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn stats(&self) -> Result<CacheStats, ApplicationError> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| ApplicationError::Io("asset cache lock poisoned".to_string()))?;
        Ok(CacheStats {
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
            entries: cache.len(),
        })
    }
}

impl AssetLoader for CachedAssetLoader {
    fn resolve(&self, url: &str) -> Result<Arc<SceneRoot>, ApplicationError> {
        {
            let mut cache = self
                .cache
                .lock()
                .map_err(|_| ApplicationError::Io("asset cache lock poisoned".to_string()))?;
            if let Some(scene) = cache.get(url) {
                self.hits.fetch_add(1, Ordering::SeqCst);
                debug!("asset cache hit: {url}");
                return Ok(Arc::clone(scene));
            }
        }

        // Loaded without holding the lock; a racing load of the same URL just overwrites.
        self.misses.fetch_add(1, Ordering::SeqCst);
        let scene = self.inner.resolve(url)?;

        let mut cache = self
            .cache
            .lock()
            .map_err(|_| ApplicationError::Io("asset cache lock poisoned".to_string()))?;
        if let Some((evicted, _)) = cache.push(url.to_string(), Arc::clone(&scene)) {
            if evicted != url {
                debug!("asset cache evicted {evicted}");
            }
        }
        Ok(scene)
    }
}
