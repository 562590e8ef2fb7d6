//! Typed cache store: a seed paired with a backend.

use super::backend::{CacheBackend, DiskCache, MemoryCache};
use super::key::{CacheKey, CacheSeed};
use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// A cache scope: one namespace (seed) over one storage backend.
///
/// Cloning is cheap (the backend is shared), which is how a per-call
/// explicit cache is handed to the orchestrator without transferring
/// ownership. Dropping the last clone releases the backend; callers that
/// want deterministic release on all exit paths call [`Cache::close`].
#[derive(Clone)]
pub struct Cache {
    seed: CacheSeed,
    backend: Arc<dyn CacheBackend>,
}

impl Cache {
    /// Disk-backed cache under `<root>/<seed>`.
    pub fn disk(seed: impl Into<CacheSeed>, root: impl AsRef<Path>) -> Self {
        let seed = seed.into();
        let backend = Arc::new(DiskCache::new(root, &seed));
        Self { seed, backend }
    }

    /// In-memory cache for the given namespace.
    pub fn memory(seed: impl Into<CacheSeed>) -> Self {
        Self {
            seed: seed.into(),
            backend: Arc::new(MemoryCache::new()),
        }
    }

    /// Wrap a custom backend. The orchestrator only ever sees this
    /// capability interface, never a concrete variant.
    pub fn with_backend(seed: impl Into<CacheSeed>, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            seed: seed.into(),
            backend,
        }
    }

    pub fn seed(&self) -> &CacheSeed {
        &self.seed
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Look up a stored value. A decode failure on a stored blob is logged
    /// and reported as a miss: the entry is unreadable, and the subsequent
    /// successful call overwrites it.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        match self.backend.get(key).await? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    warn!(key = %key, backend = self.backend.name(), error = %e, "corrupt cache entry, treating as miss");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub async fn put<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.put(key, &bytes).await
    }

    /// Release backend handles. Idempotent.
    pub async fn close(&self) -> Result<()> {
        self.backend.close().await
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("seed", &self.seed)
            .field("backend", &self.backend.name())
            .finish()
    }
}
