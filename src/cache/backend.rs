//! Cache backend implementations.

use super::key::{CacheKey, CacheSeed};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Capability interface for cache storage.
///
/// Backends store opaque bytes; typed (de)serialization happens one layer
/// up in [`super::store::Cache`]. Construction is the "open" of the scoped
/// lifecycle; `close` releases any handles and is safe to call repeatedly.
/// `get` and `put` must be callable from concurrent logical requests
/// sharing one root without corrupting entries under different keys.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &CacheKey, value: &[u8]) -> Result<()>;
    async fn close(&self) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Disk-backed cache: one JSON file per key under `<root>/<seed>`.
///
/// The seed directory is created lazily on the first `put`; a `get` that
/// misses never creates it. Writes land in a uniquely named temp file and
/// are renamed into place, so a reader never observes a torn entry.
pub struct DiskCache {
    dir: PathBuf,
}

static WRITE_SERIAL: AtomicU64 = AtomicU64::new(0);

impl DiskCache {
    pub fn new(root: impl AsRef<Path>, seed: &CacheSeed) -> Self {
        Self {
            dir: root.as_ref().join(seed.as_str()),
        }
    }

    /// Physical location of the seed directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl CacheBackend for DiskCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::backend(path, e)),
        }
    }

    async fn put(&self, key: &CacheKey, value: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::backend(self.dir.clone(), e))?;
        let path = self.entry_path(key);
        let tmp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            key,
            std::process::id(),
            WRITE_SERIAL.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| Error::backend(tmp.clone(), e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::backend(path, e))
    }

    async fn close(&self) -> Result<()> {
        // No handles are held between operations.
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}

/// In-memory cache. No TTL and no eviction: entries live until the backend
/// is dropped, matching the never-mutated lifecycle of stored responses.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key.as_str()).cloned())
    }

    async fn put(&self, key: &CacheKey, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.as_str().to_string(), value.to_vec());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
