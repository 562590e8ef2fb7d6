//! Legacy on-disk cache layout.
//!
//! Older client versions had no explicit cache parameter and wrote every
//! entry under a fixed directory, one subdirectory per seed. The resolver
//! here preserves that layout so previously cached data keeps working. It
//! is consulted only when neither a per-call nor a client-level cache is
//! configured; explicit roots and this one never share entries, even for
//! equal seed values.

use super::key::CacheSeed;
use super::store::Cache;
use std::path::Path;

/// Historical cache root, relative to the working directory.
pub const LEGACY_CACHE_DIR: &str = ".cache";

/// Cache generation used by older clients when no seed was given.
pub const LEGACY_DEFAULT_CACHE_SEED: i64 = 41;

/// Resolve a seed to a disk cache under the historical root.
pub fn legacy_cache(seed: &CacheSeed) -> Cache {
    legacy_cache_at(LEGACY_CACHE_DIR, seed)
}

/// Resolve against an alternate root. The client builder uses this for its
/// test-facing root override; production paths go through [`legacy_cache`].
pub fn legacy_cache_at(root: impl AsRef<Path>, seed: &CacheSeed) -> Cache {
    Cache::disk(seed.clone(), root)
}
