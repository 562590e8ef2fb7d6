//! Response caching: key derivation, pluggable backends, and the legacy
//! on-disk layout.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheKeyDeriver`] | Canonicalizing SHA-256 key derivation |
//! | [`CacheBackend`] | Capability interface for storage variants |
//! | [`DiskCache`] / [`MemoryCache`] | Concrete backends |
//! | [`Cache`] | Seed + backend with typed get/put |
//! | [`legacy_cache`] | Resolver for the historical fixed-root layout |
//!
//! A `Cache` is a namespace over a backend: the seed picks the physical
//! location (for disk variants, `<root>/<seed>`) and also participates in
//! key derivation, so entries written under different seeds can never be
//! served for one another.

mod backend;
mod key;
pub mod legacy;
mod store;

pub use backend::{CacheBackend, DiskCache, MemoryCache};
pub use key::{CacheKey, CacheKeyDeriver, CachePolicy, CacheSeed};
pub use legacy::{legacy_cache, LEGACY_CACHE_DIR, LEGACY_DEFAULT_CACHE_SEED};
pub use store::Cache;
