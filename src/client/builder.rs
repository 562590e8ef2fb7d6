use crate::cache::{
    Cache, CacheKeyDeriver, CachePolicy, CacheSeed, LEGACY_CACHE_DIR, LEGACY_DEFAULT_CACHE_SEED,
};
use crate::client::core::CompletionClient;
use crate::provider::{CompletionProvider, HttpProvider, ProviderConfig, DEFAULT_BASE_URL};
use crate::usage::{default_price_table, PriceTable, UsageLedger};
use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Builder for [`CompletionClient`].
///
/// Keep this surface small and predictable: a provider config, an optional
/// provider implementation, the default cache policy, an optional explicit
/// cache, and a price table.
pub struct CompletionClientBuilder {
    config: Option<ProviderConfig>,
    provider: Option<Arc<dyn CompletionProvider>>,
    policy: CachePolicy,
    cache: Option<Cache>,
    price_table: Option<Arc<dyn PriceTable>>,
    /// Override the legacy cache root (primarily for tests).
    legacy_root: Option<PathBuf>,
}

impl CompletionClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            provider: None,
            policy: CachePolicy::seed(LEGACY_DEFAULT_CACHE_SEED),
            cache: None,
            price_table: None,
            legacy_root: None,
        }
    }

    /// Provider connection settings. Required.
    pub fn config(mut self, config: ProviderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Swap in a provider implementation (a mock, or a non-HTTP transport).
    /// Defaults to [`HttpProvider`] built from the config.
    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Default cache seed for calls without a per-call override.
    pub fn cache_seed(mut self, seed: impl Into<CacheSeed>) -> Self {
        self.policy = CachePolicy::Seed(seed.into());
        self
    }

    /// Disable the implicit legacy cache by default; calls hit the remote
    /// service unless a per-call override re-enables caching.
    pub fn cache_disabled(mut self) -> Self {
        self.policy = CachePolicy::Disabled;
        self
    }

    /// Client-level explicit cache; takes precedence over the seed policy.
    pub fn cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn price_table(mut self, table: Arc<dyn PriceTable>) -> Self {
        self.price_table = Some(table);
        self
    }

    /// Root directory for the implicit legacy cache (primarily for tests;
    /// the production default is [`LEGACY_CACHE_DIR`]).
    pub fn legacy_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.legacy_root = Some(root.into());
        self
    }

    pub fn build(self) -> Result<CompletionClient> {
        let config = self
            .config
            .ok_or_else(|| Error::configuration("a provider config is required"))?;
        if config.model.is_empty() {
            return Err(Error::configuration("config.model must not be empty"));
        }

        let provider: Arc<dyn CompletionProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(HttpProvider::new(&config)?),
        };
        let price_table: Arc<dyn PriceTable> = match self.price_table {
            Some(table) => table,
            None => default_price_table(),
        };

        Ok(CompletionClient {
            provider,
            default_model: config.model.clone(),
            deriver: CacheKeyDeriver::new(fingerprint(&config)),
            policy: self.policy,
            cache: self.cache,
            price_table,
            legacy_root: self
                .legacy_root
                .unwrap_or_else(|| PathBuf::from(LEGACY_CACHE_DIR)),
            ledger: Mutex::new(UsageLedger::new()),
        })
    }
}

impl Default for CompletionClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable fingerprint of the parts of the config that select which service
/// answers a request. Secrets and client-side annotations stay out: two
/// clients pointed at the same endpoint share cached entries.
fn fingerprint(config: &ProviderConfig) -> String {
    let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let mut hasher = Sha256::new();
    hasher.update(base_url.trim_end_matches('/').as_bytes());
    let digest = hasher.finalize();
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}
