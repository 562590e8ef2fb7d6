use crate::cache::{Cache, CachePolicy, CacheSeed};
use crate::client::core::CompletionClient;
use crate::types::{CompletionRequest, CompletionResponse};
use crate::Result;

/// One logical call with optional per-call overrides.
///
/// Overrides apply to this call only; the client's default policy and cache
/// are never mutated by a call.
#[must_use = "a call does nothing until execute() is awaited"]
pub struct CompletionCall<'a> {
    client: &'a CompletionClient,
    request: CompletionRequest,
    policy: Option<CachePolicy>,
    cache: Option<Cache>,
}

impl<'a> CompletionCall<'a> {
    pub(crate) fn new(client: &'a CompletionClient, request: CompletionRequest) -> Self {
        Self {
            client,
            request,
            policy: None,
            cache: None,
        }
    }

    /// Cache this call under the given seed instead of the client default.
    pub fn cache_seed(mut self, seed: impl Into<CacheSeed>) -> Self {
        self.policy = Some(CachePolicy::Seed(seed.into()));
        self
    }

    /// Bypass caching entirely for this call, including any explicit cache
    /// configured on the client.
    pub fn no_cache(mut self) -> Self {
        self.policy = Some(CachePolicy::Disabled);
        self
    }

    /// Use an explicit cache for this call. Takes precedence over every
    /// other scope source.
    pub fn cache(mut self, cache: &Cache) -> Self {
        self.cache = Some(cache.clone());
        self
    }

    pub async fn execute(self) -> Result<CompletionResponse> {
        self.client
            .execute(self.request, self.policy, self.cache)
            .await
    }
}
