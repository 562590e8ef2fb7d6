use crate::cache::legacy::legacy_cache_at;
use crate::cache::{Cache, CacheKeyDeriver, CachePolicy};
use crate::client::builder::CompletionClientBuilder;
use crate::client::call::CompletionCall;
use crate::provider::CompletionProvider;
use crate::types::{CompletionRequest, CompletionResponse};
use crate::usage::{PriceTable, UsageLedger, UsageScope, UsageSummary};
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Orchestrator in front of a remote completion service.
///
/// For each logical call it resolves the effective cache scope, derives the
/// cache key, and either serves the stored response or performs the remote
/// call, stores the result, and updates the usage ledgers. Side effects are
/// strictly ordered: on a miss the cache write precedes the ledger update,
/// and a failed remote call writes nothing anywhere.
pub struct CompletionClient {
    pub(crate) provider: Arc<dyn CompletionProvider>,
    pub(crate) default_model: String,
    pub(crate) deriver: CacheKeyDeriver,
    pub(crate) policy: CachePolicy,
    pub(crate) cache: Option<Cache>,
    pub(crate) price_table: Arc<dyn PriceTable>,
    pub(crate) legacy_root: PathBuf,
    pub(crate) ledger: Mutex<UsageLedger>,
}

impl CompletionClient {
    pub fn builder() -> CompletionClientBuilder {
        CompletionClientBuilder::new()
    }

    /// Start a call. Per-call overrides (seed, explicit cache, bypass) ride
    /// on the returned builder; `execute` runs the call.
    pub fn completion(&self, request: CompletionRequest) -> CompletionCall<'_> {
        CompletionCall::new(self, request)
    }

    /// Run a call with the client defaults.
    pub async fn create(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.completion(request).execute().await
    }

    /// Summary of calls that reached the remote service; `None` when none
    /// were recorded since the last clear.
    pub fn actual_usage_summary(&self) -> Option<UsageSummary> {
        self.usage_summary(UsageScope::Actual)
    }

    /// Summary of every served response, cache hits included.
    pub fn total_usage_summary(&self) -> Option<UsageSummary> {
        self.usage_summary(UsageScope::Total)
    }

    pub fn usage_summary(&self, scope: UsageScope) -> Option<UsageSummary> {
        self.ledger.lock().unwrap().summary(scope)
    }

    /// Reset one ledger to the no-records state.
    pub fn clear_usage(&self, scope: UsageScope) {
        self.ledger.lock().unwrap().clear(scope);
    }

    /// Reset both ledgers.
    pub fn clear_usage_summary(&self) {
        self.ledger.lock().unwrap().clear_all();
    }

    /// Human-readable report over both ledgers. Formatting only.
    pub fn usage_report(&self) -> String {
        self.ledger.lock().unwrap().report()
    }

    pub fn print_usage_summary(&self) {
        println!("{}", self.usage_report());
    }

    pub(crate) async fn execute(
        &self,
        request: CompletionRequest,
        policy_override: Option<CachePolicy>,
        cache_override: Option<Cache>,
    ) -> Result<CompletionResponse> {
        let model = self.validate(&request)?;
        let scope = self.resolve_scope(policy_override, cache_override);

        let key = match &scope {
            Some(cache) => Some(self.deriver.derive(&request, &model, cache.seed())?),
            None => None,
        };

        if let (Some(cache), Some(key)) = (&scope, &key) {
            if let Some(response) = cache.get::<CompletionResponse>(key).await? {
                debug!(%key, backend = cache.backend_name(), "cache hit");
                self.record(&model, &response, false);
                return Ok(response);
            }
            debug!(%key, backend = cache.backend_name(), "cache miss");
        }

        let mut response = self.provider.call(&request, &model).await?;
        response.cost = match &request.price {
            Some(price) => price.cost(
                response.usage.prompt_tokens,
                response.usage.completion_tokens,
            ),
            None => self.price_table.price_for(
                &model,
                response.usage.prompt_tokens,
                response.usage.completion_tokens,
            ),
        };

        if let (Some(cache), Some(key)) = (&scope, &key) {
            cache.put(key, &response).await?;
        }
        self.record(&model, &response, true);
        Ok(response)
    }

    /// Effective cache scope, most specific first: per-call cache, per-call
    /// bypass, client-level cache, then the implicit legacy backend for the
    /// effective seed policy.
    fn resolve_scope(
        &self,
        policy_override: Option<CachePolicy>,
        cache_override: Option<Cache>,
    ) -> Option<Cache> {
        if let Some(cache) = cache_override {
            return Some(cache);
        }
        if matches!(policy_override, Some(CachePolicy::Disabled)) {
            return None;
        }
        if let Some(cache) = &self.cache {
            if let Some(CachePolicy::Seed(seed)) = &policy_override {
                warn!(%seed, "per-call cache seed ignored: an explicit cache is configured");
            }
            return Some(cache.clone());
        }
        match policy_override.as_ref().unwrap_or(&self.policy) {
            CachePolicy::Disabled => None,
            CachePolicy::Seed(seed) => Some(legacy_cache_at(&self.legacy_root, seed)),
        }
    }

    /// Fail fast on malformed requests, before any remote call or ledger
    /// mutation. Returns the effective model.
    fn validate(&self, request: &CompletionRequest) -> Result<String> {
        match (&request.prompt, request.messages.is_empty()) {
            (Some(_), false) => {
                return Err(Error::configuration(
                    "request carries both messages and a prompt; use exactly one form",
                ))
            }
            (None, true) => {
                return Err(Error::configuration(
                    "request carries neither messages nor a prompt",
                ))
            }
            _ => {}
        }
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        if model.is_empty() {
            return Err(Error::configuration("no model configured for the request"));
        }
        Ok(model)
    }

    fn record(&self, model: &str, response: &CompletionResponse, actual: bool) {
        let model = if response.model.is_empty() {
            model
        } else {
            response.model.as_str()
        };
        self.ledger.lock().unwrap().record(
            model,
            response.usage.prompt_tokens,
            response.usage.completion_tokens,
            response.cost,
            actual,
        );
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("default_model", &self.default_model)
            .field("policy", &self.policy)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
