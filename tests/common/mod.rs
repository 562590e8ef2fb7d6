//! Shared fixtures: deterministic mock providers and client construction.

use ai_cache_rust::{
    Choice, CompletionClient, CompletionClientBuilder, CompletionProvider, CompletionRequest,
    CompletionResponse, Message, ProviderConfig, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Deterministic in-process provider that counts how often it is reached.
///
/// The answer content depends only on the request, so two remote calls for
/// the same request produce the same choices; ids are unique per call,
/// which is how tests can tell a replayed response from a fresh one.
pub struct MockProvider {
    calls: AtomicU64,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU64::new(0),
        })
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn call(
        &self,
        request: &CompletionRequest,
        model: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let question = request
            .prompt
            .clone()
            .or_else(|| {
                request
                    .messages
                    .last()
                    .and_then(|m| m.text().map(str::to_string))
            })
            .unwrap_or_default();
        Ok(CompletionResponse {
            id: format!("mock-{n}"),
            model: model.to_string(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(format!("answer to {question:?}")),
                finish_reason: Some("stop".to_string()),
            }],
            usage: TokenUsage::new(4, 2),
            cost: 0.0,
        })
    }
}

/// Provider that always fails, for the no-side-effects-on-error paths.
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn call(
        &self,
        _request: &CompletionRequest,
        _model: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        Err(ProviderError::Http {
            status: 500,
            message: "internal error".to_string(),
        })
    }
}

/// Install a test subscriber once so `RUST_LOG` surfaces hit/miss traces.
fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Client over a mock provider with the legacy root redirected into a
/// temp directory.
pub fn mock_client(legacy_root: &Path) -> (CompletionClient, Arc<MockProvider>) {
    let provider = MockProvider::new();
    let client = builder_with(provider.clone(), legacy_root)
        .build()
        .expect("client builds");
    (client, provider)
}

pub fn builder_with(
    provider: Arc<MockProvider>,
    legacy_root: &Path,
) -> CompletionClientBuilder {
    init_tracing();
    CompletionClient::builder()
        .config(ProviderConfig::new("gpt-4o-mini"))
        .provider(provider)
        .legacy_cache_root(legacy_root)
}
