//! # ai-cache-rust
//!
//! Deterministic response cache and usage accounting in front of a remote
//! completion-generating service.
//!
//! ## Overview
//!
//! Given a completion request, the client decides whether an equivalent
//! request was already served: on a hit it returns the stored response, on
//! a miss it calls the remote provider, stores the result, and updates the
//! running cost/usage counters. Identity is a content hash over the
//! request's canonicalized wire body, the cache seed, and the client
//! configuration fingerprint, so a cached response is never served for a
//! different logical request.
//!
//! ## Key Features
//!
//! - **Seed-scoped caching**: integer or string seeds select independent
//!   cache namespaces; disabling caching is itself a policy value
//! - **Pluggable backends**: disk and in-memory variants behind one
//!   capability interface, swappable without behavior change
//! - **Legacy layout compatibility**: the historical fixed-root on-disk
//!   cache keeps working when no explicit cache is configured
//! - **Dual usage ledger**: "actual" (remote calls only) and "total"
//!   (every served response) accumulate per-model tokens and cost
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_cache_rust::{CompletionClient, CompletionRequest, Message, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> ai_cache_rust::Result<()> {
//!     let client = CompletionClient::builder()
//!         .config(ProviderConfig::new("gpt-4o-mini"))
//!         .cache_seed(42)
//!         .build()?;
//!
//!     let request = CompletionRequest::chat(vec![Message::user("1+3=")]);
//!     let response = client.create(request.clone()).await?;
//!
//!     // Same request, same seed: served from cache, no remote call.
//!     let cached = client.create(request).await?;
//!     assert_eq!(response, cached);
//!
//!     client.print_usage_summary();
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Orchestrator, builder, and per-call overrides |
//! | [`cache`] | Key derivation, backends, legacy layout |
//! | [`usage`] | Dual usage ledger and pricing |
//! | [`provider`] | Remote-call collaborator and HTTP reference provider |
//! | [`types`] | Request, response, and message definitions |

pub mod cache;
pub mod client;
pub mod provider;
pub mod types;
pub mod usage;

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library.
pub mod error;
pub use error::Error;

// Re-export main types for convenience.
pub use cache::{
    Cache, CacheBackend, CacheKey, CacheKeyDeriver, CachePolicy, CacheSeed, DiskCache,
    MemoryCache, LEGACY_CACHE_DIR, LEGACY_DEFAULT_CACHE_SEED,
};
pub use client::{CompletionCall, CompletionClient, CompletionClientBuilder};
pub use provider::{CompletionProvider, HttpProvider, ProviderConfig, ProviderError};
pub use types::{
    Choice, CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent,
    MessageRole, PriceOverride, TokenUsage,
};
pub use usage::{ModelUsage, PriceTable, UsageScope, UsageSummary};
