//! Remote completion provider: the collaborator that actually answers a
//! request on a cache miss.
//!
//! The orchestrator only distinguishes "succeeded" from "failed"; provider
//! failures propagate to the caller unmodified, with no cache write and no
//! ledger update, so a retried call starts from a clean miss state.

mod http;

pub use http::HttpProvider;

/// Endpoint used when the config names none.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote-call collaborator interface.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn call(
        &self,
        request: &CompletionRequest,
        model: &str,
    ) -> Result<CompletionResponse, ProviderError>;
}

/// Failure surfaced by a provider. The core performs no retry.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Connection settings for the remote service.
///
/// The fingerprint of this config participates in cache-key derivation, so
/// responses fetched from different endpoints never alias. `price` concerns
/// are per-request (see [`crate::types::PriceOverride`]) and deliberately
/// absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Default model for requests that do not name one.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Service base URL; defaults to the OpenAI endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}
