//! HTTP reference provider.

use super::{CompletionProvider, ProviderConfig, ProviderError, DEFAULT_BASE_URL};
use crate::types::{Choice, CompletionRequest, CompletionResponse, Message, TokenUsage};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Thin HTTP transport to an OpenAI-compatible completion service.
///
/// No retry and no streaming; it builds the wire body, posts it, maps
/// failure statuses to [`ProviderError`], and parses the response. Cost is
/// left at zero for the orchestrator to fill in.
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url)
            .map_err(|e| Error::configuration(format!("invalid base URL {base_url:?}: {e}")))?;

        // Env-overridable timeout, no other knobs.
        let timeout_secs = env::var("AI_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("HTTP client construction failed: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().or_else(Self::api_key_from_env),
        })
    }

    fn api_key_from_env() -> Option<String> {
        env::var("OPENAI_API_KEY").ok()
    }
}

#[async_trait]
impl CompletionProvider for HttpProvider {
    async fn call(
        &self,
        request: &CompletionRequest,
        model: &str,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        let path = if request.is_chat() {
            "/chat/completions"
        } else {
            "/completions"
        };
        let url = format!("{}{}", self.base_url, path);

        let mut req = self.client.post(&url).json(&request.wire_body(model));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if request.is_chat() {
            response
                .json::<CompletionResponse>()
                .await
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
        } else {
            // The bare completion endpoint reports `text` choices; normalize
            // them into the unified chat-shaped response model.
            let wire = response
                .json::<WireTextResponse>()
                .await
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
            Ok(wire.into_response())
        }
    }
}

#[derive(Deserialize)]
struct WireTextChoice {
    #[serde(default)]
    index: u32,
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireTextResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<WireTextChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

impl WireTextResponse {
    fn into_response(self) -> CompletionResponse {
        CompletionResponse {
            id: self.id,
            model: self.model,
            choices: self
                .choices
                .into_iter()
                .map(|c| Choice {
                    index: c.index,
                    message: Message::assistant(c.text),
                    finish_reason: c.finish_reason,
                })
                .collect(),
            usage: self.usage,
            cost: 0.0,
        }
    }
}
