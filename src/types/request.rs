//! Completion request model.

use crate::types::message::Message;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A logical completion request.
///
/// Exactly one of `messages` (chat form) or `prompt` (bare completion form)
/// must be populated. The request is immutable once submitted; construction
/// goes through the chained setters.
///
/// `price` is a client-side cost annotation: it changes how the response is
/// priced but never what is sent to the provider, so it does not participate
/// in cache-key derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model override; falls back to the client's configured model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    /// Tool definitions, passed through to the provider verbatim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    /// Per-request price override; takes precedence over the price table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceOverride>,
}

impl CompletionRequest {
    /// Chat-form request.
    pub fn chat(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Bare completion-form request.
    pub fn completion(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f64) -> Self {
        self.temperature = Some(t);
        self
    }

    pub fn top_p(mut self, p: f64) -> Self {
        self.top_p = Some(p);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    pub fn tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn price(mut self, price: PriceOverride) -> Self {
        self.price = Some(price);
        self
    }

    /// Whether the request uses the chat endpoint.
    pub fn is_chat(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Render the fields that shape the remote call, with the effective
    /// model resolved. This is the request as the provider sees it; the
    /// cache key is derived from the same value so that key identity and
    /// wire identity can never drift apart.
    pub fn wire_body(&self, model: &str) -> Value {
        let mut body = json!({ "model": model });
        let obj = body.as_object_mut().expect("body is an object");
        if !self.messages.is_empty() {
            obj.insert(
                "messages".into(),
                serde_json::to_value(&self.messages).expect("messages serialize"),
            );
        }
        if let Some(prompt) = &self.prompt {
            obj.insert("prompt".into(), json!(prompt));
        }
        if let Some(t) = self.temperature {
            obj.insert("temperature".into(), json!(t));
        }
        if let Some(p) = self.top_p {
            obj.insert("top_p".into(), json!(p));
        }
        if let Some(n) = self.max_tokens {
            obj.insert("max_tokens".into(), json!(n));
        }
        if !self.stop.is_empty() {
            obj.insert("stop".into(), json!(self.stop));
        }
        if !self.tools.is_empty() {
            obj.insert("tools".into(), Value::Array(self.tools.clone()));
        }
        body
    }
}

/// Client-side price override, USD per 1K tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceOverride {
    pub prompt_per_1k: f64,
    pub completion_per_1k: f64,
}

impl PriceOverride {
    pub fn per_1k(prompt: f64, completion: f64) -> Self {
        Self {
            prompt_per_1k: prompt,
            completion_per_1k: completion,
        }
    }

    pub fn cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        (prompt_tokens as f64 / 1000.0) * self.prompt_per_1k
            + (completion_tokens as f64 / 1000.0) * self.completion_per_1k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_body_excludes_price() {
        let req = CompletionRequest::completion("1+3=").price(PriceOverride::per_1k(1000.0, 1000.0));
        let body = req.wire_body("gpt-4o-mini");
        assert!(body.get("price").is_none());
        assert_eq!(body["prompt"], "1+3=");
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[test]
    fn override_cost_is_per_1k() {
        let price = PriceOverride::per_1k(1000.0, 1000.0);
        assert!((price.cost(4, 2) - 6.0).abs() < 1e-9);
    }
}
