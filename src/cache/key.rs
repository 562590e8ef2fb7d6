//! Cache namespaces and key derivation.

use crate::types::CompletionRequest;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// A cache namespace identifier ("generation").
///
/// Integer and string forms are both accepted; the on-disk directory name
/// is the seed's string form. Requests under different seeds are never
/// cache-compatible, even when otherwise identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheSeed(String);

impl CacheSeed {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for CacheSeed {
    fn from(seed: i64) -> Self {
        Self(seed.to_string())
    }
}

impl From<i32> for CacheSeed {
    fn from(seed: i32) -> Self {
        Self(seed.to_string())
    }
}

impl From<u64> for CacheSeed {
    fn from(seed: u64) -> Self {
        Self(seed.to_string())
    }
}

impl From<&str> for CacheSeed {
    fn from(seed: &str) -> Self {
        Self(seed.to_string())
    }
}

impl From<String> for CacheSeed {
    fn from(seed: String) -> Self {
        Self(seed)
    }
}

impl fmt::Display for CacheSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether, and under which namespace, a client caches responses.
///
/// Disabling caching is itself a policy value rather than an absent seed,
/// so per-call overrides can distinguish "inherit the default" from
/// "explicitly bypass the cache".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePolicy {
    /// Every call bypasses the cache entirely.
    Disabled,
    /// Cache under the given namespace.
    Seed(CacheSeed),
}

impl CachePolicy {
    pub fn seed(seed: impl Into<CacheSeed>) -> Self {
        CachePolicy::Seed(seed.into())
    }
}

/// A derived cache key. Two requests with equal keys are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    hash: String,
}

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Derives stable keys from request content, seed, and the client
/// configuration fingerprint.
///
/// Derivation is pure and order-independent: object keys in the request
/// (including user-supplied tool definitions) are sorted recursively before
/// hashing, so map ordering never affects the key. Client-side annotations
/// that do not reach the provider — the price override in particular — are
/// excluded by construction, because the hash covers the request's wire
/// body rather than the request struct itself.
#[derive(Debug, Clone)]
pub struct CacheKeyDeriver {
    fingerprint: String,
}

impl CacheKeyDeriver {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
        }
    }

    pub fn derive(
        &self,
        request: &CompletionRequest,
        model: &str,
        seed: &CacheSeed,
    ) -> Result<CacheKey> {
        let mut parts: BTreeMap<&str, Value> = BTreeMap::new();
        parts.insert("request", canonicalize(&request.wire_body(model)));
        parts.insert("seed", Value::String(seed.as_str().to_string()));
        parts.insert("fingerprint", Value::String(self.fingerprint.clone()));

        // A derivation failure must surface as an error: hashing a default
        // in its place would alias distinct requests.
        let canonical = serde_json::to_string(&parts)?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let hash = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        Ok(CacheKey { hash })
    }
}

/// Rebuild a JSON value with object keys sorted recursively.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, PriceOverride};
    use serde_json::json;

    fn deriver() -> CacheKeyDeriver {
        CacheKeyDeriver::new("fp-test")
    }

    fn request() -> CompletionRequest {
        CompletionRequest::chat(vec![Message::user("1+3=")]).temperature(0.2)
    }

    #[test]
    fn derivation_is_deterministic() {
        let seed = CacheSeed::from(42);
        let a = deriver().derive(&request(), "gpt-4o-mini", &seed).unwrap();
        let b = deriver().derive(&request(), "gpt-4o-mini", &seed).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn semantic_fields_change_the_key() {
        let seed = CacheSeed::from(42);
        let base = deriver().derive(&request(), "gpt-4o-mini", &seed).unwrap();

        let hotter = request().temperature(0.9);
        assert_ne!(
            base,
            deriver().derive(&hotter, "gpt-4o-mini", &seed).unwrap()
        );

        let other_model = deriver().derive(&request(), "gpt-4o", &seed).unwrap();
        assert_ne!(base, other_model);

        let other_prompt = CompletionRequest::chat(vec![Message::user("2+2=")]).temperature(0.2);
        assert_ne!(
            base,
            deriver().derive(&other_prompt, "gpt-4o-mini", &seed).unwrap()
        );
    }

    #[test]
    fn seed_changes_the_key() {
        let a = deriver()
            .derive(&request(), "gpt-4o-mini", &CacheSeed::from(42))
            .unwrap();
        let b = deriver()
            .derive(&request(), "gpt-4o-mini", &CacheSeed::from(43))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_changes_the_key() {
        let seed = CacheSeed::from(42);
        let a = deriver().derive(&request(), "gpt-4o-mini", &seed).unwrap();
        let b = CacheKeyDeriver::new("fp-other")
            .derive(&request(), "gpt-4o-mini", &seed)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn price_override_does_not_change_the_key() {
        let seed = CacheSeed::from(42);
        let plain = deriver().derive(&request(), "gpt-4o-mini", &seed).unwrap();
        let priced = request().price(PriceOverride::per_1k(1000.0, 1000.0));
        assert_eq!(
            plain,
            deriver().derive(&priced, "gpt-4o-mini", &seed).unwrap()
        );
    }

    #[test]
    fn tool_map_ordering_does_not_change_the_key() {
        let seed = CacheSeed::from(7);
        let a = request().tools(vec![json!({"name": "get_weather", "parameters": {"location": "SF", "unit": "c"}})]);
        let b = request().tools(vec![json!({"parameters": {"unit": "c", "location": "SF"}, "name": "get_weather"})]);
        assert_eq!(
            deriver().derive(&a, "gpt-4o-mini", &seed).unwrap(),
            deriver().derive(&b, "gpt-4o-mini", &seed).unwrap()
        );
    }

    #[test]
    fn seed_string_and_integer_forms() {
        assert_eq!(CacheSeed::from(42).as_str(), "42");
        assert_eq!(CacheSeed::from("nightly").as_str(), "nightly");
    }
}
