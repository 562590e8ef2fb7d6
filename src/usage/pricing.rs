//! Model pricing.

use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::warn;

/// Price-table collaborator: maps a model name and token counts to a cost.
///
/// A request-level [`crate::types::PriceOverride`] takes precedence over
/// any table; the orchestrator consults the table only when no override is
/// present.
pub trait PriceTable: Send + Sync {
    fn price_for(&self, model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64;
}

/// Per-1K-token rates for one model.
#[derive(Debug, Clone)]
pub struct ModelPricing {
    pub model: String,
    pub input_cost_per_1k: f64,
    pub output_cost_per_1k: f64,
}

impl ModelPricing {
    pub fn new(model: &str, input: f64, output: f64) -> Self {
        Self {
            model: model.into(),
            input_cost_per_1k: input,
            output_cost_per_1k: output,
        }
    }

    pub fn cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        (prompt_tokens as f64 / 1000.0) * self.input_cost_per_1k
            + (completion_tokens as f64 / 1000.0) * self.output_cost_per_1k
    }
}

/// Built-in static table. Lookup is by substring so dated model revisions
/// resolve to their family rate; unknown models price at zero with a logged
/// warning rather than failing the call.
pub struct StaticPriceTable {
    rates: Vec<ModelPricing>,
}

impl StaticPriceTable {
    pub fn new(rates: Vec<ModelPricing>) -> Self {
        Self { rates }
    }

    pub fn lookup(&self, model: &str) -> Option<&ModelPricing> {
        let m = model.to_lowercase();
        self.rates.iter().find(|p| m.contains(&p.model))
    }
}

impl Default for StaticPriceTable {
    fn default() -> Self {
        Self::new(vec![
            ModelPricing::new("gpt-4o-mini", 0.00015, 0.0006),
            ModelPricing::new("gpt-4o", 0.005, 0.015),
            ModelPricing::new("gpt-35-turbo-instruct", 0.0015, 0.002),
            ModelPricing::new("gpt-3.5-turbo-instruct", 0.0015, 0.002),
            ModelPricing::new("gpt-3.5-turbo", 0.0005, 0.0015),
            ModelPricing::new("claude-3-5-sonnet", 0.003, 0.015),
            ModelPricing::new("claude-3-haiku", 0.00025, 0.00125),
        ])
    }
}

impl PriceTable for StaticPriceTable {
    fn price_for(&self, model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        match self.lookup(model) {
            Some(pricing) => pricing.cost(prompt_tokens, completion_tokens),
            None => {
                warn!(model, "no price entry for model, cost recorded as 0");
                0.0
            }
        }
    }
}

static DEFAULT_TABLE: Lazy<Arc<StaticPriceTable>> =
    Lazy::new(|| Arc::new(StaticPriceTable::default()));

/// Shared default table.
pub fn default_price_table() -> Arc<StaticPriceTable> {
    DEFAULT_TABLE.clone()
}
