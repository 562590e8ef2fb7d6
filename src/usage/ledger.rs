//! Dual usage ledger.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Which ledger a query or clear applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageScope {
    /// Calls that actually reached the remote service (cache misses).
    Actual,
    /// Every served response, cache hits included.
    Total,
}

/// Per-model accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModelUsage {
    pub calls: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cost: f64,
}

/// Snapshot of one ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    /// Sum of all per-model costs.
    pub total_cost: f64,
    pub models: BTreeMap<String, ModelUsage>,
}

/// Two independent running totals over served responses.
///
/// `record` always updates the total ledger and additionally updates the
/// actual ledger when the response was freshly fetched; both go through the
/// same accumulation path so the update logic cannot diverge. A cleared
/// ledger is absent (`summary` returns `None`), which is distinct from a
/// ledger holding zeros: absence means no calls were recorded at all.
#[derive(Debug, Default)]
pub struct UsageLedger {
    actual: Option<BTreeMap<String, ModelUsage>>,
    total: Option<BTreeMap<String, ModelUsage>>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one served response. `actual` is true only when the response
    /// came from a real remote call rather than the cache.
    pub fn record(
        &mut self,
        model: &str,
        prompt_tokens: u64,
        completion_tokens: u64,
        cost: f64,
        actual: bool,
    ) {
        Self::accumulate(&mut self.total, model, prompt_tokens, completion_tokens, cost);
        if actual {
            Self::accumulate(&mut self.actual, model, prompt_tokens, completion_tokens, cost);
        }
    }

    fn accumulate(
        ledger: &mut Option<BTreeMap<String, ModelUsage>>,
        model: &str,
        prompt_tokens: u64,
        completion_tokens: u64,
        cost: f64,
    ) {
        let entry = ledger
            .get_or_insert_with(BTreeMap::new)
            .entry(model.to_string())
            .or_default();
        entry.calls += 1;
        entry.prompt_tokens += prompt_tokens;
        entry.completion_tokens += completion_tokens;
        entry.cost += cost;
    }

    /// Snapshot one ledger; `None` when nothing was recorded since the last
    /// clear.
    pub fn summary(&self, scope: UsageScope) -> Option<UsageSummary> {
        let ledger = match scope {
            UsageScope::Actual => self.actual.as_ref(),
            UsageScope::Total => self.total.as_ref(),
        }?;
        Some(UsageSummary {
            total_cost: ledger.values().map(|u| u.cost).sum(),
            models: ledger.clone(),
        })
    }

    /// Reset one ledger to the no-records state.
    pub fn clear(&mut self, scope: UsageScope) {
        match scope {
            UsageScope::Actual => self.actual = None,
            UsageScope::Total => self.total = None,
        }
    }

    pub fn clear_all(&mut self) {
        self.actual = None;
        self.total = None;
    }

    /// Human-readable report over both ledgers. Formatting only.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(80);
        let _ = writeln!(out, "{rule}");
        Self::report_section(
            &mut out,
            "Usage excluding cached responses",
            self.summary(UsageScope::Actual),
        );
        Self::report_section(
            &mut out,
            "Usage including cached responses",
            self.summary(UsageScope::Total),
        );
        let _ = write!(out, "{rule}");
        out
    }

    fn report_section(out: &mut String, title: &str, summary: Option<UsageSummary>) {
        match summary {
            None => {
                let _ = writeln!(out, "{title}: no usage recorded.");
            }
            Some(summary) => {
                let _ = writeln!(out, "{title}: total cost {:.5}", summary.total_cost);
                for (model, usage) in &summary.models {
                    let _ = writeln!(
                        out,
                        "  {model}: calls {}, prompt tokens {}, completion tokens {}, cost {:.5}",
                        usage.calls, usage.prompt_tokens, usage.completion_tokens, usage.cost
                    );
                }
            }
        }
    }
}
