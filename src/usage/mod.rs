//! Usage accounting: the dual actual/total ledger and pricing.
//!
//! Every served response is recorded in the total ledger; only responses
//! that reached the remote service are additionally recorded in the actual
//! ledger. The invariant `total >= actual` holds field-wise for every
//! model at all times.

mod ledger;
mod pricing;

pub use ledger::{ModelUsage, UsageLedger, UsageScope, UsageSummary};
pub use pricing::{default_price_table, ModelPricing, PriceTable, StaticPriceTable};
