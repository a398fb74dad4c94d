//! Valuation pipeline: reference price → pool join → valuation →
//! historical comparison → price change → ranking.
//!
//! Every stage is synchronous and consumes its input by value.

pub mod historical;
pub mod joiner;
pub mod pipeline;
pub mod price_change;
pub mod ranker;
pub mod reference;
pub mod valuation;

pub use historical::HistoricalComparator;
pub use joiner::join_pools;
pub use pipeline::{MarketPipeline, MarketSnapshot};
pub use price_change::compute_price_changes;
pub use ranker::{rank, DEFAULT_TOP_N};
pub use reference::{resolve_reference_price, ReferenceAssets};
pub use valuation::{ValuationConfig, ValuationEngine};
