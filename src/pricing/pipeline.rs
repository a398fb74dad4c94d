use std::sync::Arc;
use std::time::Instant;

use bigdecimal::BigDecimal;
use log::info;

use crate::{
    feeds::Blocklist,
    models::{Pool, RankedToken, TokenQuote},
};

use super::{
    compute_price_changes, join_pools, rank, HistoricalComparator, ValuationConfig,
    ValuationEngine,
};

/// Point-in-time inputs for one run, as returned by the feed collaborators.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    /// USD value of one reference asset; `None` if the quote service failed
    pub reference_usd: Option<BigDecimal>,
    pub pools: Vec<Pool>,
    pub spot: Vec<TokenQuote>,
    pub historical: Vec<TokenQuote>,
}

/// Runs the valuation stages in order:
/// join → value → historical value → price change → rank.
///
/// Pure and restartable: every run consumes a snapshot and shares no state
/// with the previous one.
pub struct MarketPipeline {
    config: Arc<ValuationConfig>,
    blocklist: Arc<Blocklist>,
    top_n: usize,
}

impl MarketPipeline {
    pub fn new(config: ValuationConfig, blocklist: Blocklist, top_n: usize) -> Self {
        Self {
            config: Arc::new(config),
            blocklist: Arc::new(blocklist),
            top_n,
        }
    }

    pub fn run(&self, snapshot: MarketSnapshot) -> Vec<RankedToken> {
        let start = Instant::now();
        let MarketSnapshot {
            reference_usd,
            pools,
            spot,
            historical,
        } = snapshot;
        let reference_usd = reference_usd.as_ref();

        let joined = join_pools(spot, &pools);
        info!(
            "Joined {} tokens with {} pools",
            joined.len(),
            pools.len()
        );

        let engine = ValuationEngine::new(self.config.clone(), self.blocklist.clone());
        let valued = engine.value_all(joined, reference_usd);
        let with_market_cap = valued.iter().filter(|t| t.has_market_cap()).count();
        info!(
            "Valued {} tokens ({} pass the market cap gate)",
            valued.len(),
            with_market_cap
        );

        let comparator = HistoricalComparator::new(self.config.clone(), self.blocklist.clone());
        let past = comparator.value_all(historical, reference_usd);

        let changed = compute_price_changes(valued, &past);
        let matched = changed.iter().filter(|t| t.has_history).count();
        info!(
            "Matched {}/{} tokens against {} historical prices",
            matched,
            changed.len(),
            past.len()
        );

        let ranked = rank(changed, self.top_n);
        info!("Ranked top {} tokens in {:?}", ranked.len(), start.elapsed());
        ranked
    }
}
