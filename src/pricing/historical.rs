use std::sync::Arc;

use bigdecimal::BigDecimal;
use log::debug;
use num_traits::{One, Zero};

use crate::{
    feeds::Blocklist,
    models::{HistoricalToken, TokenQuote},
};

use super::{reference::price_in_usd, ValuationConfig};

/// Prices tokens one lookback window ago from the historical quote feed.
///
/// Uses the same rules as the valuation engine with two differences: the
/// reference check runs before the blocklist, and the rate comes from the
/// most recent bucket close instead of a live quote. No pools are involved.
pub struct HistoricalComparator {
    config: Arc<ValuationConfig>,
    blocklist: Arc<Blocklist>,
}

impl HistoricalComparator {
    pub fn new(config: Arc<ValuationConfig>, blocklist: Arc<Blocklist>) -> Self {
        Self { config, blocklist }
    }

    pub fn value_all(
        &self,
        tokens: Vec<TokenQuote>,
        reference_usd: Option<&BigDecimal>,
    ) -> Vec<HistoricalToken> {
        tokens
            .into_iter()
            .map(|token| self.value(token, reference_usd))
            .collect()
    }

    pub fn value(&self, token: TokenQuote, reference_usd: Option<&BigDecimal>) -> HistoricalToken {
        let assets = &self.config.reference_assets;

        let (current_price, current_price_usd) = if assets.is_reference(&token.identity) {
            (Some(BigDecimal::one()), reference_usd.cloned())
        } else {
            let price = if self.blocklist.is_blocked(&token.identity) {
                Some(BigDecimal::zero())
            } else {
                let peer = assets.reference_quote(&token.quotes);
                if let Some(bucket) = peer.and_then(|p| p.buckets.first()) {
                    debug!(
                        "Historical price for {} taken from bucket {:?}",
                        token.identity,
                        bucket.timestamp()
                    );
                }
                peer.and_then(|p| p.latest_close()).cloned()
            };
            let usd = price_in_usd(price.as_ref(), reference_usd);
            (price, usd)
        };

        HistoricalToken {
            identity: token.identity,
            symbol: token.symbol,
            current_price,
            current_price_usd,
        }
    }
}
