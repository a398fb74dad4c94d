use std::sync::Arc;

use bigdecimal::BigDecimal;
use log::debug;
use num_traits::{One, Zero};

use crate::{
    feeds::Blocklist,
    models::{DexKind, EnrichedToken, Pool, TokenQuote, ValuedPool, ValuedToken},
    utils::{decimal_or_zero, is_positive, scale_down, scale_down_by},
};

use super::reference::{price_in_usd, ReferenceAssets};

/// Native asset plus its wrapped representatives on Tezos.
pub const DEFAULT_REFERENCE_ASSETS: [&str; 4] = [
    "tez",
    "KT1UpeXdK6AJbX58GJ92pLZVCucn2DR8Nu4b",
    "KT1PnUZCp3u2KzWr93pn4DD7HAJnm3rWVrgn",
    "KT1SjXiUX63QvdNMcM2m492f7kuf8JxXRLp4",
];

/// Fee-scaling factor baked into the raw reserves of alien pools (10^18).
pub const DEFAULT_FEE_DENOMINATOR: u64 = 1_000_000_000_000_000_000;

/// Minimum aggregate TVL (reference-asset units) for a token to get a market cap.
/// Thinly traded tokens below this are left out of the ranking.
pub const DEFAULT_LIQUIDITY_FLOOR: u64 = 5_000;

/// Immutable valuation parameters, injected into the engines.
#[derive(Debug, Clone)]
pub struct ValuationConfig {
    pub reference_assets: ReferenceAssets,
    pub fee_denominator: BigDecimal,
    pub liquidity_floor: BigDecimal,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            reference_assets: ReferenceAssets::new(
                DEFAULT_REFERENCE_ASSETS.iter().map(|a| a.to_string()).collect(),
            ),
            fee_denominator: BigDecimal::from(DEFAULT_FEE_DENOMINATOR),
            liquidity_floor: BigDecimal::from(DEFAULT_LIQUIDITY_FLOOR),
        }
    }
}

/// Current-cycle valuation of tokens joined with their pools.
///
/// Price resolution, in order:
/// 1. Blocklisted → 0
/// 2. Reference asset → 1
/// 3. First reference-denominated peer quote → its rate
///
/// Tokens with no reference quote keep an undefined (`None`) price; their
/// TVL and market cap collapse to zero.
pub struct ValuationEngine {
    config: Arc<ValuationConfig>,
    blocklist: Arc<Blocklist>,
}

impl ValuationEngine {
    pub fn new(config: Arc<ValuationConfig>, blocklist: Arc<Blocklist>) -> Self {
        Self { config, blocklist }
    }

    pub fn value_all(
        &self,
        tokens: Vec<EnrichedToken>,
        reference_usd: Option<&BigDecimal>,
    ) -> Vec<ValuedToken> {
        tokens
            .into_iter()
            .map(|token| self.value(token, reference_usd))
            .collect()
    }

    /// Price the token, value its reserve in every attached pool, then gate its market cap.
    pub fn value(&self, token: EnrichedToken, reference_usd: Option<&BigDecimal>) -> ValuedToken {
        let EnrichedToken { quote, exchanges } = token;

        let current_price = self.current_price(&quote);
        let current_price_usd = price_in_usd(current_price.as_ref(), reference_usd);

        let exchanges: Vec<ValuedPool> = exchanges
            .into_iter()
            .map(|pool| {
                let token_tvl = self.pool_tvl(&quote, &pool, current_price.as_ref());
                ValuedPool { pool, token_tvl }
            })
            .collect();

        let token_tvl = exchanges
            .iter()
            .fold(BigDecimal::zero(), |acc, p| acc + &p.token_tvl);

        let market_cap = self.market_cap(&quote, current_price.as_ref(), &token_tvl);

        ValuedToken {
            quote,
            exchanges,
            current_price,
            current_price_usd,
            token_tvl,
            market_cap,
        }
    }

    fn current_price(&self, quote: &TokenQuote) -> Option<BigDecimal> {
        if self.blocklist.is_blocked(&quote.identity) {
            return Some(BigDecimal::zero());
        }

        let assets = &self.config.reference_assets;
        if assets.is_reference(&quote.identity) {
            return Some(BigDecimal::one());
        }

        let price = assets
            .reference_quote(&quote.quotes)
            .and_then(|peer| peer.quote.clone());

        if price.is_none() {
            debug!("No reference quote for {} ({})", quote.symbol, quote.identity);
        }
        price
    }

    /// Value of the token's reserve in one pool, in reference-asset units.
    ///
    /// Anything undefined along the way (no matching leg, missing reserve,
    /// zero divisor, undefined price) values the pool at zero.
    fn pool_tvl(&self, quote: &TokenQuote, pool: &Pool, price: Option<&BigDecimal>) -> BigDecimal {
        let tvl = self
            .normalized_reserve(quote, pool)
            .zip(price)
            .map(|(reserve, price)| reserve * price);

        decimal_or_zero(tvl)
    }

    fn normalized_reserve(&self, quote: &TokenQuote, pool: &Pool) -> Option<BigDecimal> {
        let leg = pool.leg_for(&quote.identity)?;

        match pool.dex {
            // Alien reserves are read from the token record, not the leg.
            DexKind::Alien => {
                let reserves = quote.reserves.as_ref()?;
                scale_down_by(reserves, &self.config.fee_denominator, leg.decimals)
            }
            DexKind::Standard(_) => Some(scale_down(&leg.reserves, leg.decimals)),
        }
    }

    fn market_cap(
        &self,
        quote: &TokenQuote,
        price: Option<&BigDecimal>,
        token_tvl: &BigDecimal,
    ) -> BigDecimal {
        if !is_positive(price) || !is_positive(quote.total_supply.as_ref()) {
            return BigDecimal::zero();
        }
        if token_tvl < &self.config.liquidity_floor {
            return BigDecimal::zero();
        }

        match (price, quote.total_supply.as_ref()) {
            (Some(price), Some(supply)) => scale_down(supply, quote.decimals) * price,
            _ => BigDecimal::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PeerQuote, PoolLeg, TokenIdentity};
    use crate::utils::parse_decimal;

    fn dec(value: &str) -> BigDecimal {
        parse_decimal(value).unwrap()
    }

    fn engine() -> ValuationEngine {
        ValuationEngine::new(Arc::new(ValuationConfig::default()), Arc::new(Blocklist::default()))
    }

    fn token(address: &str, rate: Option<&str>) -> TokenQuote {
        let mut quote = TokenQuote::new(TokenIdentity::new(address, Some("0")), "TKN", 6);
        if let Some(rate) = rate {
            quote.quotes.push(PeerQuote {
                token: TokenIdentity::new("tez", None),
                quote: Some(dec(rate)),
                buckets: Vec::new(),
            });
        }
        quote
    }

    fn standard_pool(identity: &TokenIdentity, raw: &str, decimals: u8) -> Pool {
        Pool::new(
            DexKind::Standard("quipuswap".to_string()),
            vec![
                PoolLeg {
                    token: TokenIdentity::new("tez", None),
                    decimals: 6,
                    reserves: dec("1000000"),
                },
                PoolLeg {
                    token: identity.clone(),
                    decimals,
                    reserves: dec(raw),
                },
            ],
        )
    }

    fn enriched(quote: TokenQuote, exchanges: Vec<Pool>) -> EnrichedToken {
        EnrichedToken { quote, exchanges }
    }

    #[test]
    fn test_reference_asset_prices_at_one() {
        let mut quote = TokenQuote::new(TokenIdentity::new("tez", None), "XTZ", 6);
        quote.quotes.push(PeerQuote {
            token: TokenIdentity::new("KT1UpeXdK6AJbX58GJ92pLZVCucn2DR8Nu4b", None),
            quote: Some(dec("42")),
            buckets: Vec::new(),
        });

        let valued = engine().value(enriched(quote, vec![]), Some(&dec("0.5")));
        assert_eq!(valued.current_price, Some(BigDecimal::one()));
        assert_eq!(valued.current_price_usd, Some(dec("0.5")));
    }

    #[test]
    fn test_blocklist_overrides_reference_asset() {
        let blocklist = Blocklist::new(["KT1UpeXdK6AJbX58GJ92pLZVCucn2DR8Nu4b_0"]);
        let engine = ValuationEngine::new(Arc::new(ValuationConfig::default()), Arc::new(blocklist));
        let quote = token("KT1UpeXdK6AJbX58GJ92pLZVCucn2DR8Nu4b", Some("7"));

        let valued = engine.value(enriched(quote, vec![]), Some(&dec("0.5")));
        assert_eq!(valued.current_price, Some(BigDecimal::zero()));
        assert!(valued.market_cap.is_zero());
    }

    #[test]
    fn test_blocked_token_still_gets_zero_tvl_per_pool() {
        let blocklist = Blocklist::new(["KT1scam_0"]);
        let engine = ValuationEngine::new(Arc::new(ValuationConfig::default()), Arc::new(blocklist));
        let quote = token("KT1scam", Some("7"));
        let pool = standard_pool(&quote.identity, "9000000000000", 6);

        let valued = engine.value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert_eq!(valued.exchanges.len(), 1);
        assert!(valued.exchanges[0].token_tvl.is_zero());
        assert!(valued.token_tvl.is_zero());
    }

    #[test]
    fn test_missing_reference_quote_leaves_price_undefined() {
        let mut quote = token("KT1abc", None);
        quote.quotes.push(PeerQuote {
            token: TokenIdentity::new("KT1usd", Some("0")),
            quote: Some(dec("3")),
            buckets: Vec::new(),
        });
        let pool = standard_pool(&quote.identity, "1000000", 6);

        let valued = engine().value(enriched(quote, vec![pool]), Some(&dec("0.5")));
        assert_eq!(valued.current_price, None);
        assert_eq!(valued.current_price_usd, None);
        assert!(valued.token_tvl.is_zero());
        assert!(valued.market_cap.is_zero());
    }

    #[test]
    fn test_missing_reference_usd_leaves_usd_undefined() {
        let quote = token("KT1abc", Some("2"));
        let valued = engine().value(enriched(quote, vec![]), None);
        assert_eq!(valued.current_price, Some(dec("2")));
        assert_eq!(valued.current_price_usd, None);
    }

    #[test]
    fn test_standard_pool_tvl() {
        let quote = token("KT1abc", Some("2"));
        let pool = standard_pool(&quote.identity, "1000000", 6);

        let valued = engine().value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert_eq!(valued.exchanges[0].token_tvl, dec("2"));
        assert_eq!(valued.token_tvl, dec("2"));
    }

    #[test]
    fn test_alien_pool_uses_token_level_reserve() {
        let mut quote = token("KT1abc", Some("2"));
        // 3e24 / (1e18 * 1e6) = 3
        quote.reserves = Some(dec("3000000000000000000000000"));
        let mut pool = standard_pool(&quote.identity, "999999999", 6);
        pool.dex = DexKind::Alien;

        let valued = engine().value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert_eq!(valued.exchanges[0].token_tvl, dec("6"));
    }

    #[test]
    fn test_alien_pool_without_token_reserve_is_zero() {
        let quote = token("KT1abc", Some("2"));
        let mut pool = standard_pool(&quote.identity, "1000000", 6);
        pool.dex = DexKind::Alien;

        let valued = engine().value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert!(valued.exchanges[0].token_tvl.is_zero());
    }

    #[test]
    fn test_zero_fee_denominator_does_not_panic() {
        let config = ValuationConfig {
            fee_denominator: BigDecimal::zero(),
            ..ValuationConfig::default()
        };
        let engine = ValuationEngine::new(Arc::new(config), Arc::new(Blocklist::default()));
        let mut quote = token("KT1abc", Some("2"));
        quote.reserves = Some(dec("1000"));
        let mut pool = standard_pool(&quote.identity, "1000000", 6);
        pool.dex = DexKind::Alien;

        let valued = engine.value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert!(valued.token_tvl.is_zero());
    }

    #[test]
    fn test_aggregate_tvl_is_sum_of_pools() {
        let quote = token("KT1abc", Some("0.25"));
        let pools = vec![
            standard_pool(&quote.identity, "4000000", 6),
            standard_pool(&quote.identity, "123456789", 3),
            standard_pool(&quote.identity, "1", 0),
        ];

        let valued = engine().value(enriched(quote, pools), Some(&dec("1")));
        let sum = valued
            .exchanges
            .iter()
            .fold(BigDecimal::zero(), |acc, p| acc + &p.token_tvl);
        assert_eq!(valued.token_tvl, sum);
        assert_eq!(valued.token_tvl, dec("30865.44725"));
    }

    #[test]
    fn test_market_cap_scales_supply() {
        let mut quote = token("KT1abc", Some("10"));
        quote.decimals = 3;
        quote.total_supply = Some(dec("1000000"));
        // 600 units at price 10 gives a TVL of 6000
        let pool = standard_pool(&quote.identity, "600", 0);

        let valued = engine().value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert_eq!(valued.token_tvl, dec("6000"));
        assert_eq!(valued.market_cap, dec("10000"));
    }

    #[test]
    fn test_market_cap_gated_by_liquidity_floor() {
        let mut quote = token("KT1abc", Some("10"));
        quote.total_supply = Some(dec("1000000000"));
        let pool = standard_pool(&quote.identity, "499", 0);

        let valued = engine().value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert_eq!(valued.token_tvl, dec("4990"));
        assert!(valued.market_cap.is_zero());
    }

    #[test]
    fn test_liquidity_floor_is_configurable() {
        let config = ValuationConfig {
            liquidity_floor: dec("100"),
            ..ValuationConfig::default()
        };
        let engine = ValuationEngine::new(Arc::new(config), Arc::new(Blocklist::default()));
        let mut quote = token("KT1abc", Some("10"));
        quote.total_supply = Some(dec("1000000000"));
        let pool = standard_pool(&quote.identity, "499", 0);

        let valued = engine.value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert_eq!(valued.market_cap, dec("10000"));
    }

    #[test]
    fn test_market_cap_requires_supply() {
        let quote = token("KT1abc", Some("10"));
        let pool = standard_pool(&quote.identity, "1000000", 0);

        let valued = engine().value(enriched(quote, vec![pool]), Some(&dec("1")));
        assert!(valued.token_tvl >= dec("5000"));
        assert!(valued.market_cap.is_zero());
    }

    #[test]
    fn test_no_pools_means_no_tvl_and_no_market_cap() {
        let mut quote = token("KT1abc", Some("10"));
        quote.total_supply = Some(dec("1000000000"));

        let valued = engine().value(enriched(quote, vec![]), Some(&dec("1")));
        assert!(valued.token_tvl.is_zero());
        assert!(valued.market_cap.is_zero());
    }
}
