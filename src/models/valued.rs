use bigdecimal::BigDecimal;
use num_traits::Zero;

use super::{Pool, TokenIdentity, TokenQuote};

/// Token joined with every pool that lists it as a leg.
#[derive(Debug, Clone)]
pub struct EnrichedToken {
    pub quote: TokenQuote,
    pub exchanges: Vec<Pool>,
}

/// Pool entry carrying the value of the token's reserve in that pool.
#[derive(Debug, Clone)]
pub struct ValuedPool {
    pub pool: Pool,
    /// Reserve value in reference-asset units
    pub token_tvl: BigDecimal,
}

/// Current-cycle valuation of a token.
///
/// `None` prices mark tokens without a discoverable reference quote (or a
/// missing reference USD rate); they never become NaN.
#[derive(Debug, Clone)]
pub struct ValuedToken {
    pub quote: TokenQuote,
    pub exchanges: Vec<ValuedPool>,
    /// Price in reference-asset units
    pub current_price: Option<BigDecimal>,
    pub current_price_usd: Option<BigDecimal>,
    /// Sum of `exchanges[*].token_tvl`
    pub token_tvl: BigDecimal,
    /// Zero unless the token passes the market cap gate
    pub market_cap: BigDecimal,
}

impl ValuedToken {
    pub fn identity(&self) -> &TokenIdentity {
        &self.quote.identity
    }

    pub fn symbol(&self) -> &str {
        &self.quote.symbol
    }

    pub fn has_market_cap(&self) -> bool {
        !self.market_cap.is_zero()
    }
}

/// Price of a token one lookback window ago.
#[derive(Debug, Clone)]
pub struct HistoricalToken {
    pub identity: TokenIdentity,
    pub symbol: String,
    pub current_price: Option<BigDecimal>,
    pub current_price_usd: Option<BigDecimal>,
}

/// Valued token plus its period-over-period price change.
#[derive(Debug, Clone)]
pub struct RankedToken {
    pub token: ValuedToken,
    /// Percent change against the historical price; 0 when there is no history
    pub price_change: f64,
    /// False when the historical feed had no counterpart, so a flat price
    /// can be told apart from missing data
    pub has_history: bool,
}

impl RankedToken {
    pub fn market_cap(&self) -> &BigDecimal {
        &self.token.market_cap
    }
}
