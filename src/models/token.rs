use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TokenIdentity;
use crate::utils::deserialize;

/// A time-bucketed close rate from the historical quote feed.
#[derive(Debug, Clone, Deserialize)]
pub struct RateBucket {
    /// Bucket start as sent by the feed; kept raw so an odd format never rejects the feed
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default, deserialize_with = "deserialize::opt_decimal")]
    pub close: Option<BigDecimal>,
}

impl RateBucket {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.bucket.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Exchange rate of a token against one counter-token.
///
/// The spot feed fills `quote`. The historical feed fills `buckets`
/// (most recent first) and usually omits `quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerQuote {
    pub token: TokenIdentity,
    #[serde(default, deserialize_with = "deserialize::opt_decimal")]
    pub quote: Option<BigDecimal>,
    #[serde(default)]
    pub buckets: Vec<RateBucket>,
}

impl PeerQuote {
    /// Close rate of the most recent bucket, if any.
    pub fn latest_close(&self) -> Option<&BigDecimal> {
        self.buckets.first().and_then(|b| b.close.as_ref())
    }
}

/// Token metadata and quotes as delivered by the spot and historical feeds.
///
/// Wire format (camelCase): `tokenAddress`, `tokenId`, `symbol`, `decimals`,
/// `totalSupply`, `reserves`, `quotes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "TokenQuoteWire")]
pub struct TokenQuote {
    pub identity: TokenIdentity,
    pub symbol: String,
    pub decimals: u8,
    /// Raw total supply (not scaled by decimals)
    pub total_supply: Option<BigDecimal>,
    /// Token-level raw reserve. Only read by the fee-bearing TVL branch.
    pub reserves: Option<BigDecimal>,
    pub quotes: Vec<PeerQuote>,
}

impl TokenQuote {
    /// Constructor for metadata only; quotes and amounts are attached by the caller.
    pub fn new(identity: TokenIdentity, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            identity,
            symbol: symbol.into(),
            decimals,
            total_supply: None,
            reserves: None,
            quotes: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenQuoteWire {
    token_address: String,
    #[serde(default, deserialize_with = "deserialize::opt_id")]
    token_id: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    decimals: u8,
    #[serde(default, deserialize_with = "deserialize::opt_decimal")]
    total_supply: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize::opt_decimal")]
    reserves: Option<BigDecimal>,
    #[serde(default)]
    quotes: Vec<PeerQuote>,
}

impl From<TokenQuoteWire> for TokenQuote {
    fn from(wire: TokenQuoteWire) -> Self {
        Self {
            identity: TokenIdentity {
                address: wire.token_address,
                token_id: wire.token_id,
            },
            symbol: wire.symbol.unwrap_or_default(),
            decimals: wire.decimals,
            total_supply: wire.total_supply,
            reserves: wire.reserves,
            quotes: wire.quotes,
        }
    }
}

/// USD quote of the native asset from the reference quote service.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReferenceQuote {
    pub usd: f64,
}
