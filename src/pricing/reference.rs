use bigdecimal::BigDecimal;
use log::warn;

use crate::{
    models::{PeerQuote, ReferenceQuote, TokenIdentity},
    utils::{f64_to_decimal, validate_reference_usd},
};

/// The native asset and its wrapped representatives.
///
/// Every member is worth exactly one unit of the reference asset, so they
/// anchor all other prices. Membership is decided by contract address.
#[derive(Debug, Clone)]
pub struct ReferenceAssets {
    addresses: Vec<String>,
}

impl ReferenceAssets {
    pub fn new(addresses: Vec<String>) -> Self {
        Self { addresses }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }

    pub fn is_reference(&self, identity: &TokenIdentity) -> bool {
        self.contains(&identity.address)
    }

    /// First peer quote whose counter-token is a reference asset.
    ///
    /// Order matters: the feed lists quotes by preference, and the first
    /// reference-denominated one wins even if a later one exists.
    pub fn reference_quote<'a>(&self, quotes: &'a [PeerQuote]) -> Option<&'a PeerQuote> {
        quotes.iter().find(|q| self.is_reference(&q.token))
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }
}

/// Resolve the USD value of one unit of the reference asset.
///
/// Returns `None` (unavailable) if the quote service gave nothing usable;
/// downstream USD values then stay undefined instead of failing the run.
pub fn resolve_reference_price(quote: Option<ReferenceQuote>) -> Option<BigDecimal> {
    let Some(quote) = quote else {
        warn!("Reference USD quote unavailable, USD prices will be undefined");
        return None;
    };

    let Some(usd) = validate_reference_usd(quote.usd) else {
        warn!(
            "Reference USD quote {} is not a positive rate, USD prices will be undefined",
            quote.usd
        );
        return None;
    };

    f64_to_decimal(usd)
}

/// Convert a reference-denominated price to USD. Undefined on either side stays undefined.
pub fn price_in_usd(
    price: Option<&BigDecimal>,
    reference_usd: Option<&BigDecimal>,
) -> Option<BigDecimal> {
    Some(price? * reference_usd?)
}
