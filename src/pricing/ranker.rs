use crate::models::RankedToken;

/// Number of tokens in the market overview.
pub const DEFAULT_TOP_N: usize = 20;

/// Keep tokens with a market cap, sort by it descending, truncate to `top_n`.
///
/// The sort is stable, so equal market caps keep their input order.
pub fn rank(tokens: Vec<RankedToken>, top_n: usize) -> Vec<RankedToken> {
    let mut ranked: Vec<RankedToken> = tokens
        .into_iter()
        .filter(|t| t.token.has_market_cap())
        .collect();

    ranked.sort_by(|a, b| b.market_cap().cmp(a.market_cap()));
    ranked.truncate(top_n);
    ranked
}
