use crate::models::{EnrichedToken, Pool, TokenQuote};

/// Attach to each token every pool that lists it as a leg.
///
/// Matching is exact on both identity components. A two-leg pool ends up
/// on both of its tokens; a token without pools keeps an empty list.
pub fn join_pools(tokens: Vec<TokenQuote>, pools: &[Pool]) -> Vec<EnrichedToken> {
    tokens
        .into_iter()
        .map(|quote| {
            let exchanges = pools
                .iter()
                .filter(|pool| pool.contains(&quote.identity))
                .cloned()
                .collect();

            EnrichedToken { quote, exchanges }
        })
        .collect()
}
