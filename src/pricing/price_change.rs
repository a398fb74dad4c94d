use bigdecimal::BigDecimal;
use log::debug;
use rustc_hash::FxHashMap;

use crate::{
    models::{HistoricalToken, RankedToken, ValuedToken},
    utils::{decimal_to_f64, finite_or_zero},
};

/// Join current valuations with their historical counterparts and compute
/// the percent price change.
///
/// Tokens without a counterpart are kept with a change of 0 and
/// `has_history = false`. Output order follows `current`.
pub fn compute_price_changes(
    current: Vec<ValuedToken>,
    historical: &[HistoricalToken],
) -> Vec<RankedToken> {
    let index: FxHashMap<String, &HistoricalToken> = historical
        .iter()
        .map(|token| (token.identity.key(), token))
        .collect();

    current
        .into_iter()
        .map(|token| match index.get(&token.identity().key()) {
            Some(past) => {
                let price_change = percent_change(
                    token.current_price.as_ref(),
                    past.current_price.as_ref(),
                );
                RankedToken {
                    token,
                    price_change,
                    has_history: true,
                }
            }
            None => {
                debug!("No historical price for {}", token.identity());
                RankedToken {
                    token,
                    price_change: 0.0,
                    has_history: false,
                }
            }
        })
        .collect()
}

/// `(current - past) / past * 100` in f64.
///
/// Undefined prices and non-finite results (a past price of 0) yield 0.
fn percent_change(current: Option<&BigDecimal>, past: Option<&BigDecimal>) -> f64 {
    let (Some(current), Some(past)) = (
        current.and_then(decimal_to_f64),
        past.and_then(decimal_to_f64),
    ) else {
        return 0.0;
    };

    finite_or_zero((current - past) / past * 100.0)
}
