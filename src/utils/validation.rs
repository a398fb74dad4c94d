//! Numeric sanity helpers.
//!
//! Feed data is untrusted: a rate can be zero, a reserve can be missing,
//! and a percentage can divide by zero. These helpers turn such values into
//! the neutral results the pipeline expects instead of letting them leak
//! into rankings.

use bigdecimal::BigDecimal;
use num_traits::{Signed, Zero};

/// Returns true if the value is present and strictly greater than zero.
#[inline]
pub fn is_positive(value: Option<&BigDecimal>) -> bool {
    value.is_some_and(|v| v.is_positive())
}

/// Coerce an undefined decimal to zero.
#[inline]
pub fn decimal_or_zero(value: Option<BigDecimal>) -> BigDecimal {
    value.unwrap_or_else(BigDecimal::zero)
}

/// Coerce a non-finite float (NaN, ±inf) to zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Validate a USD rate for the reference asset.
/// Returns Some(rate) if it is finite and strictly positive.
#[inline]
pub fn validate_reference_usd(rate: f64) -> Option<f64> {
    if rate > 0.0 && rate.is_finite() {
        Some(rate)
    } else {
        None
    }
}
