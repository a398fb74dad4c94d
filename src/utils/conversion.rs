//! Decimal conversion utilities.
//!
//! Raw on-chain amounts (reserves, total supply) are integers scaled by the
//! token's decimals. Everything here goes through `BigDecimal` so large
//! reserves never lose precision before they are priced.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;
use std::str::FromStr;

// ============================================
// Decimal Scaling
// ============================================

/// Scale a raw integer amount down by `decimals` places.
///
/// # Example
/// ```ignore
/// let raw = BigDecimal::from(1_000_000);
/// assert_eq!(scale_down(&raw, 6), BigDecimal::from(1));
/// ```
pub fn scale_down(raw: &BigDecimal, decimals: u8) -> BigDecimal {
    if decimals == 0 {
        raw.clone()
    } else {
        raw / big_pow10(decimals as u32)
    }
}

/// Divide `raw` by `denominator * 10^decimals`.
///
/// Returns `None` when the combined divisor is zero instead of panicking.
pub fn scale_down_by(raw: &BigDecimal, denominator: &BigDecimal, decimals: u8) -> Option<BigDecimal> {
    let divisor = denominator * big_pow10(decimals as u32);
    if divisor.is_zero() {
        return None;
    }
    Some(raw / divisor)
}

// ============================================
// Float <-> Decimal
// ============================================

/// Convert a finite f64 to `BigDecimal` through its shortest decimal form.
///
/// Going through the string keeps `0.1` as `0.1` rather than the exact
/// binary expansion `from_f64` would produce.
pub fn f64_to_decimal(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}

/// Convert a `BigDecimal` to f64, returning `None` if the result is not finite.
pub fn decimal_to_f64(value: &BigDecimal) -> Option<f64> {
    let result = value.to_f64()?;

    if result.is_finite() {
        Some(result)
    } else {
        None
    }
}

/// Parse a decimal string such as `"1000000"` or `"0.0042"`.
pub fn parse_decimal(value: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(value.trim()).ok()
}

// ============================================
// Internal Helpers
// ============================================

static POW10_CACHE: Lazy<[BigDecimal; 40]> =
    Lazy::new(|| std::array::from_fn(|i| BigDecimal::from(BigInt::from(10u32).pow(i as u32))));

/// Compute 10^exp as BigDecimal.
pub(crate) fn big_pow10(exp: u32) -> BigDecimal {
    if (exp as usize) < POW10_CACHE.len() {
        POW10_CACHE[exp as usize].clone()
    } else {
        BigDecimal::from(BigInt::from(10u32).pow(exp))
    }
}
