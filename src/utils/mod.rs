//! Utility functions for tokenboard.
//!
//! This module is organized into focused submodules:
//!
//! - [`conversion`] - Decimal scaling and float/decimal conversions
//! - [`validation`] - Numeric sanity helpers for untrusted feed values
//! - [`deserialize`] - Serde helpers for string-or-number feed fields

mod conversion;
pub mod deserialize;
mod validation;

// ============================================
// Re-exports
// ============================================

// Conversion utilities
pub use conversion::{decimal_to_f64, f64_to_decimal, parse_decimal, scale_down, scale_down_by};

// Validation utilities
pub use validation::{decimal_or_zero, finite_or_zero, is_positive, validate_reference_usd};
