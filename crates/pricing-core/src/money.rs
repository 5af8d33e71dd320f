//! # Money Module
//!
//! Rounding helpers for monetary amounts.
//!
//! ## Amount Representation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AMOUNTS ARE f64, REPORTED AT 3 DECIMALS                                │
//! │                                                                         │
//! │  Intermediate math keeps full precision:                                │
//! │    200.0 × 10% = 20.0,  180.0 × 5% = 9.0                                │
//! │                                                                         │
//! │  Reported values go through round_amount() (Decimal, half away from 0): │
//! │    19.99 × 3 × 7.25% = 4.347825  →  4.348                               │
//! │                                                                         │
//! │  Breakdowns sum ROUNDED parts, so                                       │
//! │    subtotal - discount - coupons + tax == total  (within 1e-9)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricing_core::money::{approx_eq, round_amount};
//!
//! assert_eq!(round_amount(4.347825), 4.348);
//! assert!(approx_eq(0.1 + 0.2, 0.3));
//! ```

use rust_decimal::prelude::*;

/// Number of decimal places reported amounts are rounded to.
pub const AMOUNT_DECIMALS: u32 = 3;

/// Tolerance used when comparing amounts that went through float math.
pub const AMOUNT_TOLERANCE: f64 = 1e-9;

/// Rounds an amount to [`AMOUNT_DECIMALS`] places, half away from zero.
///
/// ## Example
/// ```rust
/// use pricing_core::money::round_amount;
///
/// assert_eq!(round_amount(189.0), 189.0);
/// assert_eq!(round_amount(10.0 / 3.0), 3.333);
/// assert_eq!(round_amount(-2.0 / 3.0), -0.667);
/// assert_eq!(round_amount(0.5005), 0.501);
/// ```
#[inline]
pub fn round_amount(value: f64) -> f64 {
    round_to(value, AMOUNT_DECIMALS)
}

/// Rounds `value` to `places` decimal places, half away from zero.
///
/// Values outside the `Decimal` range (and NaN / infinities) come back
/// unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    let Some(decimal) = to_decimal(value) else {
        return value;
    };

    let rounded = decimal
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(value);

    // -0.0 prints badly in JSON output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Converts an amount to `Decimal` through its shortest decimal form, so
/// `0.5005` becomes `0.5005` rather than the binary `0.50049999...`.
///
/// `None` for NaN, infinities and magnitudes beyond the `Decimal` range.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Compares two amounts within [`AMOUNT_TOLERANCE`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= AMOUNT_TOLERANCE
}

// =============================================================================
// Unit Tests
// =============================================================================
