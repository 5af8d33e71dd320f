//! # Calculator
//!
//! Stateless pricing arithmetic. The [`Cart`](crate::Cart) gathers the inputs
//! (items, percentages, coupon amount) and hands them to these functions.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pricing Pipeline                                │
//! │                                                                         │
//! │  items ──► subtotal = Σ price × quantity                                │
//! │                │                                                        │
//! │                ├──► discount  = subtotal × (global + conditions) %      │
//! │                ├──► coupons   = Σ applied coupon amounts                │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  taxable (TaxBase)  AfterDiscount: subtotal - discount   (default)     │
//! │                     Subtotal:      subtotal                            │
//! │                     AfterCoupons:  subtotal - discount - coupons        │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  tax   = taxable × rate %                                               │
//! │  total = subtotal - discount - coupons + tax                            │
//! │  savings = discount + coupons                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use pricing_core::calculator::{breakdown, subtotal, CalculationInput};
//! use pricing_core::{Item, Percent, TaxBase};
//!
//! let items = vec![Item::new(100.0, 2.0)];
//! let totals = breakdown(&CalculationInput {
//!     subtotal: subtotal(&items),
//!     discount_percent: Percent::new(10.0),
//!     coupon_discount: 0.0,
//!     tax_rate: Percent::new(5.0),
//!     tax_base: TaxBase::AfterDiscount,
//! });
//!
//! assert_eq!(totals.discount_amount, 20.0);
//! assert_eq!(totals.tax_amount, 9.0);
//! assert_eq!(totals.total, 189.0);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{approx_eq, round_amount};
use crate::types::{Item, Percent, TaxBase};

// =============================================================================
// Inputs / Outputs
// =============================================================================

/// Everything a pricing pass depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationInput {
    /// Unrounded subtotal, see [`subtotal`].
    pub subtotal: f64,
    /// Effective percentage discount (global + conditions, or an override).
    pub discount_percent: Percent,
    /// Summed coupon amount.
    pub coupon_discount: f64,
    pub tax_rate: Percent,
    pub tax_base: TaxBase,
}

/// Structured result of a pricing pass.
///
/// All amounts are rounded to 3 decimals and `total` is derived from the
/// rounded parts, so the breakdown always adds up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBreakdown {
    pub subtotal: f64,
    pub discount_percent: Percent,
    pub discount_amount: f64,
    pub coupon_discount_amount: f64,
    pub taxable_amount: f64,
    pub tax_rate: Percent,
    pub tax_amount: f64,
    pub total: f64,
    pub savings: f64,
}

impl TotalsBreakdown {
    /// `subtotal - discount - coupons + tax == total` within tolerance.
    pub fn is_consistent(&self) -> bool {
        approx_eq(
            self.subtotal - self.discount_amount - self.coupon_discount_amount + self.tax_amount,
            self.total,
        ) && approx_eq(self.discount_amount + self.coupon_discount_amount, self.savings)
    }
}

// =============================================================================
// Pure Functions
// =============================================================================

/// Σ price × quantity. Empty input yields 0.
pub fn subtotal(items: &[Item]) -> f64 {
    items.iter().map(Item::line_total).sum()
}

/// Amount taken off `subtotal` by a percentage discount.
#[inline]
pub fn discount_amount(subtotal: f64, percent: Percent) -> f64 {
    percent.of(subtotal)
}

/// `subtotal` after a percentage discount.
///
/// ## Example
/// ```rust
/// use pricing_core::calculator::total_with_discount;
/// use pricing_core::Percent;
///
/// assert_eq!(total_with_discount(200.0, Percent::new(10.0)), 180.0);
/// ```
#[inline]
pub fn total_with_discount(subtotal: f64, percent: Percent) -> f64 {
    subtotal - discount_amount(subtotal, percent)
}

/// Amount the tax rate applies to, never below zero.
pub fn taxable_amount(subtotal: f64, discount: f64, coupons: f64, base: TaxBase) -> f64 {
    let taxable = match base {
        TaxBase::AfterDiscount => subtotal - discount,
        TaxBase::Subtotal => subtotal,
        TaxBase::AfterCoupons => subtotal - discount - coupons,
    };
    taxable.max(0.0)
}

/// Tax owed on `taxable`.
#[inline]
pub fn tax_amount(taxable: f64, rate: Percent) -> f64 {
    rate.of(taxable)
}

/// Runs the full pipeline and rounds the result.
pub fn breakdown(input: &CalculationInput) -> TotalsBreakdown {
    let discount = discount_amount(input.subtotal, input.discount_percent);
    let taxable = taxable_amount(
        input.subtotal,
        discount,
        input.coupon_discount,
        input.tax_base,
    );
    let tax = tax_amount(taxable, input.tax_rate);

    let subtotal = round_amount(input.subtotal);
    let discount_amount = round_amount(discount);
    let coupon_discount_amount = round_amount(input.coupon_discount);
    let tax_amount = round_amount(tax);

    TotalsBreakdown {
        subtotal,
        discount_percent: input.discount_percent,
        discount_amount,
        coupon_discount_amount,
        taxable_amount: round_amount(taxable),
        tax_rate: input.tax_rate,
        tax_amount,
        total: round_amount(subtotal - discount_amount - coupon_discount_amount + tax_amount),
        savings: round_amount(discount_amount + coupon_discount_amount),
    }
}

/// Final total, rounded to 3 decimals.
pub fn total(input: &CalculationInput) -> f64 {
    breakdown(input).total
}

/// Subtotal minus what the shopper pays before tax, rounded to 3 decimals.
pub fn savings(input: &CalculationInput) -> f64 {
    breakdown(input).savings
}

// =============================================================================
// Unit Tests
// =============================================================================
