//! # Quote Requests
//!
//! JSON document describing one pricing session.
//!
//! ```json
//! {
//!   "items": [{ "price": 100, "quantity": 2, "sku": "A-1" }],
//!   "conditions": [
//!     { "slug": "bulk", "discount": 5, "when": { "min_items": 3 } },
//!     { "slug": "staff", "discount": 20, "skip": true, "when": { "always": true } }
//!   ],
//!   "coupons": [{ "code": "SAVE10", "discount_value": 15, "discount_type": "fixed" }],
//!   "apply": ["SAVE10"],
//!   "user_id": 42,
//!   "fields": { "channel": "web" },
//!   "overrides": { "tax_rate": 8.25 }
//! }
//! ```
//!
//! Every key is optional. Conditions are declarative because a JSON file
//! cannot carry closures; each `when` becomes a predicate over the items.

use pricing_core::calculator;
use pricing_core::{
    Cart, ConditionRule, Coupon, DiscountApplied, DynamicFields, Item, NewCondition, Percent,
    PriceOverrides, PricingConfig, TotalsBreakdown, UserId,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::CliResult;

// =============================================================================
// Request Shape
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub items: Vec<Item>,
    pub conditions: Vec<ConditionSpec>,
    pub coupons: Vec<Coupon>,
    /// Codes to apply, in order.
    pub apply: Vec<String>,
    pub user_id: Option<UserId>,
    pub fields: DynamicFields,
    pub overrides: OverrideSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConditionSpec {
    pub slug: Option<String>,
    pub discount: Option<f64>,
    pub skip: bool,
    pub when: Option<When>,
}

/// Declarative condition rule.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum When {
    Always(bool),
    /// At least this many lines.
    MinItems(usize),
    /// Σ quantity at least this much.
    MinQuantity(f64),
    /// Σ price × quantity at least this much.
    MinSubtotal(f64),
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct OverrideSpec {
    pub discount: Option<f64>,
    pub tax_rate: Option<f64>,
}

impl QuoteRequest {
    pub fn from_json(json: &str) -> CliResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl When {
    pub fn into_rule(self) -> ConditionRule {
        match self {
            When::Always(value) => ConditionRule::Static(value),
            When::MinItems(min) => ConditionRule::predicate(move |items: &[Item]| items.len() >= min),
            When::MinQuantity(min) => ConditionRule::predicate(move |items: &[Item]| {
                items.iter().map(|i| i.quantity).sum::<f64>() >= min
            }),
            When::MinSubtotal(min) => {
                ConditionRule::predicate(move |items: &[Item]| calculator::subtotal(items) >= min)
            }
        }
    }
}

impl From<ConditionSpec> for NewCondition {
    fn from(spec: ConditionSpec) -> Self {
        NewCondition {
            slug: spec.slug,
            rule: spec.when.map(When::into_rule),
            discount: spec.discount,
            skip: spec.skip,
        }
    }
}

impl From<OverrideSpec> for PriceOverrides {
    fn from(spec: OverrideSpec) -> Self {
        PriceOverrides {
            discount: spec.discount.map(Percent::new),
            tax_rate: spec.tax_rate.map(Percent::new),
        }
    }
}

// =============================================================================
// Quoting
// =============================================================================

/// Builds a cart from `request` along with the per-call overrides.
///
/// Coupon failures (unknown, expired, exhausted, wrong user) abort the quote.
pub fn build_cart(config: PricingConfig, request: QuoteRequest) -> CliResult<(Cart, PriceOverrides)> {
    let mut cart = Cart::new(config)?;
    cart.on_discount_applied(log_discount);

    cart.set_items(request.items)?;
    cart.conditions_mut()
        .add(request.conditions.into_iter().map(NewCondition::from))?;

    for coupon in request.coupons {
        cart.coupons_mut().add_coupon(coupon)?;
    }
    for code in &request.apply {
        cart.apply_coupon(code, request.user_id.as_ref())?;
    }

    *cart.fields_mut() = request.fields;

    debug!(
        items = cart.item_count(),
        conditions = cart.conditions().len(),
        coupons = cart.coupons().len(),
        "Quote cart built"
    );

    Ok((cart, PriceOverrides::from(request.overrides)))
}

pub fn run_quote(config: PricingConfig, request: QuoteRequest) -> CliResult<TotalsBreakdown> {
    let (cart, overrides) = build_cart(config, request)?;
    Ok(cart.total_detailed_with(&overrides)?)
}

fn log_discount(event: &DiscountApplied) {
    info!(
        slug = %event.slug,
        discount = %event.discount_percent,
        "Discount applied"
    );
}
