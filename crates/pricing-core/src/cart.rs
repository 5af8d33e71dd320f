//! # Cart
//!
//! The pricing object hosts talk to. It owns the items, the configuration and
//! the rule registries, and turns them into totals.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               Cart                                      │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────────┐ ┌───────────────┐ ┌───────────┐ │
//! │  │   items      │ │ ConditionManager │ │ CouponManager │ │  fields   │ │
//! │  │  Vec<Item>   │ │  slug → rule     │ │  code → coupon│ │ key→value │ │
//! │  └──────┬───────┘ └────────┬─────────┘ └───────┬───────┘ └───────────┘ │
//! │         │                  │ evaluate(items)   │ coupon_discount(sub)  │
//! │         ▼                  ▼                   ▼                        │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             calculator::breakdown(CalculationInput)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  PricingConfig: global discount / tax rate / fire_events / tax_base    │
//! │  EventDispatcher: DiscountApplied → listeners (if fire_events)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! There is no internal locking. Hosts that share a cart between threads
//! wrap it in `Arc<Mutex<Cart>>`; every rule and listener is `Send + Sync`
//! so that works.
//!
//! ## Events
//! Each public method that evaluates conditions dispatches one
//! [`DiscountApplied`](crate::DiscountApplied) per matched condition. Calls
//! with a discount override skip condition evaluation and emit nothing.

use tracing::debug;

use crate::calculator::{self, CalculationInput, TotalsBreakdown};
use crate::condition::{ConditionEvaluation, ConditionManager};
use crate::config::PricingConfig;
use crate::coupon::CouponManager;
use crate::error::PricingResult;
use crate::events::{DiscountListener, EventDispatcher};
use crate::fields::DynamicFields;
use crate::money::round_amount;
use crate::types::{Item, Percent, TaxBase, UserId};
use crate::validation::{validate_item, validate_percent};

// =============================================================================
// Overrides
// =============================================================================

/// Per-call replacements for the configured global settings.
///
/// A discount override replaces the *whole* percentage (global plus
/// conditions), matching `total_with_discount(pct)` semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceOverrides {
    pub discount: Option<Percent>,
    pub tax_rate: Option<Percent>,
}

impl PriceOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn discount(mut self, percent: f64) -> Self {
        self.discount = Some(Percent::new(percent));
        self
    }

    pub fn tax_rate(mut self, percent: f64) -> Self {
        self.tax_rate = Some(Percent::new(percent));
        self
    }

    /// Rejects negative or non-finite percentages.
    pub fn validate(&self) -> PricingResult<()> {
        validate_override("discount", self.discount)?;
        validate_override("tax_rate", self.tax_rate)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Pricing orchestrator for one cart session.
#[derive(Debug, Default)]
pub struct Cart {
    items: Vec<Item>,
    config: PricingConfig,
    conditions: ConditionManager,
    coupons: CouponManager,
    fields: DynamicFields,
    events: EventDispatcher,
}

impl Cart {
    /// Creates an empty cart with validated settings.
    pub fn new(config: PricingConfig) -> PricingResult<Self> {
        config.validate()?;

        Ok(Cart {
            events: EventDispatcher::new(config.fire_events),
            config,
            ..Default::default()
        })
    }

    /// Empty cart with default settings: no discount, no tax, events off.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Replaces the items for the next pricing pass.
    ///
    /// All items are validated first; on error the previous items stay.
    pub fn set_items(&mut self, items: Vec<Item>) -> PricingResult<()> {
        for item in &items {
            validate_item(item)?;
        }
        debug!(count = items.len(), "Cart items set");
        self.items = items;
        Ok(())
    }

    pub fn add_item(&mut self, item: Item) -> PricingResult<()> {
        validate_item(&item)?;
        self.items.push(item);
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Number of lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Σ quantity across lines.
    pub fn total_quantity(&self) -> f64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // -------------------------------------------------------------------------
    // Collaborators
    // -------------------------------------------------------------------------

    pub fn conditions(&self) -> &ConditionManager {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionManager {
        &mut self.conditions
    }

    pub fn coupons(&self) -> &CouponManager {
        &self.coupons
    }

    pub fn coupons_mut(&mut self) -> &mut CouponManager {
        &mut self.coupons
    }

    pub fn fields(&self) -> &DynamicFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut DynamicFields {
        &mut self.fields
    }

    /// Registers a listener for condition matches.
    ///
    /// Listeners only hear events while `fire_events` is on.
    pub fn on_discount_applied<L>(&mut self, listener: L)
    where
        L: DiscountListener + 'static,
    {
        self.events.subscribe(listener);
    }

    /// Applies a coupon to this session. See
    /// [`CouponManager::apply_coupon`].
    pub fn apply_coupon(&mut self, code: &str, user: Option<&UserId>) -> PricingResult<bool> {
        self.coupons.apply_coupon(code, user)
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn set_global_discount(&mut self, percent: f64) -> PricingResult<()> {
        validate_percent("global_discount", percent)?;
        self.config.global_discount = Percent::new(percent);
        Ok(())
    }

    pub fn set_global_tax_rate(&mut self, percent: f64) -> PricingResult<()> {
        validate_percent("global_tax_rate", percent)?;
        self.config.global_tax_rate = Percent::new(percent);
        Ok(())
    }

    pub fn set_fire_events(&mut self, enabled: bool) {
        self.config.fire_events = enabled;
        self.events.set_enabled(enabled);
    }

    pub fn set_tax_base(&mut self, base: TaxBase) {
        self.config.tax_base = base;
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Evaluates the conditions and dispatches a notification per match.
    pub fn evaluate_conditions(&self) -> ConditionEvaluation {
        let evaluation = self.conditions.evaluate(&self.items);
        self.events.dispatch_all(&evaluation.matched);
        evaluation
    }

    /// Σ price × quantity, rounded.
    pub fn subtotal(&self) -> f64 {
        round_amount(calculator::subtotal(&self.items))
    }

    /// Summed percentage of the matching conditions.
    pub fn condition_discount(&self) -> Percent {
        self.evaluate_conditions().percent
    }

    /// Effective discount percentage: the override if given, otherwise the
    /// global discount plus matching conditions.
    ///
    /// ## Errors
    /// - [`PricingError::Validation`](crate::PricingError::Validation) for a
    ///   negative or non-finite override
    pub fn discount_percent(&self, discount: Option<Percent>) -> PricingResult<Percent> {
        validate_override("discount", discount)?;
        Ok(self.effective_discount(discount))
    }

    /// Amount taken off by the effective discount percentage.
    pub fn discount_amount(&self, discount: Option<Percent>) -> PricingResult<f64> {
        let percent = self.discount_percent(discount)?;
        Ok(round_amount(calculator::discount_amount(
            calculator::subtotal(&self.items),
            percent,
        )))
    }

    /// Subtotal after the effective discount percentage (coupons excluded).
    pub fn total_with_discount(&self, discount: Option<Percent>) -> PricingResult<f64> {
        let percent = self.discount_percent(discount)?;
        Ok(round_amount(calculator::total_with_discount(
            calculator::subtotal(&self.items),
            percent,
        )))
    }

    /// Summed amount of the applied coupons.
    pub fn coupon_discount(&self) -> f64 {
        round_amount(self.coupons.coupon_discount(calculator::subtotal(&self.items)))
    }

    /// Tax owed under the configured tax base.
    pub fn tax_amount(&self, tax_rate: Option<Percent>) -> PricingResult<f64> {
        let overrides = PriceOverrides {
            discount: None,
            tax_rate,
        };
        Ok(self.total_detailed_with(&overrides)?.tax_amount)
    }

    /// Final total with the configured settings.
    pub fn total(&self) -> f64 {
        self.total_detailed().total
    }

    /// Final total with per-call overrides.
    pub fn total_with(&self, overrides: &PriceOverrides) -> PricingResult<f64> {
        Ok(self.total_detailed_with(overrides)?.total)
    }

    /// Discounts plus coupons, rounded.
    pub fn savings(&self) -> f64 {
        self.total_detailed().savings
    }

    pub fn total_detailed(&self) -> TotalsBreakdown {
        self.price(&PriceOverrides::none())
    }

    /// Full breakdown with per-call overrides.
    ///
    /// Overrides are checked like the global settings; nothing is evaluated
    /// when one is rejected.
    pub fn total_detailed_with(&self, overrides: &PriceOverrides) -> PricingResult<TotalsBreakdown> {
        overrides.validate()?;
        Ok(self.price(overrides))
    }

    fn effective_discount(&self, discount: Option<Percent>) -> Percent {
        discount.unwrap_or_else(|| self.config.global_discount + self.condition_discount())
    }

    /// Conditions are evaluated once per call.
    fn price(&self, overrides: &PriceOverrides) -> TotalsBreakdown {
        let subtotal = calculator::subtotal(&self.items);
        let input = CalculationInput {
            subtotal,
            discount_percent: self.effective_discount(overrides.discount),
            coupon_discount: self.coupons.coupon_discount(subtotal),
            tax_rate: overrides.tax_rate.unwrap_or(self.config.global_tax_rate),
            tax_base: self.config.tax_base,
        };

        let totals = calculator::breakdown(&input);
        debug!(
            subtotal = totals.subtotal,
            discount = totals.discount_amount,
            coupons = totals.coupon_discount_amount,
            tax = totals.tax_amount,
            total = totals.total,
            "Cart priced"
        );
        totals
    }
}

fn validate_override(field: &str, percent: Option<Percent>) -> PricingResult<()> {
    if let Some(percent) = percent {
        validate_percent(field, percent.value())?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
