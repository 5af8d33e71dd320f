//! # pricing-core: Cart Pricing Rules
//!
//! Computes cart totals from line items, percentage discounts (a global
//! discount plus conditional rules), coupons and tax. Everything here is
//! synchronous and side-effect free apart from listener callbacks.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pricing Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Host (pricing-cli, checkout service, ...)          │   │
//! │  │    loads PricingConfig ──► builds Cart ──► reads totals         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pricing-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │ condition │  │  coupon   │  │calculator │  │   │
//! │  │   │   Cart    │  │ Condition │  │  Coupon   │  │ breakdown │  │   │
//! │  │   │ overrides │  │  Manager  │  │  Manager  │  │  totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS OUTSIDE apply_coupon • NO GLOBALS    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - The orchestrator hosts talk to
//! - [`condition`] - Conditional percentage discounts
//! - [`coupon`] - Coupon registry with expiry, usage and user restrictions
//! - [`calculator`] - Stateless pricing arithmetic
//! - [`config`] - Cart-level settings
//! - [`events`] - Discount notifications
//! - [`fields`] - Free-form cart attributes
//! - [`money`] - Rounding helpers
//! - [`types`] - Shared value types (Item, Percent, UserId, ...)
//! - [`error`] / [`validation`] - Errors and input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use pricing_core::{Cart, Coupon, Item, PricingConfig};
//!
//! let config = PricingConfig::new()
//!     .with_global_discount(10.0)
//!     .with_global_tax_rate(5.0);
//! let mut cart = Cart::new(config)?;
//! cart.set_items(vec![Item::new(100.0, 2.0)])?;
//!
//! assert_eq!(cart.subtotal(), 200.0);
//! assert_eq!(cart.total(), 189.0);
//!
//! cart.coupons_mut().add_coupon(Coupon::fixed("SAVE10", 15.0))?;
//! cart.apply_coupon("SAVE10", None)?;
//! assert_eq!(cart.total(), 174.0);
//! # Ok::<(), pricing_core::PricingError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod cart;
pub mod condition;
pub mod config;
pub mod coupon;
pub mod error;
pub mod events;
pub mod fields;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::TotalsBreakdown;
pub use cart::{Cart, PriceOverrides};
pub use condition::{Condition, ConditionEvaluation, ConditionManager, ConditionRule, NewCondition};
pub use config::PricingConfig;
pub use coupon::{Coupon, CouponManager};
pub use error::{PricingError, PricingResult, ValidationError};
pub use events::{DiscountApplied, DiscountListener, EventDispatcher};
pub use fields::DynamicFields;
pub use types::*;
