//! # Domain Types
//!
//! Core value types shared by the condition, coupon and calculator modules.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    Percent      │   │  DiscountType   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price          │   │  f64            │   │  Percent        │       │
//! │  │  quantity       │   │  10.0 = 10%     │   │  Fixed          │       │
//! │  │  ...attributes  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │     UserId      │   │    TaxBase      │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  "42" or 42     │   │  AfterDiscount  │                              │
//! │  └─────────────────┘   │  Subtotal       │                              │
//! │                        │  AfterCoupons   │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

// =============================================================================
// Percent
// =============================================================================

/// A percentage where `10.0` means 10%.
///
/// Used for the global discount, condition discounts, percent coupons and
/// tax rates. Values are not clamped; use
/// [`validate_percent`](crate::validation::validate_percent) at the edges.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(f64);

impl Percent {
    /// Creates a percentage from its numeric value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Percent(value)
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0.0)
    }

    /// Returns the numeric value (10.0 for 10%).
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Applies the percentage to an amount.
    ///
    /// ## Example
    /// ```rust
    /// use pricing_core::Percent;
    ///
    /// assert_eq!(Percent::new(10.0).of(200.0), 20.0);
    /// ```
    #[inline]
    pub fn of(&self, amount: f64) -> f64 {
        amount * self.0 / 100.0
    }
}

impl From<f64> for Percent {
    fn from(value: f64) -> Self {
        Percent(value)
    }
}

impl Add for Percent {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Percent(self.0 + other.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A line in the cart.
///
/// Only `price` and `quantity` take part in pricing. Anything else the host
/// attaches (sku, name, category...) is kept in `attributes` and is visible
/// to condition predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unit price.
    pub price: f64,

    /// Quantity, fractional for weighed goods.
    #[serde(alias = "qty")]
    pub quantity: f64,

    /// Arbitrary extra fields, flattened on (de)serialization.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Item {
    /// Creates an item without extra attributes.
    pub fn new(price: f64, quantity: f64) -> Self {
        Item {
            price,
            quantity,
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    ///
    /// ## Example
    /// ```rust
    /// use pricing_core::Item;
    ///
    /// let item = Item::new(2.5, 4.0).with_attribute("sku", "COKE-330");
    /// assert_eq!(item.attribute("sku").and_then(|v| v.as_str()), Some("COKE-330"));
    /// ```
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns an extra attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity
    }
}

// =============================================================================
// Discount Type
// =============================================================================

/// How a coupon's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the subtotal.
    Percent,
    /// `discount_value` is a flat amount.
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percent => write!(f, "percent"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

// =============================================================================
// User Id
// =============================================================================

/// Identifier of the shopper a coupon may be restricted to.
///
/// Hosts key users by string or by number; both compare by their decimal /
/// textual form, so `UserId::from(42)` equals `UserId::from("42")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawUserId", into = "String")]
pub struct UserId(String);

/// Wire shape accepted for user ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(i64),
    Unsigned(u64),
}

impl From<RawUserId> for UserId {
    fn from(raw: RawUserId) -> Self {
        match raw {
            RawUserId::Text(s) => UserId(s),
            RawUserId::Number(n) => UserId(n.to_string()),
            RawUserId::Unsigned(n) => UserId(n.to_string()),
        }
    }
}

impl UserId {
    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId(n.to_string())
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        UserId(n.to_string())
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Tax Base
// =============================================================================

/// Which amount the tax rate is applied to.
///
/// ## Example ($200 subtotal, 10% discount, $15 coupon, 5% tax)
/// ```text
/// AfterDiscount  → 5% of 180.00 = 9.00   (default)
/// Subtotal       → 5% of 200.00 = 10.00
/// AfterCoupons   → 5% of 165.00 = 8.25
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Subtotal minus the percentage discount.
    #[default]
    AfterDiscount,
    /// Full subtotal, discounts ignored.
    Subtotal,
    /// Subtotal minus percentage discount and coupons, floored at zero.
    AfterCoupons,
}

impl fmt::Display for TaxBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxBase::AfterDiscount => write!(f, "after_discount"),
            TaxBase::Subtotal => write!(f, "subtotal"),
            TaxBase::AfterCoupons => write!(f, "after_coupons"),
        }
    }
}

impl std::str::FromStr for TaxBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "after_discount" | "discounted" => Ok(TaxBase::AfterDiscount),
            "subtotal" | "before_discount" => Ok(TaxBase::Subtotal),
            "after_coupons" => Ok(TaxBase::AfterCoupons),
            other => Err(format!(
                "Unknown tax base: '{}'. Valid options: after_discount, subtotal, after_coupons",
                other
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
