//! # Coupon Manager
//!
//! Coupon definitions plus the set of coupons applied in the current cart
//! session.
//!
//! ## Apply Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  CouponManager::apply_coupon(code, user)                │
//! │                                                                         │
//! │  code unknown? ──────────────────────► Err(CouponNotFound)              │
//! │       │                                                                 │
//! │  already applied? ───────────────────► Ok(false)  (no-op)               │
//! │       │                                                                 │
//! │  now > expires_at? ──────────────────► Err(CouponExpired)               │
//! │       │                                                                 │
//! │  uses >= max_uses? ──────────────────► Err(CouponUsageLimitExceeded)    │
//! │       │                                                                 │
//! │  restricted to other user? ──────────► Err(CouponUserMismatch)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  applied.push(code), uses += 1 ──────► Ok(true)                         │
//! │                                                                         │
//! │  Every Err leaves applied set and usage counters untouched.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Counters on Reset
//! - [`CouponManager::remove_applied_coupons`]: session abandoned, usage is
//!   given back (counters decremented)
//! - [`CouponManager::clear_applied_coupons`]: session completed, usage stays
//!   consumed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult, ValidationError};
use crate::types::{DiscountType, Percent, UserId};
use crate::validation::{validate_amount, validate_bounded_percent, validate_code};

// =============================================================================
// Coupon
// =============================================================================

/// A redeemable discount code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coupon {
    /// Unique code the shopper enters.
    pub code: String,

    /// Percentage (0-100) or flat amount, depending on `discount_type`.
    pub discount_value: f64,

    pub discount_type: DiscountType,

    /// Coupon is rejected once this instant has passed.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Maximum number of applications across sessions.
    #[serde(default)]
    pub max_uses: Option<u32>,

    /// Only this user may apply the coupon.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub restricted_user: Option<UserId>,

    /// Applications so far.
    #[serde(default)]
    pub uses: u32,
}

impl Coupon {
    /// A percentage-off coupon.
    pub fn percent(code: impl Into<String>, percent: f64) -> Self {
        Self::new(code, percent, DiscountType::Percent)
    }

    /// A flat-amount coupon.
    pub fn fixed(code: impl Into<String>, amount: f64) -> Self {
        Self::new(code, amount, DiscountType::Fixed)
    }

    pub fn new(code: impl Into<String>, discount_value: f64, discount_type: DiscountType) -> Self {
        Coupon {
            code: code.into(),
            discount_value,
            discount_type,
            expires_at: None,
            max_uses: None,
            restricted_user: None,
            uses: 0,
        }
    }

    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn max_uses(mut self, max: u32) -> Self {
        self.max_uses = Some(max);
        self
    }

    pub fn restricted_to(mut self, user: impl Into<UserId>) -> Self {
        self.restricted_user = Some(user.into());
        self
    }

    /// Checks the required fields and value ranges.
    pub fn validate(&self) -> PricingResult<()> {
        validate_code(&self.code)?;
        match self.discount_type {
            DiscountType::Percent => validate_bounded_percent("discount_value", self.discount_value)?,
            DiscountType::Fixed => validate_amount("discount_value", self.discount_value)?,
        }
        if self.max_uses == Some(0) {
            return Err(ValidationError::OutOfRange {
                field: "max_uses".to_string(),
                min: 1.0,
                max: u32::MAX as f64,
            }
            .into());
        }
        Ok(())
    }

    /// True once `now` is past the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }

    /// True when the usage counter has reached `max_uses`.
    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| self.uses >= max)
    }

    /// Whether `user` may apply this coupon.
    ///
    /// Unrestricted coupons accept anyone, including anonymous callers.
    pub fn allows_user(&self, user: Option<&UserId>) -> bool {
        match &self.restricted_user {
            None => true,
            Some(restricted) => user == Some(restricted),
        }
    }

    /// Discount amount this coupon yields against `subtotal`.
    ///
    /// ## Example
    /// ```rust
    /// use pricing_core::Coupon;
    ///
    /// assert_eq!(Coupon::percent("TEN", 10.0).discount_for(200.0), 20.0);
    /// assert_eq!(Coupon::fixed("SAVE10", 15.0).discount_for(200.0), 15.0);
    /// ```
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        match self.discount_type {
            DiscountType::Percent => Percent::new(self.discount_value).of(subtotal),
            DiscountType::Fixed => self.discount_value,
        }
    }
}

// =============================================================================
// Coupon Manager
// =============================================================================

/// Coupon definitions and the applied set of the current session.
///
/// ## Invariants
/// - Codes are unique
/// - A code appears at most once in the applied set
/// - Every applied code refers to a registered coupon
#[derive(Debug, Clone, Default)]
pub struct CouponManager {
    coupons: Vec<Coupon>,
    applied: Vec<String>,
}

impl CouponManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a coupon definition.
    ///
    /// ## Errors
    /// - [`PricingError::Validation`] for an empty code or an invalid value
    /// - [`PricingError::DuplicateCoupon`] if the code is already registered
    pub fn add_coupon(&mut self, coupon: Coupon) -> PricingResult<()> {
        coupon.validate()?;

        if self.coupon(&coupon.code).is_some() {
            return Err(PricingError::DuplicateCoupon { code: coupon.code });
        }

        debug!(
            code = %coupon.code,
            discount_type = %coupon.discount_type,
            value = coupon.discount_value,
            "Coupon registered"
        );
        self.coupons.push(coupon);
        Ok(())
    }

    /// Deletes a definition and drops it from the applied set.
    pub fn remove_coupon(&mut self, code: &str) -> Option<Coupon> {
        let pos = self.coupons.iter().position(|c| c.code == code)?;
        self.applied.retain(|applied| applied != code);
        Some(self.coupons.remove(pos))
    }

    /// Applies a coupon to the session using the current time.
    ///
    /// Returns `Ok(true)` when newly applied and `Ok(false)` when the code
    /// was already applied.
    pub fn apply_coupon(&mut self, code: &str, user: Option<&UserId>) -> PricingResult<bool> {
        self.apply_coupon_at(code, user, Utc::now())
    }

    /// Applies a coupon, checking expiry against `now`.
    pub fn apply_coupon_at(
        &mut self,
        code: &str,
        user: Option<&UserId>,
        now: DateTime<Utc>,
    ) -> PricingResult<bool> {
        let already_applied = self.is_applied(code);
        let coupon = self
            .coupons
            .iter_mut()
            .find(|c| c.code == code)
            .ok_or_else(|| PricingError::CouponNotFound(code.to_string()))?;

        if already_applied {
            debug!(code, "Coupon already applied");
            return Ok(false);
        }

        if let Some(expired_at) = coupon.expires_at.filter(|_| coupon.is_expired_at(now)) {
            return Err(PricingError::CouponExpired {
                code: code.to_string(),
                expired_at,
            });
        }

        if let Some(max_uses) = coupon.max_uses.filter(|_| coupon.is_exhausted()) {
            return Err(PricingError::CouponUsageLimitExceeded {
                code: code.to_string(),
                max_uses,
            });
        }

        if !coupon.allows_user(user) {
            return Err(PricingError::CouponUserMismatch {
                code: code.to_string(),
            });
        }

        coupon.uses += 1;
        info!(code, uses = coupon.uses, "Coupon applied");
        self.applied.push(code.to_string());
        Ok(true)
    }

    pub fn coupon(&self, code: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.code == code)
    }

    /// All definitions in registration order.
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    pub fn is_applied(&self, code: &str) -> bool {
        self.applied.iter().any(|applied| applied == code)
    }

    /// Applied coupons in application order.
    pub fn applied_coupons(&self) -> Vec<&Coupon> {
        self.applied
            .iter()
            .filter_map(|code| self.coupon(code))
            .collect()
    }

    /// Summed discount amount of the applied coupons against `subtotal`.
    pub fn coupon_discount(&self, subtotal: f64) -> f64 {
        self.applied_coupons()
            .iter()
            .map(|c| c.discount_for(subtotal))
            .sum()
    }

    /// Empties the applied set and gives the usage back.
    pub fn remove_applied_coupons(&mut self) {
        for code in std::mem::take(&mut self.applied) {
            if let Some(coupon) = self.coupons.iter_mut().find(|c| c.code == code) {
                coupon.uses = coupon.uses.saturating_sub(1);
            }
        }
        debug!("Applied coupons removed, usage restored");
    }

    /// Empties the applied set; usage stays consumed.
    pub fn clear_applied_coupons(&mut self) {
        self.applied.clear();
        debug!("Applied coupons cleared");
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
