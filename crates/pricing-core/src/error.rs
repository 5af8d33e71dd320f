//! # Error Types
//!
//! Domain-specific error types for pricing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricing-core errors (this file)                                       │
//! │  ├── PricingError     - Coupon/condition rule violations               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pricing-cli errors (separate crate)                                   │
//! │  └── CliError         - Config file / request loading failures         │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → CliError → exit status         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, slug, field)
//! 3. Errors are enum variants, never String
//! 4. A failed operation leaves the managers untouched

use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Pricing rule errors.
///
/// Every variant is a synchronous validation failure. Nothing here is
/// transient, so callers should surface the message instead of retrying.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A coupon with the same code is already registered.
    #[error("Coupon '{code}' already exists")]
    DuplicateCoupon { code: String },

    /// No coupon is registered under this code.
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// The coupon expiry lies in the past.
    ///
    /// ## User Workflow
    /// ```text
    /// Enter code "SUMMER"
    ///      │
    ///      ▼
    /// expires_at = 2026-09-01, now = 2026-10-16
    ///      │
    ///      ▼
    /// CouponExpired { code: "SUMMER", expired_at: 2026-09-01 }
    ///      │
    ///      ▼
    /// Applied set and usage counter unchanged
    /// ```
    #[error("Coupon '{code}' expired at {expired_at}")]
    CouponExpired {
        code: String,
        expired_at: DateTime<Utc>,
    },

    /// The coupon has been used as many times as it allows.
    #[error("Coupon '{code}' reached its usage limit of {max_uses}")]
    CouponUsageLimitExceeded { code: String, max_uses: u32 },

    /// The coupon is restricted to another user.
    #[error("Coupon '{code}' is not valid for this user")]
    CouponUserMismatch { code: String },

    /// A bulk-registered condition is missing a slug or rule, or carries a
    /// negative discount.
    #[error("Invalid condition at position {index}: {reason}")]
    InvalidCondition { index: usize, reason: String },

    /// No condition is registered under this slug.
    #[error("Condition not found: {0}")]
    ConditionNotFound(String),

    /// A dynamic field exists but holds a value of another type.
    #[error("Field '{key}' cannot be read as {expected}")]
    FieldTypeMismatch { key: String, expected: &'static str },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is touched, so a failed call never leaves a
/// half-registered coupon or condition behind.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    MustBeFinite { field: String },

    /// Value is below zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================
