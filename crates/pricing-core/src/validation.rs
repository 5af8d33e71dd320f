//! # Validation Module
//!
//! Input checks run before coupons, conditions, items or configuration are
//! accepted.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape and type of requests / config files                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-empty codes and slugs                                         │
//! │  ├── Finite, non-negative amounts and percentages                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Managers                                                     │
//! │  └── Duplicates, expiry, usage limits, user restriction               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricing_core::validation::{validate_code, validate_percent};
//!
//! assert!(validate_code("SAVE10").is_ok());
//! assert!(validate_percent("discount", -5.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::Item;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a coupon code.
///
/// ## Rules
/// - Must not be empty or whitespace only
///
/// ## Example
/// ```rust
/// use pricing_core::validation::validate_code;
///
/// assert!(validate_code("SAVE10").is_ok());
/// assert!(validate_code("   ").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    validate_required("code", code)
}

/// Validates a condition slug.
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    validate_required("slug", slug)
}

fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount or quantity.
///
/// ## Rules
/// - Must be finite (no NaN / infinity)
/// - Must be non-negative (zero is allowed: free items, empty discounts)
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::MustBeFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage used for discounts or tax.
///
/// ## Rules
/// - Finite and non-negative
/// - No upper bound: stacked condition discounts may legitimately pass 100
pub fn validate_percent(field: &str, value: f64) -> ValidationResult<()> {
    validate_amount(field, value)
}

/// Validates a percentage that must stay within 0..=100.
///
/// Used for percent coupons, where more than 100% would refund money.
pub fn validate_bounded_percent(field: &str, value: f64) -> ValidationResult<()> {
    validate_amount(field, value)?;

    if value > 100.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a cart line.
///
/// ## Rules
/// - `price` finite and non-negative
/// - `quantity` finite and non-negative
///
/// ## Example
/// ```rust
/// use pricing_core::{validation::validate_item, Item};
///
/// assert!(validate_item(&Item::new(9.99, 2.0)).is_ok());
/// assert!(validate_item(&Item::new(-1.0, 2.0)).is_err());
/// ```
pub fn validate_item(item: &Item) -> ValidationResult<()> {
    validate_amount("price", item.price)?;
    validate_amount("quantity", item.quantity)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("SAVE10").is_ok());
        assert!(validate_code("summer-2026").is_ok());

        assert!(validate_code("").is_err());
        assert!(validate_code("  \t").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("bulk").is_ok());
        assert!(matches!(
            validate_slug(""),
            Err(ValidationError::Required { field }) if field == "slug"
        ));
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("price", 0.0).is_ok());
        assert!(validate_amount("price", 10.99).is_ok());

        assert!(matches!(
            validate_amount("price", -0.01),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
        assert!(matches!(
            validate_amount("price", f64::NAN),
            Err(ValidationError::MustBeFinite { .. })
        ));
        assert!(validate_amount("price", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_percent_allows_above_hundred() {
        assert!(validate_percent("discount", 150.0).is_ok());
        assert!(validate_percent("discount", -1.0).is_err());
    }

    #[test]
    fn test_validate_bounded_percent() {
        assert!(validate_bounded_percent("discount_value", 0.0).is_ok());
        assert!(validate_bounded_percent("discount_value", 100.0).is_ok());
        assert!(matches!(
            validate_bounded_percent("discount_value", 100.5),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_item() {
        assert!(validate_item(&Item::new(0.0, 0.0)).is_ok());
        assert!(validate_item(&Item::new(5.0, -1.0)).is_err());
        assert!(validate_item(&Item::new(f64::NAN, 1.0)).is_err());
    }
}
