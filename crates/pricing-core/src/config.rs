//! # Pricing Configuration
//!
//! Host-provided settings for a [`Cart`](crate::Cart).
//!
//! ## Recognized Options
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Option            Default          Meaning                             │
//! │  ────────────────  ───────────────  ─────────────────────────────────   │
//! │  global_discount   0                % off applied to every cart         │
//! │  global_tax_rate   0                tax % when no override is given     │
//! │  fire_events       false            emit DiscountApplied notifications  │
//! │  tax_base          after_discount   what the tax rate applies to        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate never reads files or the environment; hosts deserialize the
//! struct from wherever they keep settings (see `pricing-cli`).

use serde::{Deserialize, Serialize};

use crate::error::PricingResult;
use crate::types::{Percent, TaxBase};
use crate::validation::validate_percent;

/// Cart-level pricing settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Default discount percentage applied when no per-call override is given.
    pub global_discount: Percent,

    /// Default tax percentage.
    pub global_tax_rate: Percent,

    /// Whether condition matches are dispatched to listeners.
    pub fire_events: bool,

    pub tax_base: TaxBase,
}

impl PricingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_discount(mut self, percent: f64) -> Self {
        self.global_discount = Percent::new(percent);
        self
    }

    pub fn with_global_tax_rate(mut self, percent: f64) -> Self {
        self.global_tax_rate = Percent::new(percent);
        self
    }

    pub fn with_fire_events(mut self, enabled: bool) -> Self {
        self.fire_events = enabled;
        self
    }

    pub fn with_tax_base(mut self, base: TaxBase) -> Self {
        self.tax_base = base;
        self
    }

    /// Rejects negative or non-finite percentages.
    pub fn validate(&self) -> PricingResult<()> {
        validate_percent("global_discount", self.global_discount.value())?;
        validate_percent("global_tax_rate", self.global_tax_rate.value())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert!(config.global_discount.is_zero());
        assert!(config.global_tax_rate.is_zero());
        assert!(!config.fire_events);
        assert_eq!(config.tax_base, TaxBase::AfterDiscount);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: PricingConfig =
            serde_json::from_value(serde_json::json!({ "global_tax_rate": 8.25 })).unwrap();
        assert_eq!(config.global_tax_rate, Percent::new(8.25));
        assert!(config.global_discount.is_zero());
    }

    #[test]
    fn test_validate_rejects_negative() {
        let config = PricingConfig::new().with_global_discount(-5.0);
        assert!(matches!(config.validate(), Err(PricingError::Validation(_))));

        let config = PricingConfig::new().with_global_tax_rate(f64::NAN);
        assert!(config.validate().is_err());
    }
}
