//! # Condition Manager
//!
//! Named discount rules: a slug, a rule (static boolean or predicate over the
//! cart items) and the percentage it contributes when it holds.
//!
//! ## Evaluation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ConditionManager::evaluate(items)                    │
//! │                                                                         │
//! │  for each condition (registration order)                               │
//! │      │                                                                  │
//! │      ├── skip == true? ─────────────────────────► ignored               │
//! │      │                                                                  │
//! │      ├── Static(bool)      → value = bool                               │
//! │      ├── Predicate(fn)     → value = fn(items)                          │
//! │      │                                                                  │
//! │      └── value == true? ──► percent += discount                         │
//! │                             matched.push(DiscountApplied)               │
//! │                                                                         │
//! │  Result: ConditionEvaluation { percent, matched }                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricing_core::{ConditionManager, Item};
//!
//! let mut conditions = ConditionManager::new();
//! conditions.define("bulk", |items: &[Item]| items.len() >= 3, 5.0, false).unwrap();
//! conditions.define_if("launch-week", true, 2.5).unwrap();
//!
//! let items = vec![Item::new(10.0, 1.0); 3];
//! assert_eq!(conditions.condition_discount(&items).value(), 7.5);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::events::DiscountApplied;
use crate::types::{Item, Percent};
use crate::validation::{validate_percent, validate_slug};

/// Predicate over the current cart items.
pub type Predicate = Arc<dyn Fn(&[Item]) -> bool + Send + Sync>;

// =============================================================================
// Condition Rule
// =============================================================================

/// What decides whether a condition holds.
#[derive(Clone)]
pub enum ConditionRule {
    /// Fixed truth value, independent of the items.
    Static(bool),
    /// Evaluated against the items on every pricing pass.
    Predicate(Predicate),
}

impl ConditionRule {
    /// Wraps a closure as a predicate rule.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&[Item]) -> bool + Send + Sync + 'static,
    {
        ConditionRule::Predicate(Arc::new(f))
    }

    /// Resolves the truth value for the given items.
    pub fn resolve(&self, items: &[Item]) -> bool {
        match self {
            ConditionRule::Static(value) => *value,
            ConditionRule::Predicate(f) => f(items),
        }
    }
}

impl From<bool> for ConditionRule {
    fn from(value: bool) -> Self {
        ConditionRule::Static(value)
    }
}

impl fmt::Debug for ConditionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionRule::Static(value) => f.debug_tuple("Static").field(value).finish(),
            ConditionRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

// =============================================================================
// Condition
// =============================================================================

/// A registered discount rule.
#[derive(Debug, Clone)]
pub struct Condition {
    pub slug: String,
    pub rule: ConditionRule,
    pub discount: Percent,
    /// Stored but excluded from evaluation.
    pub skip: bool,
}

/// Input for [`ConditionManager::add`].
///
/// Fields are optional so a batch assembled from loosely-typed input can be
/// rejected with a precise [`PricingError::InvalidCondition`].
#[derive(Debug, Clone, Default)]
pub struct NewCondition {
    pub slug: Option<String>,
    pub rule: Option<ConditionRule>,
    /// Defaults to 0 when absent.
    pub discount: Option<f64>,
    pub skip: bool,
}

impl NewCondition {
    /// A complete, non-skipped condition.
    pub fn new(slug: impl Into<String>, rule: impl Into<ConditionRule>, discount: f64) -> Self {
        NewCondition {
            slug: Some(slug.into()),
            rule: Some(rule.into()),
            discount: Some(discount),
            skip: false,
        }
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }
}

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionEvaluation {
    /// Sum of the discounts of every matched condition.
    pub percent: Percent,
    /// One event per matched condition, in registration order.
    pub matched: Vec<DiscountApplied>,
}

// =============================================================================
// Condition Manager
// =============================================================================

/// Registry of discount conditions keyed by slug.
///
/// ## Invariants
/// - Slugs are unique; re-registering a slug replaces the rule in place
/// - Discounts are finite and non-negative
#[derive(Debug, Clone, Default)]
pub struct ConditionManager {
    conditions: Vec<Condition>,
}

impl ConditionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a batch of conditions.
    ///
    /// The whole batch is checked first; if any entry is invalid nothing is
    /// registered.
    ///
    /// ## Errors
    /// - [`PricingError::InvalidCondition`] when an entry has no slug, no
    ///   rule, or a negative / non-finite discount
    pub fn add<I>(&mut self, conditions: I) -> PricingResult<()>
    where
        I: IntoIterator<Item = NewCondition>,
    {
        let mut accepted = Vec::new();

        for (index, new) in conditions.into_iter().enumerate() {
            let invalid = |reason: String| PricingError::InvalidCondition { index, reason };

            let slug = new
                .slug
                .filter(|s| validate_slug(s).is_ok())
                .ok_or_else(|| invalid("slug is required".to_string()))?;
            let rule = new
                .rule
                .ok_or_else(|| invalid("condition is required".to_string()))?;
            let discount = new.discount.unwrap_or(0.0);
            validate_percent("discount", discount).map_err(|e| invalid(e.to_string()))?;

            accepted.push(Condition {
                slug,
                rule,
                discount: Percent::new(discount),
                skip: new.skip,
            });
        }

        for condition in accepted {
            self.upsert(condition);
        }
        Ok(())
    }

    /// Registers a predicate condition.
    ///
    /// With `skip = true` the rule is kept but never contributes, which
    /// allows toggling a rule without losing it.
    pub fn define<F>(&mut self, slug: &str, predicate: F, discount: f64, skip: bool) -> PricingResult<()>
    where
        F: Fn(&[Item]) -> bool + Send + Sync + 'static,
    {
        self.define_rule(slug, ConditionRule::predicate(predicate), discount, skip)
    }

    /// Registers a static condition.
    pub fn define_if(&mut self, slug: &str, condition: bool, discount: f64) -> PricingResult<()> {
        self.define_rule(slug, ConditionRule::Static(condition), discount, false)
    }

    /// Registers a condition from an already-built rule.
    pub fn define_rule(
        &mut self,
        slug: &str,
        rule: ConditionRule,
        discount: f64,
        skip: bool,
    ) -> PricingResult<()> {
        validate_slug(slug)?;
        validate_percent("discount", discount)?;

        self.upsert(Condition {
            slug: slug.to_string(),
            rule,
            discount: Percent::new(discount),
            skip,
        });
        Ok(())
    }

    fn upsert(&mut self, condition: Condition) {
        debug!(
            slug = %condition.slug,
            discount = condition.discount.value(),
            skip = condition.skip,
            "Registering condition"
        );

        match self.conditions.iter_mut().find(|c| c.slug == condition.slug) {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }

    /// All conditions in registration order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn get(&self, slug: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.slug == slug)
    }

    pub fn remove(&mut self, slug: &str) -> Option<Condition> {
        let pos = self.conditions.iter().position(|c| c.slug == slug)?;
        Some(self.conditions.remove(pos))
    }

    /// Toggles whether a condition takes part in evaluation.
    pub fn set_skip(&mut self, slug: &str, skip: bool) -> PricingResult<()> {
        let condition = self
            .conditions
            .iter_mut()
            .find(|c| c.slug == slug)
            .ok_or_else(|| PricingError::ConditionNotFound(slug.to_string()))?;
        condition.skip = skip;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates every active condition against `items`.
    pub fn evaluate(&self, items: &[Item]) -> ConditionEvaluation {
        let mut evaluation = ConditionEvaluation::default();

        for condition in self.conditions.iter().filter(|c| !c.skip) {
            if !condition.rule.resolve(items) {
                continue;
            }

            debug!(slug = %condition.slug, discount = condition.discount.value(), "Condition matched");
            evaluation.percent = evaluation.percent + condition.discount;
            evaluation.matched.push(DiscountApplied {
                slug: condition.slug.clone(),
                discount_percent: condition.discount,
                condition_value: true,
            });
        }

        evaluation
    }

    /// Summed discount percentage of the matching conditions.
    pub fn condition_discount(&self, items: &[Item]) -> Percent {
        self.evaluate(items).percent
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Item> {
        vec![Item::new(10.0, 1.0); n]
    }

    fn bulk_manager() -> ConditionManager {
        let mut manager = ConditionManager::new();
        manager
            .define("bulk", |items: &[Item]| items.len() >= 3, 5.0, false)
            .unwrap();
        manager
    }

    #[test]
    fn test_bulk_condition_threshold() {
        let manager = bulk_manager();
        assert_eq!(manager.condition_discount(&items(2)), Percent::zero());
        assert_eq!(manager.condition_discount(&items(3)), Percent::new(5.0));
    }

    #[test]
    fn test_static_conditions_sum() {
        let mut manager = ConditionManager::new();
        manager.define_if("member", true, 10.0).unwrap();
        manager.define_if("holiday", false, 20.0).unwrap();
        manager.define_if("launch", true, 2.5).unwrap();

        let evaluation = manager.evaluate(&[]);
        assert_eq!(evaluation.percent, Percent::new(12.5));
        let slugs: Vec<_> = evaluation.matched.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["member", "launch"]);
    }

    #[test]
    fn test_skipped_condition_never_contributes() {
        let mut manager = ConditionManager::new();
        manager.define("always", |_: &[Item]| true, 15.0, true).unwrap();

        assert_eq!(manager.condition_discount(&items(5)), Percent::zero());
        assert!(manager.evaluate(&items(5)).matched.is_empty());

        manager.set_skip("always", false).unwrap();
        assert_eq!(manager.condition_discount(&items(5)), Percent::new(15.0));
    }

    #[test]
    fn test_redefining_slug_overwrites_in_place() {
        let mut manager = bulk_manager();
        manager.define_if("other", true, 1.0).unwrap();
        manager.define_if("bulk", true, 7.0).unwrap();

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.conditions()[0].slug, "bulk");
        assert_eq!(manager.get("bulk").unwrap().discount, Percent::new(7.0));
        assert_eq!(manager.condition_discount(&[]), Percent::new(8.0));
    }

    #[test]
    fn test_add_defaults_missing_discount_to_zero() {
        let mut manager = ConditionManager::new();
        manager
            .add(vec![NewCondition {
                slug: Some("flag".to_string()),
                rule: Some(true.into()),
                discount: None,
                skip: false,
            }])
            .unwrap();

        assert_eq!(manager.get("flag").unwrap().discount, Percent::zero());
    }

    #[test]
    fn test_add_rejects_missing_slug_without_partial_insert() {
        let mut manager = ConditionManager::new();
        let result = manager.add(vec![
            NewCondition::new("ok", true, 5.0),
            NewCondition {
                rule: Some(true.into()),
                discount: Some(5.0),
                ..Default::default()
            },
        ]);

        assert!(matches!(
            result,
            Err(PricingError::InvalidCondition { index: 1, .. })
        ));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_add_rejects_missing_rule_and_negative_discount() {
        let mut manager = ConditionManager::new();

        let missing_rule = NewCondition {
            slug: Some("x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            manager.add(vec![missing_rule]),
            Err(PricingError::InvalidCondition { index: 0, .. })
        ));

        let negative = NewCondition::new("neg", true, -1.0);
        assert!(matches!(
            manager.add(vec![negative]),
            Err(PricingError::InvalidCondition { index: 0, .. })
        ));
        assert!(manager.define_if("neg", true, -1.0).is_err());
    }

    #[test]
    fn test_add_skipped_entry() {
        let mut manager = ConditionManager::new();
        manager
            .add(vec![NewCondition::new("off", true, 3.0).skipped()])
            .unwrap();
        assert!(manager.get("off").unwrap().skip);
        assert_eq!(manager.condition_discount(&[]), Percent::zero());
    }

    #[test]
    fn test_predicate_sees_item_attributes() {
        let mut manager = ConditionManager::new();
        manager
            .define(
                "beverages",
                |items: &[Item]| {
                    items
                        .iter()
                        .any(|i| i.attribute("category").and_then(|v| v.as_str()) == Some("beverage"))
                },
                4.0,
                false,
            )
            .unwrap();

        let plain = vec![Item::new(1.0, 1.0)];
        let drinks = vec![Item::new(1.0, 1.0).with_attribute("category", "beverage")];
        assert_eq!(manager.condition_discount(&plain), Percent::zero());
        assert_eq!(manager.condition_discount(&drinks), Percent::new(4.0));
    }

    #[test]
    fn test_remove_and_unknown_set_skip() {
        let mut manager = bulk_manager();
        assert!(manager.remove("bulk").is_some());
        assert!(manager.remove("bulk").is_none());
        assert!(matches!(
            manager.set_skip("bulk", true),
            Err(PricingError::ConditionNotFound(_))
        ));
    }
}
