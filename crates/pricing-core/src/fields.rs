//! # Dynamic Fields
//!
//! Extra attributes a host hangs on a cart (customer tier, channel, notes)
//! without changing the cart type. Values are JSON so they round-trip
//! through requests unchanged.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PricingError, PricingResult};

/// String-keyed attribute map with typed accessors.
///
/// ## Example
/// ```rust
/// use pricing_core::DynamicFields;
///
/// let mut fields = DynamicFields::new();
/// fields.set("tier", "gold");
/// fields.set("visits", 12);
///
/// assert_eq!(fields.get_str("tier"), Some("gold"));
/// assert_eq!(fields.get_i64("visits"), Some(12));
/// assert_eq!(fields.get_str("visits"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicFields(BTreeMap<String, Value>);

impl DynamicFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Deserializes a field into `T`.
    ///
    /// `Ok(None)` when the key is absent; [`PricingError::FieldTypeMismatch`]
    /// when it is present but does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> PricingResult<Option<T>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| PricingError::FieldTypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Loyalty {
        tier: String,
        points: u32,
    }

    #[test]
    fn test_set_replaces_and_returns_previous() {
        let mut fields = DynamicFields::new();
        assert_eq!(fields.set("channel", "web"), None);
        assert_eq!(fields.set("channel", "pos"), Some(json!("web")));
        assert_eq!(fields.get_str("channel"), Some("pos"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_typed_accessors() {
        let mut fields = DynamicFields::new();
        fields.set("gift", true);
        fields.set("weight", 2.5);

        assert_eq!(fields.get_bool("gift"), Some(true));
        assert_eq!(fields.get_f64("weight"), Some(2.5));
        assert_eq!(fields.get_i64("weight"), None);
        assert_eq!(fields.get_bool("missing"), None);
    }

    #[test]
    fn test_get_as_struct() {
        let mut fields = DynamicFields::new();
        fields.set("loyalty", json!({ "tier": "gold", "points": 120 }));

        let loyalty: Option<Loyalty> = fields.get_as("loyalty").unwrap();
        assert_eq!(
            loyalty,
            Some(Loyalty {
                tier: "gold".to_string(),
                points: 120
            })
        );
        assert_eq!(fields.get_as::<Loyalty>("absent").unwrap(), None);
    }

    #[test]
    fn test_get_as_type_mismatch() {
        let mut fields = DynamicFields::new();
        fields.set("loyalty", "gold");

        let err = fields.get_as::<Loyalty>("loyalty").unwrap_err();
        assert!(matches!(err, PricingError::FieldTypeMismatch { key, .. } if key == "loyalty"));
    }

    #[test]
    fn test_remove_and_iter() {
        let mut fields = DynamicFields::new();
        fields.set("b", 2);
        fields.set("a", 1);

        let keys: Vec<_> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);

        assert_eq!(fields.remove("a"), Some(json!(1)));
        assert!(!fields.contains("a"));
        assert!(!fields.is_empty());
    }
}
