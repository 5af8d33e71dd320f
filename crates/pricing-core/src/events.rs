//! # Discount Events
//!
//! Notifications emitted when a condition matches during evaluation.
//!
//! ```text
//! ConditionManager::evaluate(items)
//!      │
//!      ▼
//! ConditionEvaluation { percent, matched: [DiscountApplied, ...] }
//!      │
//!      ▼
//! EventDispatcher::dispatch_all ── fire_events off? ──► dropped
//!      │
//!      ▼
//! every registered DiscountListener
//! ```
//!
//! Listeners are plain trait objects. Any `Fn(&DiscountApplied)` closure
//! qualifies, so hosts can bridge into whatever event bus they run.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Percent;

/// A condition matched and contributed its discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountApplied {
    /// Slug of the matched condition.
    pub slug: String,

    /// Percentage the condition contributes.
    pub discount_percent: Percent,

    /// Resolved truth value of the condition (always `true` for emitted events).
    pub condition_value: bool,
}

/// Receives [`DiscountApplied`] notifications.
pub trait DiscountListener: Send + Sync {
    fn discount_applied(&self, event: &DiscountApplied);
}

impl<F> DiscountListener for F
where
    F: Fn(&DiscountApplied) + Send + Sync,
{
    fn discount_applied(&self, event: &DiscountApplied) {
        self(event)
    }
}

/// Fan-out of discount events to registered listeners.
///
/// Dispatch is a no-op while disabled; the flag mirrors the `fire_events`
/// configuration option.
#[derive(Default)]
pub struct EventDispatcher {
    enabled: bool,
    listeners: Vec<Box<dyn DiscountListener>>,
}

impl EventDispatcher {
    pub fn new(enabled: bool) -> Self {
        EventDispatcher {
            enabled,
            listeners: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Registers a listener. Listeners are called in registration order.
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: DiscountListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers one event to every listener, if enabled.
    pub fn dispatch(&self, event: &DiscountApplied) {
        if !self.enabled {
            return;
        }
        for listener in &self.listeners {
            listener.discount_applied(event);
        }
    }

    /// Delivers a batch of events in order.
    pub fn dispatch_all<'a, I>(&self, events: I)
    where
        I: IntoIterator<Item = &'a DiscountApplied>,
    {
        if !self.enabled {
            return;
        }
        for event in events {
            self.dispatch(event);
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("enabled", &self.enabled)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn event(slug: &str) -> DiscountApplied {
        DiscountApplied {
            slug: slug.to_string(),
            discount_percent: Percent::new(5.0),
            condition_value: true,
        }
    }

    #[test]
    fn test_disabled_dispatcher_drops_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut dispatcher = EventDispatcher::new(false);
        dispatcher.subscribe(move |e: &DiscountApplied| sink.lock().unwrap().push(e.slug.clone()));
        dispatcher.dispatch(&event("bulk"));

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_enabled_dispatcher_reaches_all_listeners_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&seen);
        let second = Arc::clone(&seen);

        let mut dispatcher = EventDispatcher::new(true);
        dispatcher.subscribe(move |e: &DiscountApplied| first.lock().unwrap().push(format!("a:{}", e.slug)));
        dispatcher.subscribe(move |e: &DiscountApplied| second.lock().unwrap().push(format!("b:{}", e.slug)));

        dispatcher.dispatch_all(&[event("bulk"), event("vip")]);

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["a:bulk", "b:bulk", "a:vip", "b:vip"]
        );
        assert_eq!(dispatcher.listener_count(), 2);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let json = serde_json::to_value(event("bulk")).unwrap();
        assert_eq!(json["discountPercent"], serde_json::json!(5.0));
        assert_eq!(json["conditionValue"], serde_json::json!(true));
    }
}
