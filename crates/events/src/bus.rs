//! Event bus abstraction for decoupled event emission.
//!
//! The trackers publish through this trait instead of the Tauri event system,
//! so they can be driven and inspected in tests without a running app.

use std::sync::{Arc, Mutex, PoisonError};

/// Trait for pushing events to the presentation layer.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name (e.g., "onMediaChanged")
    /// * `payload` - JSON payload to emit
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// In-memory event bus for testing.
///
/// Captures all emitted events for later inspection.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

/// A captured event from InMemoryEventBus.
#[derive(Debug, Clone, PartialEq)]
struct EmittedEvent {
    topic: String,
    payload: serde_json::Value,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get payloads for a specific topic, in emission order.
    pub fn payloads_for(&self, topic: &str) -> Vec<serde_json::Value> {
        self.lock()
            .iter()
            .filter(|e| e.topic == topic)
            .map(|e| e.payload.clone())
            .collect()
    }

    /// Clear all captured events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EmittedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.lock().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_event_bus() {
        let bus = InMemoryEventBus::new();

        bus.emit("onMediaChanged", json!({"title": "a"}));
        bus.emit("other", json!({}));
        bus.emit("onMediaChanged", json!({"title": "b"}));

        assert_eq!(bus.len(), 3);
        assert_eq!(
            bus.payloads_for("onMediaChanged"),
            vec![json!({"title": "a"}), json!({"title": "b"})]
        );
        assert!(bus.payloads_for("missing").is_empty());
    }

    #[test]
    fn test_in_memory_event_bus_clear() {
        let bus = InMemoryEventBus::new();

        bus.emit("test:event", json!({}));
        assert!(!bus.is_empty());

        bus.clear();
        assert!(bus.is_empty());
    }
}
