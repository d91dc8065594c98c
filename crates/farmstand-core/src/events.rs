//! # Analytics Events
//!
//! Event payloads and the bounded FIFO of events that failed to send.
//!
//! ## Retry Queue
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    EventQueue (cap = 50)                                │
//! │                                                                         │
//! │   oldest                                                    newest      │
//! │   ┌──────┬──────┬──────┬─────────────────────────┬──────┐               │
//! │   │ ev 1 │ ev 2 │ ev 3 │          ...            │ ev 50│ ◄── push      │
//! │   └──────┴──────┴──────┴─────────────────────────┴──────┘               │
//! │      │                                                                  │
//! │      └──► evicted when ev 51 arrives                                    │
//! │                                                                         │
//! │   flush: send all ──► every send ok? ──► yes: clear()                  │
//! │                                      └─► no:  keep everything          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No deduplication and no per-event retry counters: a flush is all or
//! nothing, so an event may be delivered more than once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::MAX_QUEUED_EVENTS;

// =============================================================================
// Event Payloads
// =============================================================================

/// Analytics event type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ProductView,
    AddToCart,
    RemoveFromCart,
    Purchase,
    Search,
    RecommendationClick,
    Login,
}

/// Payload for `POST /analytics/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Numeric value, e.g. order total in major units for `purchase`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl TrackedEvent {
    pub fn new(event_type: EventType) -> Self {
        TrackedEvent {
            event_type,
            user_id: None,
            product_id: None,
            value: None,
            metadata: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Adds one metadata entry, creating the bag on first use.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// An event waiting for redelivery, stamped with its capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedEvent {
    #[serde(flatten)]
    pub event: TrackedEvent,
    pub queued_at: DateTime<Utc>,
}

impl QueuedEvent {
    pub fn new(event: TrackedEvent) -> Self {
        QueuedEvent {
            event,
            queued_at: Utc::now(),
        }
    }
}

// =============================================================================
// Event Queue
// =============================================================================

/// Bounded FIFO. Pushing at capacity evicts exactly the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQueue {
    entries: VecDeque<QueuedEvent>,
    capacity: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        EventQueue::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue::with_capacity(MAX_QUEUED_EVENTS)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        EventQueue {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Rebuilds a queue from a persisted list, keeping the newest entries
    /// if the list is longer than the capacity.
    pub fn from_entries(entries: Vec<QueuedEvent>, capacity: usize) -> Self {
        let mut queue = EventQueue::with_capacity(capacity);
        for entry in entries {
            queue.push(entry);
        }
        queue
    }

    /// Appends an entry, returning the evicted oldest one if at capacity.
    pub fn push(&mut self, entry: QueuedEvent) -> Option<QueuedEvent> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedEvent> {
        self.entries.iter()
    }

    /// Copy of the entries in FIFO order, for persistence and flushing.
    pub fn to_vec(&self) -> Vec<QueuedEvent> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn view(n: usize) -> QueuedEvent {
        QueuedEvent::new(TrackedEvent::new(EventType::ProductView).with_product(format!("p{n}")))
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(EventQueue::new().capacity(), MAX_QUEUED_EVENTS);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut queue = EventQueue::with_capacity(3);
        assert!(queue.push(view(1)).is_none());
        queue.push(view(2));
        queue.push(view(3));

        let evicted = queue.push(view(4)).unwrap();
        assert_eq!(evicted.event.product_id.as_deref(), Some("p1"));

        let remaining: Vec<_> = queue
            .iter()
            .map(|e| e.event.product_id.clone().unwrap())
            .collect();
        assert_eq!(remaining, vec!["p2", "p3", "p4"]);
    }

    #[test]
    fn test_from_entries_keeps_newest() {
        let entries = (0..10).map(view).collect();
        let queue = EventQueue::from_entries(entries, 4);
        assert_eq!(queue.len(), 4);
        assert_eq!(
            queue.iter().next().unwrap().event.product_id.as_deref(),
            Some("p6")
        );
    }

    #[test]
    fn test_queued_event_wire_shape() {
        let entry = QueuedEvent::new(
            TrackedEvent::new(EventType::AddToCart)
                .with_user("u1")
                .with_product("p1")
                .with_value(2.0)
                .with_meta("source", "search"),
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["eventType"], "add_to_cart");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["metadata"]["source"], "search");
        assert!(json.get("queuedAt").is_some());

        let back: QueuedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    proptest! {
        #[test]
        fn prop_queue_never_exceeds_cap(cap in 1usize..20, pushes in 0usize..100) {
            let mut queue = EventQueue::with_capacity(cap);
            for n in 0..pushes {
                queue.push(view(n));
                prop_assert!(queue.len() <= cap);
            }
            prop_assert_eq!(queue.len(), pushes.min(cap));
            if pushes > 0 {
                let newest = format!("p{}", pushes - 1);
                prop_assert_eq!(
                    queue.iter().last().unwrap().event.product_id.as_deref(),
                    Some(newest.as_str())
                );
            }
        }
    }
}
