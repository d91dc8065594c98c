//! # Event Tracker
//!
//! Best-effort analytics with a bounded, persisted retry queue.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    EventTracker::track(event)                           │
//! │                                                                         │
//! │  POST /analytics/events                                                 │
//! │     │                                                                   │
//! │     ├── ok ───► flush()                                                 │
//! │     │             send every queued event                               │
//! │     │             all ok?  ──► clear queue + mirror                     │
//! │     │             any err? ──► keep the whole queue                     │
//! │     │                                                                   │
//! │     └── err ──► queue_event(event)                                      │
//! │                   push (evicts the oldest past the cap) ──► persist     │
//! │                                                                         │
//! │  Nothing here returns an error to the caller.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use farmstand_core::{EventQueue, QueuedEvent, TrackedEvent};
use farmstand_store::EventQueueRepository;

use crate::api::analytics::send_event;
use crate::api::ApiClient;

/// Result of one flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushOutcome {
    pub sent: usize,
    pub failed: usize,
    /// Entries still queued afterwards.
    pub remaining: usize,
}

pub struct EventTracker {
    client: ApiClient,
    repo: EventQueueRepository,
    queue: Mutex<EventQueue>,
    enabled: bool,
}

impl EventTracker {
    pub fn new(client: ApiClient, repo: EventQueueRepository, capacity: usize, enabled: bool) -> Self {
        EventTracker {
            client,
            repo,
            queue: Mutex::new(EventQueue::with_capacity(capacity)),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Restores queued events left over from a previous run.
    pub async fn load(&self) {
        let mut queue = self.queue.lock().await;
        let entries = match self.repo.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable event queue");
                Vec::new()
            }
        };
        *queue = EventQueue::from_entries(entries, queue.capacity());
        debug!(queued = queue.len(), "Event queue restored");
    }

    /// Sends one event now, queueing it on failure.
    pub async fn track(&self, event: TrackedEvent) {
        if !self.enabled {
            return;
        }

        match send_event(&self.client, &event).await {
            Ok(()) => {
                debug!(event_type = ?event.event_type, "Event sent");
                self.flush().await;
            }
            Err(e) => {
                debug!(event_type = ?event.event_type, error = %e, "Event send failed, queueing");
                self.queue_event(event).await;
            }
        }
    }

    /// Appends to the persisted queue, evicting the oldest entry when full.
    pub async fn queue_event(&self, event: TrackedEvent) {
        let mut queue = self.queue.lock().await;
        if let Some(evicted) = queue.push(QueuedEvent::new(event)) {
            warn!(
                event_type = ?evicted.event.event_type,
                queued_at = %evicted.queued_at,
                "Event queue full, dropped oldest event"
            );
        }
        if let Err(e) = self.repo.save(&queue.to_vec()).await {
            warn!(error = %e, "Failed to persist event queue");
        }
    }

    /// Sends every queued event. The queue is cleared only if all succeed.
    pub async fn flush(&self) -> FlushOutcome {
        let mut queue = self.queue.lock().await;
        if queue.is_empty() {
            return FlushOutcome::default();
        }

        let mut outcome = FlushOutcome::default();
        for entry in queue.iter() {
            match send_event(&self.client, &entry.event).await {
                Ok(()) => outcome.sent += 1,
                Err(e) => {
                    debug!(error = %e, "Queued event send failed");
                    outcome.failed += 1;
                }
            }
        }

        if outcome.failed == 0 {
            queue.clear();
            if let Err(e) = self.repo.clear().await {
                warn!(error = %e, "Failed to clear persisted event queue");
            }
            info!(sent = outcome.sent, "Event queue flushed");
        } else {
            warn!(
                sent = outcome.sent,
                failed = outcome.failed,
                "Event flush incomplete, keeping queue"
            );
        }

        outcome.remaining = queue.len();
        outcome
    }

    pub async fn queued_len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn queued(&self) -> Vec<QueuedEvent> {
        self.queue.lock().await.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api_client, ScriptedTransport};
    use crate::transport::TransportError;
    use farmstand_core::EventType;
    use farmstand_store::MemoryKvStore;
    use serde_json::json;
    use std::sync::Arc;

    fn tracker(capacity: usize) -> (EventTracker, Arc<ScriptedTransport>, Arc<MemoryKvStore>) {
        let (client, transport, _) = api_client();
        let general = Arc::new(MemoryKvStore::new());
        let repo = EventQueueRepository::new(general.clone());
        (EventTracker::new(client, repo, capacity, true), transport, general)
    }

    fn view(product_id: &str) -> TrackedEvent {
        TrackedEvent::new(EventType::ProductView).with_product(product_id)
    }

    #[tokio::test]
    async fn test_failed_send_is_queued_and_persisted() {
        let (tracker, transport, general) = tracker(50);
        transport.fail(TransportError::Connect("offline".into()));

        tracker.track(view("p1")).await;

        assert_eq!(tracker.queued_len().await, 1);
        let persisted = EventQueueRepository::new(general).load().await.unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].event.product_id.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_success_flushes_queue() {
        let (tracker, transport, general) = tracker(50);
        tracker.queue_event(view("p1")).await;
        tracker.queue_event(view("p2")).await;

        transport
            .respond(201, json!({}))
            .respond(201, json!({}))
            .respond(201, json!({}));
        tracker.track(view("p3")).await;

        assert_eq!(transport.request_count(), 3);
        assert_eq!(tracker.queued_len().await, 0);
        assert!(EventQueueRepository::new(general).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_flush_keeps_everything() {
        let (tracker, transport, _) = tracker(50);
        tracker.queue_event(view("p1")).await;
        tracker.queue_event(view("p2")).await;
        tracker.queue_event(view("p3")).await;

        transport
            .respond(201, json!({}))
            .respond(500, json!({"message": "boom"}))
            .respond(201, json!({}));

        let outcome = tracker.flush().await;
        assert_eq!(outcome, FlushOutcome { sent: 2, failed: 1, remaining: 3 });
        assert_eq!(tracker.queued_len().await, 3);
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let (tracker, _, _) = tracker(2);
        tracker.queue_event(view("p1")).await;
        tracker.queue_event(view("p2")).await;
        tracker.queue_event(view("p3")).await;

        let ids: Vec<_> = tracker
            .queued()
            .await
            .into_iter()
            .filter_map(|q| q.event.product_id)
            .collect();
        assert_eq!(ids, vec!["p2", "p3"]);
    }

    #[tokio::test]
    async fn test_restores_persisted_queue() {
        let (tracker, _, general) = tracker(50);
        tracker.queue_event(view("p1")).await;

        let (client, _, _) = api_client();
        let restored = EventTracker::new(client, EventQueueRepository::new(general), 50, true);
        restored.load().await;
        assert_eq!(restored.queued_len().await, 1);
    }

    #[tokio::test]
    async fn test_disabled_tracker_sends_nothing() {
        let (client, transport, _) = api_client();
        let repo = EventQueueRepository::new(Arc::new(MemoryKvStore::new()));
        let tracker = EventTracker::new(client, repo, 50, false);

        tracker.track(view("p1")).await;
        assert_eq!(transport.request_count(), 0);
        assert_eq!(tracker.queued_len().await, 0);
    }
}
