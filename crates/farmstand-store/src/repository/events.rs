//! # Event Queue Repository
//!
//! Persists the analytics retry queue as a JSON array in FIFO order.

use std::sync::Arc;

use farmstand_core::QueuedEvent;

use super::{read_json, write_json};
use crate::error::StoreResult;
use crate::kv::KeyValueStore;

pub const QUEUED_EVENTS_KEY: &str = "analytics.queued_events";

#[derive(Clone)]
pub struct EventQueueRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl EventQueueRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        EventQueueRepository { kv }
    }

    /// Empty when nothing is stored.
    pub async fn load(&self) -> StoreResult<Vec<QueuedEvent>> {
        Ok(read_json(self.kv.as_ref(), QUEUED_EVENTS_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save(&self, events: &[QueuedEvent]) -> StoreResult<()> {
        write_json(self.kv.as_ref(), QUEUED_EVENTS_KEY, events).await
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.kv.remove(QUEUED_EVENTS_KEY).await
    }
}
