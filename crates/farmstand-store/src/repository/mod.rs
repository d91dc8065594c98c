//! # Repository Module
//!
//! Typed access to the values the client persists.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartStore / EventTracker / SessionStore  (farmstand-client)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartRepository        general: "cart.items"                            │
//! │  EventQueueRepository  general: "analytics.queued_events"               │
//! │  SessionRepository     secure:  "auth.access_token"                     │
//! │                                 "auth.refresh_token"                    │
//! │                                 "auth.role"                             │
//! │                                 "auth.user"                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn KeyValueStore>  (SqliteKvStore or MemoryKvStore)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are JSON text, except tokens and the role flag which are stored raw.

pub mod cart;
pub mod events;
pub mod session;

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reads and decodes a JSON value. Undecodable data is `StoreError::Corrupt`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match kv.get(key).await? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
    }
}

/// Encodes a value and writes it with one upsert.
pub(crate) async fn write_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw).await
}
