//! # farmstand-store: On-Device Persistence
//!
//! Namespaced key-value storage over SQLite, plus typed repositories for
//! each thing the client keeps between launches.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  farmstand-client stores (CartStore, SessionStore, EventTracker)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 farmstand-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ cart, events, │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ session       │    │ 0001_kv.sql  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                      trait KeyValueStore (kv.rs)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  farmstand.db (platform data dir)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use farmstand_store::{Database, DbConfig, CartRepository, GENERAL_NAMESPACE};
//!
//! let db = Database::new(DbConfig::new("farmstand.db")).await?;
//! let carts = CartRepository::new(Arc::new(db.kv(GENERAL_NAMESPACE)));
//! let restored = carts.load().await?;
//! ```

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use pool::{Database, DbConfig};

pub use repository::cart::{CartRepository, CART_KEY};
pub use repository::events::{EventQueueRepository, QUEUED_EVENTS_KEY};
pub use repository::session::{
    SessionRepository, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY, USER_KEY,
};

/// Namespace for tokens, the role flag and the cached user.
pub const SECURE_NAMESPACE: &str = "secure";

/// Namespace for the cart snapshot and queued analytics events.
pub const GENERAL_NAMESPACE: &str = "general";
