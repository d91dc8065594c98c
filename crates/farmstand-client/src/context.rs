//! # Application Context
//!
//! Owns every store and hands them to the flows. There are no globals: a
//! shell builds one `AppContext` at startup and passes it around.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AppContext                                      │
//! │                                                                         │
//! │  config ──► Database (SQLite) ──┬── kv("secure")  ──► ApiClient tokens │
//! │                                 │                 └─► SessionStore     │
//! │                                 └── kv("general") ──► CartStore        │
//! │                                                   └─► EventTracker     │
//! │                                                                         │
//! │  config ──► ReqwestTransport ──► ApiClient ──► EventTracker, flows     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use farmstand_store::{
    CartRepository, Database, DbConfig, EventQueueRepository, KeyValueStore, GENERAL_NAMESPACE,
    SECURE_NAMESPACE,
};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::state::{CartStore, SessionStore};
use crate::tracker::EventTracker;
use crate::transport::{HttpTransport, ReqwestTransport};

pub struct AppContext {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub session: SessionStore,
    pub cart: CartStore,
    pub tracker: EventTracker,
    db: Option<Database>,
}

impl AppContext {
    /// Opens local storage and the HTTP transport described by `config`,
    /// then restores persisted state.
    pub async fn open(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let path = config.database_path()?;
        let db_config = if path == Path::new(":memory:") {
            DbConfig::in_memory()
        } else {
            DbConfig::new(path)
        };
        let db = Database::new(db_config).await?;

        let transport = Arc::new(ReqwestTransport::new(config.base_url(), config.timeout())?);
        let secure = Arc::new(db.kv(SECURE_NAMESPACE));
        let general = Arc::new(db.kv(GENERAL_NAMESPACE));

        let mut ctx = Self::with_parts(config, transport, secure, general);
        ctx.db = Some(db);
        ctx.restore().await;

        info!(base_url = %ctx.config.base_url(), "Client context ready");
        Ok(ctx)
    }

    /// Assembles a context from explicit parts. Nothing is restored.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        secure: Arc<dyn KeyValueStore>,
        general: Arc<dyn KeyValueStore>,
    ) -> Self {
        let api = ApiClient::new(transport, secure);
        let session = SessionStore::new(api.session_repository().clone());
        let cart = CartStore::new(CartRepository::new(general.clone()));
        let tracker = EventTracker::new(
            api.clone(),
            EventQueueRepository::new(general),
            config.tracking.max_queued_events,
            config.tracking.enabled,
        );

        AppContext {
            config,
            api,
            session,
            cart,
            tracker,
            db: None,
        }
    }

    /// Reads the persisted user, cart and queued events into memory.
    pub async fn restore(&self) {
        self.session.load_user().await;
        self.cart.load().await;
        self.tracker.load().await;
    }

    pub fn database(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    pub async fn close(&self) {
        if let Some(db) = &self.db {
            db.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use farmstand_core::{Money, NewCartItem};
    use farmstand_store::MemoryKvStore;

    #[tokio::test]
    async fn test_open_in_memory() {
        let mut config = ClientConfig::default();
        config.storage.database_path = Some(":memory:".into());

        let ctx = AppContext::open(config).await.unwrap();
        assert!(ctx.database().unwrap().health_check().await);
        assert!(!ctx.session.is_loading().await);
        ctx.close().await;
    }

    #[tokio::test]
    async fn test_restore_reads_shared_general_store() {
        let general = Arc::new(MemoryKvStore::new());
        let first = AppContext::with_parts(
            ClientConfig::default(),
            ScriptedTransport::new(),
            Arc::new(MemoryKvStore::new()),
            general.clone(),
        );
        first
            .cart
            .add(NewCartItem::new("p1", "Kale", Money::from_cents(300), 2, "bunch", "f1"))
            .await
            .unwrap();

        let second = AppContext::with_parts(
            ClientConfig::default(),
            ScriptedTransport::new(),
            Arc::new(MemoryKvStore::new()),
            general,
        );
        second.restore().await;
        assert_eq!(second.cart.item_count().await, 2);
    }
}
