//! # Key-Value Store
//!
//! The storage seam every repository is written against.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    trait KeyValueStore                                  │
//! │                                                                         │
//! │   get(key)            → Option<String>                                  │
//! │   set(key, value)     → single-statement upsert (atomic overwrite)      │
//! │   remove(key)                                                           │
//! │   remove_many(keys)   → one transaction, all or nothing                 │
//! │                                                                         │
//! │        ┌────────────────────┐        ┌────────────────────┐            │
//! │        │   SqliteKvStore    │        │   MemoryKvStore    │            │
//! │        │  kv_entries table  │        │  HashMap (tests)   │            │
//! │        │  scoped by         │        │                    │            │
//! │        │  namespace         │        │                    │            │
//! │        └────────────────────┘        └────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreResult;

/// Async string key-value storage.
///
/// Values are opaque strings; repositories own the encoding.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrites any previous value in one step.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Removes several keys atomically.
    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// One namespace of the `kv_entries` table.
#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
    namespace: String,
}

impl SqliteKvStore {
    pub fn new(pool: SqlitePool, namespace: impl Into<String>) -> Self {
        SqliteKvStore {
            pool,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_entries WHERE namespace = ?1 AND key = ?2")
                .bind(&self.namespace)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(namespace = %self.namespace, key = %key, bytes = value.len(), "kv set");

        sqlx::query(
            r#"
            INSERT INTO kv_entries (namespace, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (namespace, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(namespace = %self.namespace, key = %key, "kv remove");

        sqlx::query("DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2")
            .bind(&self.namespace)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query("DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2")
                .bind(&self.namespace)
                .bind(*key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        debug!(namespace = %self.namespace, count = keys.len(), "kv remove_many");
        Ok(())
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        MemoryKvStore::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_sqlite_set_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv("general");

        assert_eq!(kv.get("cart.items").await.unwrap(), None);

        kv.set("cart.items", "[1]").await.unwrap();
        kv.set("cart.items", "[1,2]").await.unwrap();
        assert_eq!(kv.get("cart.items").await.unwrap().as_deref(), Some("[1,2]"));

        kv.remove("cart.items").await.unwrap();
        assert_eq!(kv.get("cart.items").await.unwrap(), None);

        // Removing again is fine
        kv.remove("cart.items").await.unwrap();
    }

    #[tokio::test]
    async fn test_sqlite_namespaces_are_isolated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let secure = db.kv("secure");
        let general = db.kv("general");

        secure.set("k", "secret").await.unwrap();
        assert_eq!(general.get("k").await.unwrap(), None);
        assert_eq!(secure.get("k").await.unwrap().as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_sqlite_remove_many() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv("secure");
        kv.set("a", "1").await.unwrap();
        kv.set("b", "2").await.unwrap();
        kv.set("c", "3").await.unwrap();

        kv.remove_many(&["a", "b", "missing"]).await.unwrap();

        assert_eq!(kv.get("a").await.unwrap(), None);
        assert_eq!(kv.get("b").await.unwrap(), None);
        assert_eq!(kv.get("c").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let kv = MemoryKvStore::new();
        kv.set("a", "1").await.unwrap();
        kv.set("b", "2").await.unwrap();
        assert_eq!(kv.len().await, 2);

        kv.remove_many(&["a", "b"]).await.unwrap();
        assert!(kv.is_empty().await);
    }
}
