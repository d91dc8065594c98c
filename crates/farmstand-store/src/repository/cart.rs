//! # Cart Repository
//!
//! The persisted mirror of the local cart: one JSON snapshot, overwritten
//! whole after every mutation.

use std::sync::Arc;
use tracing::debug;

use farmstand_core::Cart;

use super::{read_json, write_json};
use crate::error::StoreResult;
use crate::kv::KeyValueStore;

pub const CART_KEY: &str = "cart.items";

#[derive(Clone)]
pub struct CartRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl CartRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        CartRepository { kv }
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub async fn load(&self) -> StoreResult<Option<Cart>> {
        read_json(self.kv.as_ref(), CART_KEY).await
    }

    pub async fn save(&self, cart: &Cart) -> StoreResult<()> {
        write_json(self.kv.as_ref(), CART_KEY, cart).await?;
        debug!(lines = cart.line_count(), "Cart snapshot saved");
        Ok(())
    }

    /// Deletes the mirror entirely (not an empty snapshot).
    pub async fn delete(&self) -> StoreResult<()> {
        self.kv.remove(CART_KEY).await
    }

    pub async fn exists(&self) -> StoreResult<bool> {
        Ok(self.kv.get(CART_KEY).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::kv::MemoryKvStore;
    use farmstand_core::{Money, NewCartItem};

    #[tokio::test]
    async fn test_save_load_delete() {
        let kv = Arc::new(MemoryKvStore::new());
        let repo = CartRepository::new(kv);

        assert!(repo.load().await.unwrap().is_none());

        let mut cart = Cart::new();
        cart.add(NewCartItem::new("p1", "Kale", Money::from_cents(350), 2, "bunch", "f1"))
            .unwrap();
        repo.save(&cart).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(cart));

        repo.delete().await.unwrap();
        assert!(!repo.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set(CART_KEY, "{not json").await.unwrap();

        let repo = CartRepository::new(kv);
        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
