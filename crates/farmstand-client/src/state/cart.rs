//! # Cart Store
//!
//! The customer's cart, kept in memory and mirrored to local storage.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Operations                                 │
//! │                                                                         │
//! │  add / set_quantity / remove                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock cart ──► apply reducer ──► save snapshot ──► unlock               │
//! │                      │                 │                                │
//! │                      │                 └── failure: warn!, keep going   │
//! │                      └── CoreError (bad quantity, unknown id): return   │
//! │                                                                         │
//! │  clear ──► empty in memory ──► delete mirror                           │
//! │                                                                         │
//! │  NOTE: the snapshot is written while the lock is held, so mirror       │
//! │        writes land in mutation order.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use farmstand_core::{Cart, CartItem, CartTotals, CoreResult, Money, NewCartItem};
use farmstand_store::CartRepository;

pub struct CartStore {
    repo: CartRepository,
    cart: Mutex<Cart>,
}

impl CartStore {
    /// Empty store. Call [`CartStore::load`] to restore the mirror.
    pub fn new(repo: CartRepository) -> Self {
        CartStore {
            repo,
            cart: Mutex::new(Cart::new()),
        }
    }

    /// Restores the persisted cart. A missing or unreadable mirror leaves
    /// the cart empty.
    pub async fn load(&self) {
        let restored = match self.repo.load().await {
            Ok(Some(cart)) => cart,
            Ok(None) => {
                debug!("No persisted cart");
                Cart::new()
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart mirror");
                Cart::new()
            }
        };

        info!(lines = restored.line_count(), "Cart restored");
        *self.cart.lock().await = restored;
    }

    /// Adds a line or merges into the existing line for the same product.
    /// Returns the local line id.
    pub async fn add(&self, item: NewCartItem) -> CoreResult<String> {
        let mut cart = self.cart.lock().await;
        let id = cart.add(item)?;
        self.persist(&cart).await;
        Ok(id)
    }

    /// Zero or negative removes the line.
    pub async fn set_quantity(&self, id: &str, quantity: i64) -> CoreResult<()> {
        let mut cart = self.cart.lock().await;
        cart.set_quantity(id, quantity)?;
        self.persist(&cart).await;
        Ok(())
    }

    pub async fn remove(&self, id: &str) -> CoreResult<CartItem> {
        let mut cart = self.cart.lock().await;
        let removed = cart.remove(id)?;
        self.persist(&cart).await;
        Ok(removed)
    }

    pub async fn clear(&self) {
        let mut cart = self.cart.lock().await;
        cart.clear();
        if let Err(e) = self.repo.delete().await {
            warn!(error = %e, "Failed to delete cart mirror");
        }
        info!("Cart cleared");
    }

    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    pub async fn total(&self) -> Money {
        self.cart.lock().await.total()
    }

    pub async fn item_count(&self) -> u64 {
        self.cart.lock().await.item_count()
    }

    pub async fn totals(&self) -> CartTotals {
        self.cart.lock().await.totals()
    }

    async fn persist(&self, cart: &Cart) {
        if let Err(e) = self.repo.save(cart).await {
            warn!(error = %e, lines = cart.line_count(), "Failed to persist cart");
        }
    }
}
