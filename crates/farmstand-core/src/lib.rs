//! # farmstand-core: Pure Domain Logic for Farmstand
//!
//! Everything the marketplace client knows about its domain, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Farmstand Client Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (or a mobile shell)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        farmstand-client (REST, session, cart store, tracker)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ farmstand-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  events   │  │   │
//! │  │   │ User      │  │   Money   │  │   Cart    │  │ EventQueue│  │   │
//! │  │   │ Product   │  │           │  │ CartItem  │  │ QueuedEvt │  │   │
//! │  │   │ Order     │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire-level domain types (User, Product, Order, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Local cart line items and their reducers
//! - [`events`] - Analytics events and the bounded retry queue
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks run before any network call
//!
//! ## Example Usage
//!
//! ```rust
//! use farmstand_core::cart::{Cart, NewCartItem};
//! use farmstand_core::money::Money;
//!
//! let mut cart = Cart::new();
//! cart.add(NewCartItem::new("p1", "Tomatoes", Money::from_cents(1000), 2, "kg", "f1")).unwrap();
//! cart.add(NewCartItem::new("p2", "Eggs", Money::from_cents(500), 1, "tray", "f1")).unwrap();
//!
//! assert_eq!(cart.total(), Money::from_cents(2500));
//! assert_eq!(cart.item_count(), 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod events;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals, NewCartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use events::{EventQueue, EventType, QueuedEvent, TrackedEvent};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default capacity of the failed-analytics retry queue.
///
/// Pushing past this evicts the single oldest entry.
pub const MAX_QUEUED_EVENTS: usize = 50;

/// Maximum number of distinct line items in the local cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// Guards against typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: u32 = 999;
