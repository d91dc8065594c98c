//! # State Module
//!
//! Long-lived client state, one type per concern, each owned by
//! [`AppContext`](crate::context::AppContext).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │    CartStore     │  │   SessionStore   │  │    EventTracker      │  │
//! │  │                  │  │                  │  │   (crate::tracker)   │  │
//! │  │  Mutex<Cart>     │  │  RwLock<         │  │  Mutex<EventQueue>   │  │
//! │  │  + cart mirror   │  │   SessionState>  │  │  + queued mirror     │  │
//! │  │  (general ns)    │  │  + tokens/user   │  │  (general ns)        │  │
//! │  │                  │  │  (secure ns)     │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  PERSISTENCE:                                                          │
//! │  • Memory is authoritative for the running session                     │
//! │  • Every mutation is mirrored to the key-value store                   │
//! │  • Mirror write failures are logged, not returned                      │
//! │    (token writes at login are the one exception)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod session;

pub use cart::CartStore;
pub use session::{SessionState, SessionStore};
