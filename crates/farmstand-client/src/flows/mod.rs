//! # Flows
//!
//! User-level operations composed from the endpoint modules and the stores.
//! Each submodule adds an `impl AppContext` block:
//!
//! | Module   | Operations                                                  |
//! |----------|-------------------------------------------------------------|
//! | `auth`   | login, two-factor, register, logout, profile, avatar        |
//! | `shop`   | browse, cart, checkout, orders, recommendations, chat       |
//! | `farmer` | product listing management (farmer role only)              |

mod auth;
mod farmer;
mod shop;

use farmstand_core::{EventType, TrackedEvent};

use crate::context::AppContext;

impl AppContext {
    /// An event stamped with the current user, if any.
    pub(crate) async fn event(&self, event_type: EventType) -> TrackedEvent {
        let event = TrackedEvent::new(event_type);
        match self.session.current_user().await {
            Some(user) => event.with_user(user.id),
            None => event,
        }
    }
}
