//! # farmstand-client: Networking and Session State
//!
//! Everything between the Farmstand REST API and a shell (CLI, mobile, or
//! desktop).
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        farmstand-client                                 │
//! │                                                                         │
//! │   Shell (apps/cli)                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   AppContext ── flows (login, checkout, farmer ops, ...)               │
//! │        │                                                                │
//! │        ├──► SessionStore ──┐                                            │
//! │        ├──► CartStore ─────┼──► farmstand-store (SQLite key-value)      │
//! │        ├──► EventTracker ──┘                                            │
//! │        │         │                                                      │
//! │        └──► ApiClient ◄──┘                                              │
//! │                 │   bearer token, error normalization, refresh-once     │
//! │                 ▼                                                       │
//! │           HttpTransport (reqwest)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`api`]: endpoint wrappers over [`ApiClient`]
//! - [`state`]: cart and session stores
//! - [`tracker`]: analytics with a bounded retry queue
//! - [`context`]: [`AppContext`], which owns all of the above
//! - [`config`]: TOML + environment configuration
//! - [`transport`]: the HTTP seam
//! - [`error`]: [`ClientError`]

pub mod api;
pub mod config;
pub mod context;
pub mod error;
mod flows;
pub mod state;
pub mod tracker;
pub mod transport;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiRequest};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ClientError, ClientResult};
pub use state::{CartStore, SessionStore};
pub use tracker::{EventTracker, FlushOutcome};
pub use transport::{HttpTransport, ReqwestTransport};
