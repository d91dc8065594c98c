//! # REST API
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── client.rs     - ApiClient: bearer injection, error normalization, refresh-once
//! ├── auth.rs       - Two-step login, registration
//! ├── profile.rs    - Current user, profile update, avatar upload
//! ├── products.rs   - Catalog browsing, categories
//! ├── farmer.rs     - Farmer product management
//! ├── cart.rs       - Server-side cart mirror
//! ├── orders.rs     - Checkout, order history, cancellation
//! ├── ai.rs         - Recommendations
//! ├── chat.rs       - Direct messages
//! └── analytics.rs  - Event ingestion
//! ```
//!
//! Endpoint functions take `&ApiClient` and return typed results. They do
//! not touch local state; the stores and `AppContext` flows do that.

pub mod ai;
pub mod analytics;
pub mod auth;
pub mod cart;
pub mod chat;
pub mod client;
pub mod farmer;
pub mod orders;
pub mod products;
pub mod profile;

pub use client::{ApiClient, ApiRequest, REFRESH_PATH};
