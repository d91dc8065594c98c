//! Command handlers. Each runs one `AppContext` flow and prints the result.

pub mod auth;
pub mod cart;
pub mod shop;
