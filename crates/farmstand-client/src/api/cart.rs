//! # Server Cart Endpoints
//!
//! The server keeps its own copy of a signed-in customer's cart. The local
//! `CartStore` stays authoritative on the device; these calls push and pull
//! the server copy explicitly.

use serde::{Deserialize, Serialize};

use farmstand_core::validation::validate_quantity;
use farmstand_core::{money, Cart, Money};

use super::client::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCartItem {
    pub product_id: String,
    pub quantity: u32,
    #[serde(default, with = "money::as_major_opt")]
    pub price: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCart {
    #[serde(default)]
    pub items: Vec<ServerCartItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemRequest<'a> {
    product_id: &'a str,
    quantity: u32,
}

pub async fn get_server_cart(client: &ApiClient) -> ClientResult<ServerCart> {
    client.get("/cart").await
}

#[tracing::instrument(skip(client))]
pub async fn add_server_cart_item(
    client: &ApiClient,
    product_id: &str,
    quantity: u32,
) -> ClientResult<ServerCart> {
    validate_quantity(quantity as i64)?;
    client
        .post("/cart/items", &AddItemRequest { product_id, quantity })
        .await
}

pub async fn clear_server_cart(client: &ApiClient) -> ClientResult<()> {
    client.delete("/cart").await
}

/// Replaces the server cart with the local one: clear, then add each line.
///
/// Not atomic; a failure part-way leaves the server cart partially filled.
pub async fn push_local_cart(client: &ApiClient, cart: &Cart) -> ClientResult<()> {
    clear_server_cart(client).await?;
    for line in &cart.items {
        add_server_cart_item(client, &line.product_id, line.quantity).await?;
    }
    tracing::info!(lines = cart.line_count(), "Local cart pushed to server");
    Ok(())
}
