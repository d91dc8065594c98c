//! # Order Endpoints

use serde::Serialize;

use farmstand_core::{Cart, CoreError, Order, PaymentMethod};

use super::client::{path_segment, ApiClient, ApiRequest};
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Delivery and payment details collected at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl PlaceOrderRequest {
    /// Builds the request from the local cart. Prices are not sent; the
    /// server prices the order itself.
    pub fn from_cart(cart: &Cart, details: &CheckoutDetails) -> ClientResult<Self> {
        if cart.is_empty() {
            return Err(ClientError::InvalidState("Your cart is empty".into()));
        }
        if details.delivery_address.trim().is_empty() {
            return Err(farmstand_core::ValidationError::Required {
                field: "delivery address".to_string(),
            }
            .into());
        }

        Ok(PlaceOrderRequest {
            items: cart
                .items
                .iter()
                .map(|line| OrderLineRequest {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            delivery_address: details.delivery_address.trim().to_string(),
            payment_method: details.payment_method,
            notes: details.notes.clone().filter(|n| !n.trim().is_empty()),
        })
    }
}

#[tracing::instrument(skip(client, request), fields(lines = request.items.len()))]
pub async fn place_order(client: &ApiClient, request: &PlaceOrderRequest) -> ClientResult<Order> {
    let order: Order = client.post("/orders", request).await?;
    tracing::info!(order_id = %order.id, total = %order.total_amount, "Order placed");
    Ok(order)
}

pub async fn list_orders(client: &ApiClient) -> ClientResult<Vec<Order>> {
    client.get("/orders").await
}

pub async fn get_order(client: &ApiClient, order_id: &str) -> ClientResult<Order> {
    client.get(&format!("/orders/{}", path_segment(order_id))).await
}

/// Cancels an order the caller has already fetched.
///
/// Refused locally unless the order is pending or confirmed.
#[tracing::instrument(skip(client, order), fields(order_id = %order.id, status = %order.status))]
pub async fn cancel_order(client: &ApiClient, order: &Order) -> ClientResult<Order> {
    if !order.status.is_cancellable() {
        return Err(CoreError::OrderNotCancellable {
            order_id: order.id.clone(),
            status: order.status.to_string(),
        }
        .into());
    }
    client
        .fetch(ApiRequest::post(format!("/orders/{}/cancel", path_segment(&order.id))))
        .await
}
