//! # Farmer Product Management
//!
//! Role checks happen in the `AppContext` flows; these functions only talk
//! to the API. The server enforces ownership regardless.

use serde::Serialize;

use farmstand_core::validation::{validate_price, validate_product_name, validate_stock};
use farmstand_core::{money, Money, Product};

use super::client::{path_segment, ApiClient, ApiRequest};
use crate::error::ClientResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "money::as_major")]
    pub price: Money,
    pub unit: String,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl NewProduct {
    pub fn validate(&self) -> ClientResult<()> {
        validate_product_name(&self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        Ok(())
    }
}

/// Partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        with = "money::as_major_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl ProductUpdate {
    pub fn validate(&self) -> ClientResult<()> {
        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

pub async fn my_products(client: &ApiClient) -> ClientResult<Vec<Product>> {
    client.get("/products/my-products").await
}

#[tracing::instrument(skip(client, product), fields(name = %product.name))]
pub async fn create_product(client: &ApiClient, product: &NewProduct) -> ClientResult<Product> {
    product.validate()?;
    let created: Product = client.post("/products", product).await?;
    tracing::info!(product_id = %created.id, "Product created");
    Ok(created)
}

#[tracing::instrument(skip(client, update))]
pub async fn update_product(
    client: &ApiClient,
    product_id: &str,
    update: &ProductUpdate,
) -> ClientResult<Product> {
    update.validate()?;
    client.patch(&format!("/products/{}", path_segment(product_id)), update).await
}

#[tracing::instrument(skip(client))]
pub async fn delete_product(client: &ApiClient, product_id: &str) -> ClientResult<()> {
    client
        .execute(ApiRequest::delete(format!("/products/{}", path_segment(product_id))))
        .await
}

/// Shows or hides a listing without touching its other fields.
pub async fn set_availability(
    client: &ApiClient,
    product_id: &str,
    available: bool,
) -> ClientResult<Product> {
    let update = ProductUpdate {
        is_available: Some(available),
        ..Default::default()
    };
    update_product(client, product_id, &update).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{api_client, product_json};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_product_sends_decimal_price() {
        let (client, transport, _) = api_client();
        transport.respond(201, product_json("p9", 3.5, "f1"));

        let product = NewProduct {
            name: "Sukuma wiki".into(),
            description: None,
            price: Money::from_cents(350),
            unit: "bunch".into(),
            stock: 40,
            category_id: None,
            images: vec![],
        };
        let created = create_product(&client, &product).await.unwrap();
        assert_eq!(created.id, "p9");

        let body = transport.requests()[0].json();
        assert_eq!(body["price"], json!(3.5));
        assert!(body.get("images").is_none());
    }

    #[tokio::test]
    async fn test_invalid_product_rejected_locally() {
        let (client, transport, _) = api_client();
        let product = NewProduct {
            name: "Eggs".into(),
            description: None,
            price: Money::zero(),
            unit: "tray".into(),
            stock: 5,
            category_id: None,
            images: vec![],
        };
        let err = create_product(&client, &product).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_set_availability_patch_body() {
        let (client, transport, _) = api_client();
        transport.respond(200, product_json("p1", 1.0, "f1"));

        set_availability(&client, "p1", false).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/products/p1");
        assert_eq!(sent.json(), json!({"isAvailable": false}));
    }
}
