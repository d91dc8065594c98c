//! Farmer product management. Every operation requires the farmer role,
//! checked locally before any request goes out.

use farmstand_core::{Product, UserRole};

use crate::api::farmer::{self, NewProduct, ProductUpdate};
use crate::context::AppContext;
use crate::error::ClientResult;

impl AppContext {
    pub async fn my_products(&self) -> ClientResult<Vec<Product>> {
        self.session.require_role(UserRole::Farmer).await?;
        farmer::my_products(&self.api).await
    }

    pub async fn create_product(&self, product: &NewProduct) -> ClientResult<Product> {
        self.session.require_role(UserRole::Farmer).await?;
        farmer::create_product(&self.api, product).await
    }

    pub async fn update_product(&self, product_id: &str, update: &ProductUpdate) -> ClientResult<Product> {
        self.session.require_role(UserRole::Farmer).await?;
        farmer::update_product(&self.api, product_id, update).await
    }

    pub async fn delete_product(&self, product_id: &str) -> ClientResult<()> {
        self.session.require_role(UserRole::Farmer).await?;
        farmer::delete_product(&self.api, product_id).await
    }

    pub async fn set_product_availability(&self, product_id: &str, available: bool) -> ClientResult<Product> {
        self.session.require_role(UserRole::Farmer).await?;
        farmer::set_availability(&self.api, product_id, available).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{product_json, test_context, user_json};
    use farmstand_core::{CoreError, Money};

    fn new_product() -> NewProduct {
        NewProduct {
            name: "Sukuma wiki".into(),
            description: None,
            price: Money::from_cents(4500),
            unit: "bunch".into(),
            stock: 30,
            category_id: None,
            images: vec![],
        }
    }

    #[tokio::test]
    async fn test_customer_cannot_manage_products() {
        let (ctx, transport, _) = test_context(false);
        ctx.session
            .set_user(serde_json::from_value(user_json("u1", "customer")).unwrap())
            .await;

        let err = ctx.create_product(&new_product()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Domain(CoreError::RoleNotPermitted { .. })
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_farmer_creates_and_hides_product() {
        let (ctx, transport, _) = test_context(false);
        ctx.session
            .set_user(serde_json::from_value(user_json("f1", "farmer")).unwrap())
            .await;

        let mut hidden = product_json("p9", 45.0, "f1");
        hidden["isAvailable"] = false.into();
        transport
            .respond(201, product_json("p9", 45.0, "f1"))
            .respond(200, hidden);

        let created = ctx.create_product(&new_product()).await.unwrap();
        assert_eq!(created.price, Money::from_cents(4500));

        let updated = ctx.set_product_availability("p9", false).await.unwrap();
        assert!(!updated.is_available);

        let requests = transport.requests();
        assert_eq!(requests[0].json()["price"], 45.0);
        assert_eq!(requests[1].path, "/products/p9");
        assert_eq!(requests[1].json(), serde_json::json!({"isAvailable": false}));
    }
}
