//! # Catalog Endpoints

use farmstand_core::{Category, Page, Product};

use super::client::{path_segment, ApiClient, ApiRequest};
use crate::error::ClientResult;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Catalog filters. Unset fields are omitted from the query string.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub farmer_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn search(term: impl Into<String>) -> Self {
        ProductQuery {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn by_farmer(mut self, farmer_id: impl Into<String>) -> Self {
        self.farmer_id = Some(farmer_id.into());
        self
    }

    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page.max(1));
        self.limit = Some(limit.clamp(1, 100));
        self
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        request
            .query_opt("search", search)
            .query_opt("categoryId", self.category_id.as_deref())
            .query_opt("farmerId", self.farmer_id.as_deref())
            .query_opt("page", self.page)
            .query_opt("limit", self.limit)
    }
}

#[tracing::instrument(skip(client))]
pub async fn list_products(client: &ApiClient, query: &ProductQuery) -> ClientResult<Page<Product>> {
    let page: Page<Product> = client.fetch(query.apply(ApiRequest::get("/products"))).await?;
    tracing::debug!(count = page.items.len(), total = page.total, "Products fetched");
    Ok(page)
}

pub async fn get_product(client: &ApiClient, product_id: &str) -> ClientResult<Product> {
    client.get(&format!("/products/{}", path_segment(product_id))).await
}

pub async fn list_categories(client: &ApiClient) -> ClientResult<Vec<Category>> {
    client.get("/categories").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api_client, product_json};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_products_query_string() {
        let (client, transport, _) = api_client();
        transport.respond(
            200,
            json!({"items": [product_json("p1", 2.5, "f1")], "total": 1, "page": 2, "limit": 10}),
        );

        let query = ProductQuery::search("  kale ").in_category("greens").page(2, 10);
        let page = list_products(&client, &query).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].price.cents(), 250);

        let sent = &transport.requests()[0];
        assert_eq!(
            sent.query,
            vec![
                ("search".to_string(), "kale".to_string()),
                ("categoryId".to_string(), "greens".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_out_of_range_price_is_decode_error() {
        let (client, transport, _) = api_client();
        transport.respond(200, product_json("p1", 1.0e17, "f1"));

        let err = get_product(&client, "p1").await.unwrap_err();
        assert!(matches!(err, crate::error::ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_blank_search_omitted() {
        let (client, transport, _) = api_client();
        transport.respond(200, json!({"items": []}));

        list_products(&client, &ProductQuery::search("   ")).await.unwrap();
        assert!(transport.requests()[0].query.is_empty());
    }
}
