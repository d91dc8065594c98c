use tracing::info;

use farmstand_core::{
    CartItem, Category, ChatMessage, EventType, NewCartItem, Order, Page, Product,
    RecommendationSet,
};

use crate::api::orders::{self, CheckoutDetails, PlaceOrderRequest};
use crate::api::products::{self, ProductQuery};
use crate::api::{ai, cart as server_cart, chat};
use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::tracker::FlushOutcome;

impl AppContext {
    // =========================================================================
    // Catalog
    // =========================================================================

    /// Lists products. A non-empty search term is tracked as a search event.
    pub async fn browse(&self, query: &ProductQuery) -> ClientResult<Page<Product>> {
        let page = products::list_products(&self.api, query).await?;

        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let event = self
                .event(EventType::Search)
                .await
                .with_meta("query", term)
                .with_meta("results", page.total);
            self.tracker.track(event).await;
        }
        Ok(page)
    }

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        products::list_categories(&self.api).await
    }

    pub async fn view_product(&self, product_id: &str) -> ClientResult<Product> {
        let product = products::get_product(&self.api, product_id).await?;
        let event = self.event(EventType::ProductView).await.with_product(&product.id);
        self.tracker.track(event).await;
        Ok(product)
    }

    /// Opens a product reached from a recommendation.
    pub async fn open_recommendation(&self, product_id: &str) -> ClientResult<Product> {
        let event = self
            .event(EventType::RecommendationClick)
            .await
            .with_product(product_id);
        self.tracker.track(event).await;
        self.view_product(product_id).await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds `quantity` of a product to the local cart. Returns the line id.
    pub async fn add_to_cart(&self, product: &Product, quantity: u32) -> ClientResult<String> {
        if !product.is_available || !product.in_stock() {
            return Err(ClientError::InvalidState(format!(
                "{} is not available right now",
                product.name
            )));
        }

        let id = self
            .cart
            .add(NewCartItem::from_product(product, quantity))
            .await?;

        let event = self
            .event(EventType::AddToCart)
            .await
            .with_product(&product.id)
            .with_value((product.price * quantity).to_major())
            .with_meta("quantity", quantity);
        self.tracker.track(event).await;
        Ok(id)
    }

    /// Fetches the product first, so the cart line carries current details.
    pub async fn add_product_id_to_cart(&self, product_id: &str, quantity: u32) -> ClientResult<String> {
        let product = products::get_product(&self.api, product_id).await?;
        self.add_to_cart(&product, quantity).await
    }

    pub async fn set_cart_quantity(&self, line_id: &str, quantity: i64) -> ClientResult<()> {
        self.cart.set_quantity(line_id, quantity).await?;
        Ok(())
    }

    pub async fn remove_from_cart(&self, line_id: &str) -> ClientResult<CartItem> {
        let removed = self.cart.remove(line_id).await?;
        let event = self
            .event(EventType::RemoveFromCart)
            .await
            .with_product(&removed.product_id)
            .with_meta("quantity", removed.quantity);
        self.tracker.track(event).await;
        Ok(removed)
    }

    /// Replaces the server-side cart with the local one.
    pub async fn sync_cart_to_server(&self) -> ClientResult<()> {
        self.session.require_user().await?;
        let cart = self.cart.snapshot().await;
        server_cart::push_local_cart(&self.api, &cart).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Places an order for everything in the local cart.
    ///
    /// On success the local cart is cleared and a purchase is tracked. On
    /// failure the cart is left as it was.
    pub async fn checkout(&self, details: &CheckoutDetails) -> ClientResult<Order> {
        self.session.require_user().await?;

        let cart = self.cart.snapshot().await;
        let request = PlaceOrderRequest::from_cart(&cart, details)?;
        let order = orders::place_order(&self.api, &request).await?;

        self.cart.clear().await;
        info!(order_id = %order.id, lines = request.items.len(), "Checkout complete");

        let event = self
            .event(EventType::Purchase)
            .await
            .with_value(order.total_amount.to_major())
            .with_meta("orderId", order.id.clone())
            .with_meta("items", cart.item_count());
        self.tracker.track(event).await;
        Ok(order)
    }

    pub async fn orders(&self) -> ClientResult<Vec<Order>> {
        orders::list_orders(&self.api).await
    }

    pub async fn order(&self, order_id: &str) -> ClientResult<Order> {
        orders::get_order(&self.api, order_id).await
    }

    /// Fetches the order's current status, then cancels if still allowed.
    pub async fn cancel_order(&self, order_id: &str) -> ClientResult<Order> {
        let order = orders::get_order(&self.api, order_id).await?;
        orders::cancel_order(&self.api, &order).await
    }

    // =========================================================================
    // Recommendations & Chat
    // =========================================================================

    pub async fn recommendations(&self, top_k: Option<u32>) -> ClientResult<RecommendationSet> {
        self.session.require_user().await?;
        ai::recommendations(&self.api, top_k.unwrap_or(ai::DEFAULT_TOP_K)).await
    }

    pub async fn conversation(&self, other_user_id: &str) -> ClientResult<Vec<ChatMessage>> {
        chat::conversation(&self.api, other_user_id).await
    }

    pub async fn send_message(&self, other_user_id: &str, content: &str) -> ClientResult<ChatMessage> {
        chat::send_message(&self.api, other_user_id, content).await
    }

    /// Retries queued analytics events.
    pub async fn flush_events(&self) -> FlushOutcome {
        self.tracker.flush().await
    }
}
