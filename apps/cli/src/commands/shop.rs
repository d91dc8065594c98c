use anyhow::anyhow;

use farmstand_client::api::orders::CheckoutDetails;
use farmstand_client::api::products::ProductQuery;
use farmstand_client::AppContext;
use farmstand_core::PaymentMethod;

pub async fn products(
    ctx: &AppContext,
    search: Option<String>,
    category: Option<String>,
    page: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let mut query = ProductQuery::default().page(page, limit);
    query.search = search;
    query.category_id = category;

    let result = ctx.browse(&query).await?;
    for product in &result.items {
        let stock = if product.in_stock() { "" } else { " (sold out)" };
        println!(
            "{:<38} {:<28} {:>10}/{}{}",
            product.id,
            product.name,
            product.price.to_string(),
            product.unit,
            stock
        );
    }
    println!("page {} of {} results", result.page, result.total);
    Ok(())
}

pub async fn categories(ctx: &AppContext) -> anyhow::Result<()> {
    for category in ctx.categories().await? {
        println!("{:<38} {}", category.id, category.name);
    }
    Ok(())
}

pub async fn checkout(
    ctx: &AppContext,
    address: String,
    payment: &str,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let payment_method = PaymentMethod::parse(payment)
        .ok_or_else(|| anyhow!("unknown payment method '{payment}'"))?;

    let order = ctx
        .checkout(&CheckoutDetails {
            delivery_address: address,
            payment_method,
            notes,
        })
        .await?;

    println!(
        "Order {} placed: {} ({})",
        order.order_number.as_deref().unwrap_or(&order.id),
        order.total_amount,
        order.status
    );
    Ok(())
}

pub async fn orders(ctx: &AppContext) -> anyhow::Result<()> {
    let orders = ctx.orders().await?;
    if orders.is_empty() {
        println!("No orders yet");
    }
    for order in &orders {
        println!(
            "{:<38} {:<11} {:>10}  {}",
            order.id,
            order.status.to_string(),
            order.total_amount.to_string(),
            order.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub async fn cancel(ctx: &AppContext, order_id: &str) -> anyhow::Result<()> {
    let order = ctx.cancel_order(order_id).await?;
    println!("Order {} is now {}", order.id, order.status);
    Ok(())
}

pub async fn recommend(ctx: &AppContext, top_k: Option<u32>) -> anyhow::Result<()> {
    let set = ctx.recommendations(top_k).await?;
    println!("method: {}", set.method);
    for item in &set.items {
        let reasons: Vec<String> = item.reasons.iter().map(|r| format!("{r:?}").to_lowercase()).collect();
        println!("{:<38} {:>5.2}  {}", item.product_id, item.score, reasons.join("+"));
    }
    Ok(())
}

pub async fn flush_events(ctx: &AppContext) {
    let outcome = ctx.flush_events().await;
    println!(
        "sent {}, failed {}, still queued {}",
        outcome.sent, outcome.failed, outcome.remaining
    );
}
