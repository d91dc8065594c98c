use farmstand_client::AppContext;

pub async fn add(ctx: &AppContext, product_id: &str, qty: u32) -> anyhow::Result<()> {
    let line_id = ctx.add_product_id_to_cart(product_id, qty).await?;
    println!("Added to cart (line {line_id})");
    list(ctx).await;
    Ok(())
}

pub async fn remove(ctx: &AppContext, line_id: &str) -> anyhow::Result<()> {
    let removed = ctx.remove_from_cart(line_id).await?;
    println!("Removed {}", removed.name);
    Ok(())
}

pub async fn set(ctx: &AppContext, line_id: &str, qty: i64) -> anyhow::Result<()> {
    ctx.set_cart_quantity(line_id, qty).await?;
    list(ctx).await;
    Ok(())
}

pub async fn list(ctx: &AppContext) {
    let cart = ctx.cart.snapshot().await;
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in &cart.items {
        println!(
            "{:<38} {:<24} {:>4} {:<6} {:>10}",
            line.id,
            line.name,
            line.quantity,
            line.unit,
            line.line_total().to_string()
        );
    }
    let totals = cart.totals();
    println!("{} items, total {}", totals.item_count, totals.total);
}

pub async fn clear(ctx: &AppContext) {
    ctx.cart.clear().await;
    println!("Cart cleared");
}
