//! Order history command.

use wildroot_storefront::error::Result;
use wildroot_storefront::state::StoreState;

pub async fn run(store: &StoreState) -> Result<()> {
    let orders = store.orders().list().await?;

    if orders.is_empty() {
        tracing::info!("No orders yet.");
        return Ok(());
    }

    let catalog = store.catalog().list_products().await?;
    for order in &orders {
        tracing::info!(
            "Order #{} - {} - {} ({})",
            order.id,
            order.total,
            order.status,
            order.placed_at.to_utc().format("%Y-%m-%d %H:%M")
        );
        for item in &order.items {
            // Deleted products are tolerated: the captured line still shows.
            let name = catalog
                .iter()
                .find(|product| product.id == item.product_id)
                .map_or("(no longer available)", |product| product.name.as_str());
            tracing::info!(
                "  {} x{} @ {}",
                name,
                item.quantity,
                item.unit_price
            );
        }
    }
    Ok(())
}
