//! Cart and checkout commands.

use clap::Subcommand;

use wildroot_core::ProductId;
use wildroot_storefront::cart::QuantityUpdate;
use wildroot_storefront::error::Result;
use wildroot_storefront::state::StoreState;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart with line and grand totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i64,
        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line
    Set {
        /// Product id
        product_id: i64,
        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a cart line
    Remove {
        /// Product id
        product_id: i64,
    },
}

pub async fn run(store: &StoreState, action: CartAction) -> Result<()> {
    match action {
        CartAction::Show => show(store).await?,
        CartAction::Add {
            product_id,
            quantity,
        } => {
            store
                .cart()
                .add_item(ProductId::new(product_id), quantity)
                .await?;
            tracing::info!("Added product {product_id} x{quantity} to cart.");
            show(store).await?;
        }
        CartAction::Set {
            product_id,
            quantity,
        } => {
            let outcome = store
                .cart()
                .set_quantity(ProductId::new(product_id), quantity)
                .await?;
            match outcome {
                QuantityUpdate::Applied => {
                    tracing::info!("Quantity updated.");
                    show(store).await?;
                }
                QuantityUpdate::RejectedOutOfBounds => {
                    tracing::warn!(
                        "Quantity {quantity} is outside the available stock range; cart unchanged."
                    );
                }
            }
        }
        CartAction::Remove { product_id } => {
            store
                .cart()
                .remove_item(ProductId::new(product_id))
                .await?;
            tracing::info!("Removed product {product_id} from cart.");
            show(store).await?;
        }
    }
    Ok(())
}

async fn show(store: &StoreState) -> Result<()> {
    let totals = store.cart().totals().await?;

    if totals.lines.is_empty() {
        tracing::info!("Your cart is empty.");
        return Ok(());
    }

    let catalog = store.catalog().list_products().await?;
    for line in &totals.lines {
        let name = catalog
            .iter()
            .find(|product| product.id == line.product_id)
            .map_or("(unknown)", |product| product.name.as_str());
        tracing::info!(
            "#{} {} x{} @ {} = {}",
            line.product_id,
            name,
            line.quantity,
            line.unit_price,
            line.line_total
        );
    }
    tracing::info!("Total: {}", totals.grand_total);
    Ok(())
}

/// Place an order from the current cart.
pub async fn checkout(store: &StoreState) -> Result<()> {
    let order_id = store.checkout().place_order().await?;
    tracing::info!("Order placed successfully!");
    tracing::info!("Order confirmation: {order_id}");
    Ok(())
}
