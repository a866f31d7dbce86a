//! Catalog browsing commands.

use clap::Subcommand;

use wildroot_core::ProductId;
use wildroot_storefront::catalog::filter_products;
use wildroot_storefront::error::Result;
use wildroot_storefront::state::StoreState;

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List products, optionally filtered by name or category substring
    List {
        /// Case-insensitive substring filter
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show one product
    Show {
        /// Product id
        id: i64,
    },
}

pub async fn run(store: &StoreState, action: ProductsAction) -> Result<()> {
    match action {
        ProductsAction::List { query } => {
            let products = store.catalog().list_products().await?;
            let filtered = filter_products(&products, query.as_deref().unwrap_or(""));

            if filtered.is_empty() {
                tracing::info!("No products found.");
                return Ok(());
            }

            for product in filtered {
                tracing::info!(
                    "#{} {} - {} [{}] ({} in stock)",
                    product.id,
                    product.name,
                    product.price,
                    product.category,
                    product.stock_quantity
                );
            }
        }
        ProductsAction::Show { id } => {
            let product = store.catalog().get_product(ProductId::new(id)).await?;
            tracing::info!("#{} {}", product.id, product.name);
            tracing::info!("  Price: {}", product.price);
            tracing::info!("  Category: {}", product.category);
            tracing::info!("  In stock: {}", product.stock_quantity);
            if !product.description.is_empty() {
                tracing::info!("  {}", product.description);
            }
            if !product.image_url.is_empty() {
                tracing::info!("  Image: {}", product.image_url);
            }
        }
    }
    Ok(())
}
