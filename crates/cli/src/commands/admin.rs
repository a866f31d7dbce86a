//! Catalog management commands (admin role required).

use clap::Subcommand;

use wildroot_core::{Price, ProductId};
use wildroot_storefront::backend::ProductInput;
use wildroot_storefront::error::Result;
use wildroot_storefront::state::StoreState;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Create a product
    Create {
        /// Product name
        #[arg(short, long)]
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Price in minor units (e.g., 1500 for $15.00)
        #[arg(short, long)]
        price: u64,
        /// Image URL
        #[arg(short, long, default_value = "")]
        image_url: String,
        /// Category label
        #[arg(short, long)]
        category: String,
        /// Units in stock
        #[arg(short, long)]
        stock: u32,
    },
    /// Update a product
    Update {
        /// Product id
        id: i64,
        /// Product name
        #[arg(short, long)]
        name: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Price in minor units
        #[arg(short, long)]
        price: u64,
        /// Image URL
        #[arg(short, long, default_value = "")]
        image_url: String,
        /// Category label
        #[arg(short, long)]
        category: String,
        /// Units in stock
        #[arg(short, long)]
        stock: u32,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: i64,
    },
}

pub async fn run(store: &StoreState, action: AdminAction) -> Result<()> {
    match action {
        AdminAction::Create {
            name,
            description,
            price,
            image_url,
            category,
            stock,
        } => {
            let id = store
                .admin()
                .create_product(ProductInput {
                    name,
                    description,
                    price: Price::from_minor_units(price),
                    image_url,
                    category,
                    stock_quantity: stock,
                })
                .await?;
            tracing::info!("Product created with id {id}.");
        }
        AdminAction::Update {
            id,
            name,
            description,
            price,
            image_url,
            category,
            stock,
        } => {
            store
                .admin()
                .update_product(
                    ProductId::new(id),
                    ProductInput {
                        name,
                        description,
                        price: Price::from_minor_units(price),
                        image_url,
                        category,
                        stock_quantity: stock,
                    },
                )
                .await?;
            tracing::info!("Product {id} updated.");
        }
        AdminAction::Delete { id } => {
            store.admin().delete_product(ProductId::new(id)).await?;
            tracing::info!("Product {id} deleted.");
        }
    }
    Ok(())
}
