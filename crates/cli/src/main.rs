//! Wildroot CLI - Terminal storefront for Wildroot Market.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! wildroot products list
//! wildroot products list --query garden
//! wildroot products show 7
//!
//! # Manage the cart and check out
//! wildroot cart show
//! wildroot cart add 7 --quantity 2
//! wildroot cart set 7 --quantity 3
//! wildroot cart remove 7
//! wildroot checkout
//!
//! # Orders and profile
//! wildroot orders
//! wildroot profile show
//! wildroot profile setup --name "Rowan"
//!
//! # Catalog management (admin role required)
//! wildroot admin create --name "Cedar Planter" --price 1500 --category Garden --stock 5
//! ```
//!
//! # Environment Variables
//!
//! - `WILDROOT_BACKEND_URL` - Base URL of the store backend
//! - `WILDROOT_API_TOKEN` - Bearer token; its presence is the signed-in state

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use wildroot_storefront::auth::SessionIdentity;
use wildroot_storefront::backend::HttpBackend;
use wildroot_storefront::config::StorefrontConfig;
use wildroot_storefront::error::StoreError;
use wildroot_storefront::state::StoreState;

mod commands;

#[derive(Parser)]
#[command(name = "wildroot")]
#[command(author, version, about = "Wildroot Market terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: commands::products::ProductsAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Place an order from the current cart
    Checkout,
    /// Show order history
    Orders,
    /// Show or set up the caller profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Manage the catalog (admin role required)
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
}

/// Errors surfaced at the CLI boundary.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] wildroot_storefront::config::ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match &e {
            CliError::Store(store_err) => {
                tracing::warn!("{}", store_err.user_message());
                tracing::debug!(error = %store_err, "command failed");
            }
            CliError::Config(config_err) => {
                tracing::error!("Configuration error: {config_err}");
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;

    // The bearer token is the session identity in this deployment: present
    // means signed in.
    let identity = Arc::new(SessionIdentity::new());
    if config.backend.api_token.is_some() {
        identity.sign_in();
    }

    let store = StoreState::new(Arc::new(HttpBackend::new(&config.backend)), identity);

    match cli.command {
        Commands::Products { action } => commands::products::run(&store, action).await?,
        Commands::Cart { action } => commands::cart::run(&store, action).await?,
        Commands::Checkout => commands::cart::checkout(&store).await?,
        Commands::Orders => commands::orders::run(&store).await?,
        Commands::Profile { action } => commands::profile::run(&store, action).await?,
        Commands::Admin { action } => commands::admin::run(&store, action).await?,
    }
    Ok(())
}
