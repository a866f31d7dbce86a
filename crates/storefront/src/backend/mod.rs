//! Remote store backend seam.
//!
//! The backend owns all durable state: products, carts, orders, profiles,
//! roles. It performs the authoritative stock checks and assigns every
//! identifier. The client treats it as a remote, possibly-failing,
//! non-transactional data source.
//!
//! [`BackendApi`] is the seam: production uses [`HttpBackend`], tests inject
//! an in-memory implementation.

mod http;
pub mod wire;

pub use http::HttpBackend;

use async_trait::async_trait;
use thiserror::Error;

use wildroot_core::{OrderId, Price, ProductId, Role};

use crate::types::{CartLine, Order, Product, UserProfile};

/// Errors that can occur when talking to the store backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failed (connection, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Referenced entity does not exist on the backend.
    #[error("not found: {0}")]
    NotFound(String),

    /// The call requires an identity and none was accepted.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The identity lacks permission for this operation.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend rejected the request (e.g., server-side stock check).
    #[error("rejected: {0}")]
    Rejected(String),

    /// The backend returned an unexpected status code.
    #[error("backend returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The client runtime shut down before the call completed. Only
    /// observable during process teardown.
    #[error("client runtime shut down")]
    Shutdown,
}

/// Operations exposed by the store backend.
///
/// Names are the contract. Mutations return only after the backend has
/// applied them; the caller refetches to observe the effect rather than
/// merging optimistically.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// List all products.
    async fn list_products(&self) -> Result<Vec<Product>, BackendError>;

    /// Fetch one product, or `None` if it no longer exists.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BackendError>;

    /// Create a product (admin only). Returns the assigned id.
    async fn create_product(&self, input: ProductInput) -> Result<ProductId, BackendError>;

    /// Replace a product's fields (admin only).
    async fn update_product(&self, id: ProductId, input: ProductInput)
    -> Result<(), BackendError>;

    /// Delete a product (admin only).
    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError>;

    /// Fetch the caller's cart lines.
    async fn get_cart(&self) -> Result<Vec<CartLine>, BackendError>;

    /// Add quantity of a product to the caller's cart. The backend decides
    /// whether a line is created or an existing line's quantity increased.
    async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<(), BackendError>;

    /// Set the quantity of an existing cart line.
    async fn update_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), BackendError>;

    /// Remove a cart line.
    async fn remove_cart_item(&self, product_id: ProductId) -> Result<(), BackendError>;

    /// Consume the caller's entire cart into a new order. Returns the
    /// assigned order id.
    async fn place_order(&self) -> Result<OrderId, BackendError>;

    /// Fetch the caller's order history.
    async fn get_orders(&self) -> Result<Vec<Order>, BackendError>;

    /// Fetch the caller's profile, or `None` if setup is still outstanding.
    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, BackendError>;

    /// Create or replace the caller's profile.
    async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), BackendError>;

    /// Fetch the caller's role as the backend sees it.
    async fn get_caller_user_role(&self) -> Result<Role, BackendError>;

    /// Whether the backend considers the caller an admin.
    async fn is_caller_admin(&self) -> Result<bool, BackendError>;
}

/// Fields for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    /// Product name.
    pub name: String,
    /// Plain text description.
    pub description: String,
    /// Unit price in minor units.
    pub price: Price,
    /// Image URL (may be empty).
    pub image_url: String,
    /// Free-text category label.
    pub category: String,
    /// Units in stock.
    pub stock_quantity: u32,
}
