//! Domain types for the store backend.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! DTOs in [`crate::backend::wire`].

use serde::{Deserialize, Serialize};

use wildroot_core::{OrderId, OrderStatus, Price, ProductId, Timestamp};

// =============================================================================
// Product Types
// =============================================================================

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend-assigned product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Plain text description.
    pub description: String,
    /// Image URL. Opaque; may be empty or unreachable.
    pub image_url: String,
    /// Free-text category label.
    pub category: String,
    /// Current unit price in minor units.
    pub price: Price,
    /// Units currently in stock.
    pub stock_quantity: u32,
}

impl Product {
    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

// =============================================================================
// Cart Types
// =============================================================================

/// A line item in the caller's cart.
///
/// Quantity is positive; product ids are unique within one cart. Prices are
/// not carried on the line - they are joined against the catalog at display
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Referenced product.
    pub product_id: ProductId,
    /// Requested quantity.
    pub quantity: u32,
}

// =============================================================================
// Order Types
// =============================================================================

/// A line item captured on an order.
///
/// The unit price is the price at order time, not a live reference to the
/// current product price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Referenced product.
    pub product_id: ProductId,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price captured at order time.
    pub unit_price: Price,
}

/// An order placed by the caller.
///
/// Orders are immutable once created; the client never mutates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Backend-assigned order ID.
    pub id: OrderId,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
    /// Total of captured line totals.
    pub total: Price,
    /// Backend-owned status; the client only displays it.
    pub status: OrderStatus,
    /// Placement time.
    pub placed_at: Timestamp,
}

// =============================================================================
// Profile Types
// =============================================================================

/// Profile of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
}
