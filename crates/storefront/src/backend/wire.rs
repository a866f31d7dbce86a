//! Wire DTOs for the store backend JSON protocol.
//!
//! The backend speaks camelCase JSON. Conversions keep the raw wire shapes
//! out of the domain types: statuses arrive as free text and are folded into
//! [`OrderStatus`] with the pending fallback here.

use serde::{Deserialize, Serialize};

use wildroot_core::{OrderId, OrderStatus, Price, ProductId, Role, Timestamp};

use crate::types::{CartLine, Order, OrderItem, Product, UserProfile};

use super::ProductInput;

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub category: String,
    pub price: u64,
    pub stock_quantity: u32,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Self {
            id: ProductId::new(wire.id),
            name: wire.name,
            description: wire.description,
            image_url: wire.image_url,
            category: wire.category,
            price: Price::from_minor_units(wire.price),
            stock_quantity: wire.stock_quantity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParams {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub image_url: String,
    pub category: String,
    pub stock_quantity: u32,
}

impl From<ProductInput> for ProductParams {
    fn from(input: ProductInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            price: input.price.minor_units(),
            image_url: input.image_url,
            category: input.category,
            stock_quantity: input.stock_quantity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductParams {
    pub product_id: i64,
    #[serde(flatten)]
    pub fields: ProductParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdParams {
    pub product_id: i64,
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartLine {
    pub product_id: i64,
    pub quantity: u32,
}

impl From<WireCartLine> for CartLine {
    fn from(wire: WireCartLine) -> Self {
        Self {
            product_id: ProductId::new(wire.product_id),
            quantity: wire.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemParams {
    pub product_id: i64,
    pub quantity: u32,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrderItem {
    pub product_id: i64,
    pub quantity: u32,
    pub price: u64,
}

impl From<WireOrderItem> for OrderItem {
    fn from(wire: WireOrderItem) -> Self {
        Self {
            product_id: ProductId::new(wire.product_id),
            quantity: wire.quantity,
            unit_price: Price::from_minor_units(wire.price),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    pub order_id: i64,
    pub items: Vec<WireOrderItem>,
    pub total: u64,
    /// Free text; folded into [`OrderStatus`] with the pending fallback.
    pub status: String,
    pub timestamp: i64,
}

impl From<WireOrder> for Order {
    fn from(wire: WireOrder) -> Self {
        Self {
            id: OrderId::new(wire.order_id),
            items: wire.items.into_iter().map(OrderItem::from).collect(),
            total: Price::from_minor_units(wire.total),
            status: OrderStatus::parse(&wire.status),
            placed_at: Timestamp::from_nanos(wire.timestamp),
        }
    }
}

// =============================================================================
// Profile & Role
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct WireProfile {
    pub name: String,
}

impl From<WireProfile> for UserProfile {
    fn from(wire: WireProfile) -> Self {
        Self { name: wire.name }
    }
}

impl From<UserProfile> for WireProfile {
    fn from(profile: UserProfile) -> Self {
        Self { name: profile.name }
    }
}

/// Parse a wire role string. The client never assumes a role the backend
/// hasn't confirmed, so unrecognized values degrade to guest.
#[must_use]
pub fn parse_role(s: &str) -> Role {
    s.parse().unwrap_or(Role::Guest)
}

/// Empty parameter object for operations that take no arguments.
#[derive(Debug, Serialize)]
pub struct EmptyParams {}
