//! Wildroot Market storefront client library.
//!
//! This crate talks to the remote store backend, which owns all durable
//! state (products, carts, orders, profiles, roles). The client keeps
//! invalidate-on-write caches of backend data and drives the cart-to-order
//! transition: quantity bounds, monetary totals, and the irreversible order
//! placement protocol.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no optimistic updates, caches only
//!   change after a confirmed response
//! - Remote access goes through the [`backend::BackendApi`] seam so tests can
//!   inject an in-memory backend
//! - Caches are explicit services with `get`/`invalidate`/`subscribe`, passed
//!   to every component that needs them
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wildroot_storefront::auth::SessionIdentity;
//! use wildroot_storefront::backend::HttpBackend;
//! use wildroot_storefront::config::StorefrontConfig;
//! use wildroot_storefront::state::StoreState;
//!
//! let config = StorefrontConfig::from_env()?;
//! let identity = Arc::new(SessionIdentity::default());
//! let store = StoreState::new(
//!     Arc::new(HttpBackend::new(&config.backend)),
//!     identity.clone(),
//! );
//!
//! identity.sign_in();
//! store.cart().add_item(product.id, 2).await?;
//! let order_id = store.checkout().place_order().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod auth;
pub mod backend;
pub mod cache;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod profile;
pub mod state;
pub mod stock;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;
