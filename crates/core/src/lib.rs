//! Wildroot Core - Shared types library.
//!
//! This crate provides common types used across all Wildroot Market components:
//! - `storefront` - Client library for the remote store backend
//! - `cli` - Command-line storefront driver
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no caches.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, roles, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
