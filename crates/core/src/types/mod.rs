//! Core types for Wildroot Market.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod role;
pub mod status;
pub mod time;

pub use id::*;
pub use money::{Price, format_price};
pub use role::Role;
pub use status::OrderStatus;
pub use time::Timestamp;
