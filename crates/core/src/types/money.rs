//! Type-safe price representation in minor currency units.
//!
//! All monetary values on the wire are non-negative integers in minor units
//! (cents). Arithmetic stays in integers; `rust_decimal` is used only at the
//! display boundary so no floating point ever touches money.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative amount of money in minor currency units (cents for USD).
///
/// Negative or fractional amounts are unrepresentable by construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn from_minor_units(minor_units: u64) -> Self {
        Self(minor_units)
    }

    /// Get the amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    ///
    /// Line totals are display values; the backend recomputes authoritative
    /// totals at order time.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Add another price, saturating at `u64::MAX`.
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// The amount as a two-decimal-place decimal (e.g. `29.99`).
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), 2)
    }

    /// Format for display with a fixed "$" prefix, e.g. `"$29.99"`.
    ///
    /// Always renders exactly two digits after the decimal point.
    #[must_use]
    pub fn display(&self) -> String {
        format!("${}", self.as_decimal())
    }
}

impl From<u64> for Price {
    fn from(minor_units: u64) -> Self {
        Self(minor_units)
    }
}

impl From<Price> for u64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Format an amount in minor units as a display string, e.g. `2999` → `"$29.99"`.
#[must_use]
pub fn format_price(minor_units: u64) -> String {
    Price::from_minor_units(minor_units).display()
}
