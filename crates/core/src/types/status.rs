//! Order status as reported by the backend.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Status values are free text on the wire and transitioned only by the
/// backend; the client never mutates them. Unrecognized values fall back to
/// [`OrderStatus::Pending`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Processing,
    Completed,
    Cancelled,
    #[default]
    #[serde(other)]
    Pending,
}

impl OrderStatus {
    /// Parse a backend status string, falling back to `Pending` for
    /// unrecognized values.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
