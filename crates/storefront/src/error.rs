//! Unified error handling for storefront operations.
//!
//! All remote-call failures are caught at the operation boundary and
//! converted into one of the [`StoreError`] kinds; none are allowed to crash
//! the caller. Every kind maps to a transient, dismissable notification via
//! [`StoreError::user_message`].

use thiserror::Error;

use crate::backend::BackendError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Operation requires an identity and none is present.
    #[error("sign in required")]
    Unauthenticated,

    /// A non-admin invoked an admin operation.
    #[error("access denied")]
    Unauthorized,

    /// Referenced product or order no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network or backend failure. No local state was mutated, so the
    /// operation is safely retryable by re-invocation.
    #[error("store backend unavailable: {0}")]
    RemoteUnavailable(#[source] BackendError),

    /// Locally-caught invalid input; blocked before any remote call.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl StoreError {
    /// Notification text for the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Please sign in to continue.".to_string(),
            Self::Unauthorized => "You don't have access to this action.".to_string(),
            Self::NotFound(what) => format!("{what} is no longer available."),
            Self::RemoteUnavailable(_) => {
                "The store is temporarily unavailable. Please try again.".to_string()
            }
            Self::Validation(msg) => msg.clone(),
        }
    }

    /// Whether re-invoking the failed operation is safe and worthwhile.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_))
    }
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthenticated => Self::Unauthenticated,
            BackendError::Unauthorized => Self::Unauthorized,
            BackendError::NotFound(what) => Self::NotFound(what),
            other => Self::RemoteUnavailable(other),
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
