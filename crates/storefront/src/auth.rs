//! Identity collaborator seam.
//!
//! Authentication itself (login handshake, token refresh) lives outside this
//! crate. The core only ever asks one question: is an identity currently
//! present?

use std::sync::atomic::{AtomicBool, Ordering};

/// External identity provider: exposes "current identity or none".
pub trait IdentityProvider: Send + Sync {
    /// Whether an identity is currently present.
    fn is_authenticated(&self) -> bool;
}

/// Identity source backed by a flag, toggled by the embedding shell.
///
/// The CLI flips this on `sign-in`/`sign-out`; tests use it to exercise
/// unauthenticated paths.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    signed_in: AtomicBool,
}

impl SessionIdentity {
    /// Create a signed-out identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an already signed-in identity.
    #[must_use]
    pub fn signed_in() -> Self {
        let identity = Self::default();
        identity.sign_in();
        identity
    }

    /// Mark the session as signed in.
    pub fn sign_in(&self) {
        self.signed_in.store(true, Ordering::Release);
    }

    /// Mark the session as signed out.
    pub fn sign_out(&self) {
        self.signed_in.store(false, Ordering::Release);
    }
}

impl IdentityProvider for SessionIdentity {
    fn is_authenticated(&self) -> bool {
        self.signed_in.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_identity_toggles() {
        let identity = SessionIdentity::new();
        assert!(!identity.is_authenticated());

        identity.sign_in();
        assert!(identity.is_authenticated());

        identity.sign_out();
        assert!(!identity.is_authenticated());
    }

    #[test]
    fn test_signed_in_constructor() {
        assert!(SessionIdentity::signed_in().is_authenticated());
    }
}
