//! Caller profile and role.
//!
//! The profile is created once per identity through a mandatory setup flow;
//! until it exists, [`ProfileService::needs_setup`] reports true and the
//! embedding shell blocks other actions. The role is whatever the backend
//! confirms - the client never assumes one.

use std::sync::Arc;

use tracing::instrument;

use wildroot_core::Role;

use crate::auth::IdentityProvider;
use crate::backend::BackendApi;
use crate::cache::Snapshot;
use crate::error::{Result, StoreError};
use crate::types::UserProfile;

/// Cached view of the caller's profile and backend-confirmed role.
#[derive(Clone)]
pub struct ProfileService {
    inner: Arc<ProfileServiceInner>,
}

struct ProfileServiceInner {
    backend: Arc<dyn BackendApi>,
    identity: Arc<dyn IdentityProvider>,
    profile: Snapshot<Option<UserProfile>>,
    role: Snapshot<Role>,
    admin: Snapshot<bool>,
}

impl ProfileService {
    /// Create a profile service for one session.
    #[must_use]
    pub fn new(backend: Arc<dyn BackendApi>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(ProfileServiceInner {
                backend,
                identity,
                profile: Snapshot::new(),
                role: Snapshot::new(),
                admin: Snapshot::new(),
            }),
        }
    }

    /// The caller's profile, or `None` while setup is outstanding.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a remote call if no identity is
    /// present.
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<Option<UserProfile>> {
        self.require_identity()?;
        self.inner
            .profile
            .get_or_try_fetch(|| self.inner.backend.get_caller_user_profile())
            .await
            .map_err(StoreError::from)
    }

    /// Whether the mandatory one-time profile setup is still outstanding.
    pub async fn needs_setup(&self) -> Result<bool> {
        Ok(self.current().await?.is_none())
    }

    /// Create or replace the caller's profile, then refetch it.
    ///
    /// # Errors
    ///
    /// `Validation` if the display name is blank (no remote call);
    /// `Unauthenticated` without an identity.
    #[instrument(skip(self, profile))]
    pub async fn save(&self, profile: UserProfile) -> Result<()> {
        self.require_identity()?;
        if profile.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "display name is required".to_string(),
            ));
        }

        self.inner.backend.save_caller_user_profile(profile).await?;

        // Non-optimistic: refetch before the save resolves.
        self.inner.profile.invalidate().await;
        let fresh = self.inner.backend.get_caller_user_profile().await?;
        self.inner.profile.store(fresh).await;
        Ok(())
    }

    /// The caller's role. Guests never generate a remote call.
    #[instrument(skip(self))]
    pub async fn role(&self) -> Result<Role> {
        if !self.inner.identity.is_authenticated() {
            return Ok(Role::Guest);
        }
        self.inner
            .role
            .get_or_try_fetch(|| self.inner.backend.get_caller_user_role())
            .await
            .map_err(StoreError::from)
    }

    /// Whether the backend considers the caller an admin.
    #[instrument(skip(self))]
    pub async fn is_admin(&self) -> Result<bool> {
        if !self.inner.identity.is_authenticated() {
            return Ok(false);
        }
        self.inner
            .admin
            .get_or_try_fetch(|| self.inner.backend.is_caller_admin())
            .await
            .map_err(StoreError::from)
    }

    /// Drop all per-identity caches. Call on sign-in state changes.
    pub async fn reset(&self) {
        self.inner.profile.invalidate().await;
        self.inner.role.invalidate().await;
        self.inner.admin.invalidate().await;
    }

    fn require_identity(&self) -> Result<()> {
        if self.inner.identity.is_authenticated() {
            Ok(())
        } else {
            Err(StoreError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionIdentity;
    use crate::testutil::FakeBackend;

    #[tokio::test]
    async fn test_needs_setup_until_profile_saved() {
        let backend = Arc::new(FakeBackend::default());
        let service = ProfileService::new(backend, Arc::new(SessionIdentity::signed_in()));

        assert!(service.needs_setup().await.expect("needs_setup"));

        service
            .save(UserProfile {
                name: "Rowan".to_string(),
            })
            .await
            .expect("save");

        assert!(!service.needs_setup().await.expect("needs_setup"));
        assert_eq!(
            service.current().await.expect("profile").map(|p| p.name),
            Some("Rowan".to_string())
        );
    }

    #[tokio::test]
    async fn test_save_blank_name_blocked_locally() {
        let backend = Arc::new(FakeBackend::default());
        let service =
            ProfileService::new(backend.clone(), Arc::new(SessionIdentity::signed_in()));

        let err = service
            .save(UserProfile {
                name: "   ".to_string(),
            })
            .await
            .expect_err("blank name");
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_guest_role_without_remote_call() {
        let backend = Arc::new(FakeBackend::default());
        let service = ProfileService::new(backend.clone(), Arc::new(SessionIdentity::new()));

        assert_eq!(service.role().await.expect("role"), Role::Guest);
        assert!(!service.is_admin().await.expect("is_admin"));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_role_cached_until_reset() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_role(Role::User).await;
        let service =
            ProfileService::new(backend.clone(), Arc::new(SessionIdentity::signed_in()));

        assert_eq!(service.role().await.expect("role"), Role::User);

        backend.set_role(Role::Admin).await;
        // Cached confirmation still applies.
        assert_eq!(service.role().await.expect("role"), Role::User);

        service.reset().await;
        assert_eq!(service.role().await.expect("role"), Role::Admin);
    }
}
