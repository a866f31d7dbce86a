//! Role-gated catalog management.
//!
//! Products are mutated only through these operations. Each one checks the
//! backend-confirmed role, validates input locally, issues the remote call,
//! and invalidates the catalog cache so the next read refetches.

use std::sync::Arc;

use tracing::instrument;

use wildroot_core::{ProductId, Role};

use crate::auth::IdentityProvider;
use crate::backend::{BackendApi, ProductInput};
use crate::catalog::CatalogCache;
use crate::error::{Result, StoreError};
use crate::profile::ProfileService;

/// Admin operations over the product catalog.
#[derive(Clone)]
pub struct CatalogAdmin {
    inner: Arc<CatalogAdminInner>,
}

struct CatalogAdminInner {
    backend: Arc<dyn BackendApi>,
    identity: Arc<dyn IdentityProvider>,
    profile: ProfileService,
    catalog: CatalogCache,
}

impl CatalogAdmin {
    /// Create the admin surface for one session.
    #[must_use]
    pub fn new(
        backend: Arc<dyn BackendApi>,
        identity: Arc<dyn IdentityProvider>,
        profile: ProfileService,
        catalog: CatalogCache,
    ) -> Self {
        Self {
            inner: Arc::new(CatalogAdminInner {
                backend,
                identity,
                profile,
                catalog,
            }),
        }
    }

    /// Create a product and invalidate the catalog.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`/`Unauthorized` per the confirmed role; `Validation`
    /// for bad input, both without any remote mutation.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: ProductInput) -> Result<ProductId> {
        self.authorize().await?;
        validate_input(&input)?;

        let id = self.inner.backend.create_product(input).await?;
        self.inner.catalog.invalidate().await;
        Ok(id)
    }

    /// Update a product and invalidate the catalog.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, input: ProductInput) -> Result<()> {
        self.authorize().await?;
        validate_input(&input)?;

        self.inner.backend.update_product(id, input).await?;
        self.inner.catalog.invalidate().await;
        Ok(())
    }

    /// Delete a product and invalidate the catalog.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.authorize().await?;

        self.inner.backend.delete_product(id).await?;
        self.inner.catalog.invalidate().await;
        Ok(())
    }

    async fn authorize(&self) -> Result<()> {
        if !self.inner.identity.is_authenticated() {
            return Err(StoreError::Unauthenticated);
        }
        match self.inner.profile.role().await? {
            Role::Admin => Ok(()),
            Role::User | Role::Guest => Err(StoreError::Unauthorized),
        }
    }
}

fn validate_input(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(StoreError::Validation("product name is required".to_string()));
    }
    if input.category.trim().is_empty() {
        return Err(StoreError::Validation(
            "product category is required".to_string(),
        ));
    }
    Ok(())
}
