//! Session state shared across all storefront components.

use std::sync::Arc;

use crate::admin::CatalogAdmin;
use crate::auth::IdentityProvider;
use crate::backend::BackendApi;
use crate::cart::CartService;
use crate::catalog::CatalogCache;
use crate::checkout::OrderPlacement;
use crate::orders::OrderHistory;
use crate::profile::ProfileService;

/// Everything one user session needs: the backend seam, the identity seam,
/// and the cache services wired to them.
///
/// This struct is cheaply cloneable via `Arc`. The caches are shared
/// process-wide per session; any component may trigger invalidation and
/// readers always re-derive from the latest fetched snapshot.
#[derive(Clone)]
pub struct StoreState {
    inner: Arc<StoreStateInner>,
}

struct StoreStateInner {
    backend: Arc<dyn BackendApi>,
    identity: Arc<dyn IdentityProvider>,
    catalog: CatalogCache,
    cart: CartService,
    orders: OrderHistory,
    profile: ProfileService,
    admin: CatalogAdmin,
    checkout: OrderPlacement,
}

impl StoreState {
    /// Wire up a session against the given backend and identity provider.
    #[must_use]
    pub fn new(backend: Arc<dyn BackendApi>, identity: Arc<dyn IdentityProvider>) -> Self {
        let catalog = CatalogCache::new(backend.clone());
        let cart = CartService::new(backend.clone(), identity.clone(), catalog.clone());
        let orders = OrderHistory::new(backend.clone(), identity.clone());
        let profile = ProfileService::new(backend.clone(), identity.clone());
        let admin = CatalogAdmin::new(
            backend.clone(),
            identity.clone(),
            profile.clone(),
            catalog.clone(),
        );
        let checkout = OrderPlacement::new(
            backend.clone(),
            identity.clone(),
            cart.clone(),
            orders.clone(),
        );

        Self {
            inner: Arc::new(StoreStateInner {
                backend,
                identity,
                catalog,
                cart,
                orders,
                profile,
                admin,
                checkout,
            }),
        }
    }

    /// The backend seam.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn BackendApi> {
        &self.inner.backend
    }

    /// The identity seam.
    #[must_use]
    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.inner.identity
    }

    /// The catalog cache.
    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    /// The cart aggregate.
    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    /// The order history view.
    #[must_use]
    pub fn orders(&self) -> &OrderHistory {
        &self.inner.orders
    }

    /// The profile and role service.
    #[must_use]
    pub fn profile(&self) -> &ProfileService {
        &self.inner.profile
    }

    /// The role-gated catalog management surface.
    #[must_use]
    pub fn admin(&self) -> &CatalogAdmin {
        &self.inner.admin
    }

    /// The order placement protocol.
    #[must_use]
    pub fn checkout(&self) -> &OrderPlacement {
        &self.inner.checkout
    }
}
