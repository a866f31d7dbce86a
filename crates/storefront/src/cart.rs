//! Cart aggregate: the caller's product-to-quantity mapping.
//!
//! Mutations are never optimistic. Every remote write is followed by an
//! invalidate-and-refetch, and the mutation only resolves once the refetch
//! has, so the cart never displays a quantity the backend rejected.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use wildroot_core::{Price, ProductId};

use crate::auth::IdentityProvider;
use crate::backend::BackendApi;
use crate::cache::Snapshot;
use crate::catalog::CatalogCache;
use crate::error::{Result, StoreError};
use crate::stock;
use crate::types::{CartLine, Product};

/// Outcome of a quantity update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The backend applied the new quantity.
    Applied,
    /// The request was outside `[1, stock]` and dropped locally; no remote
    /// call was made.
    RejectedOutOfBounds,
}

/// Per-line display totals derived by joining cart and catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTotal {
    /// Referenced product.
    pub product_id: ProductId,
    /// Requested quantity.
    pub quantity: u32,
    /// Current catalog unit price.
    pub unit_price: Price,
    /// `unit_price * quantity`.
    pub line_total: Price,
}

/// Cart totals for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotals {
    /// One entry per cart line whose product is present in the catalog.
    pub lines: Vec<LineTotal>,
    /// Sum of line totals.
    pub grand_total: Price,
}

/// Join cart lines against a catalog snapshot and total them.
///
/// Lines referencing products absent from the catalog are silently excluded:
/// a best-effort display policy for deleted products, not a correctness
/// guarantee.
#[must_use]
pub fn compute_totals(cart: &[CartLine], catalog: &[Product]) -> CartTotals {
    let mut lines = Vec::with_capacity(cart.len());
    let mut grand_total = Price::ZERO;

    for line in cart {
        let Some(product) = catalog.iter().find(|p| p.id == line.product_id) else {
            continue;
        };
        let line_total = product.price.times(line.quantity);
        grand_total = grand_total.plus(line_total);
        lines.push(LineTotal {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: product.price,
            line_total,
        });
    }

    CartTotals { lines, grand_total }
}

/// The caller's cart, cached and mutated through the backend.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartServiceInner>,
}

struct CartServiceInner {
    backend: Arc<dyn BackendApi>,
    identity: Arc<dyn IdentityProvider>,
    catalog: CatalogCache,
    cache: Snapshot<Vec<CartLine>>,
}

impl CartService {
    /// Create a cart service for one session.
    #[must_use]
    pub fn new(
        backend: Arc<dyn BackendApi>,
        identity: Arc<dyn IdentityProvider>,
        catalog: CatalogCache,
    ) -> Self {
        Self {
            inner: Arc::new(CartServiceInner {
                backend,
                identity,
                catalog,
                cache: Snapshot::new(),
            }),
        }
    }

    /// Current cart lines, from cache or backend.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a remote call if no identity is
    /// present, or `RemoteUnavailable` if the fetch fails.
    #[instrument(skip(self))]
    pub async fn lines(&self) -> Result<Vec<CartLine>> {
        self.require_identity()?;
        self.inner
            .cache
            .get_or_try_fetch(|| self.inner.backend.get_cart())
            .await
            .map_err(StoreError::from)
    }

    /// The last-fetched cart lines, if any, without touching the backend.
    pub async fn last_fetched(&self) -> Option<Vec<CartLine>> {
        self.inner.cache.peek().await
    }

    /// Add quantity of a product to the cart.
    ///
    /// The backend decides whether a new line is created or an existing
    /// line's quantity increased; the client observes the result via refetch.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` without a remote call if no identity is present;
    /// `Validation` if `quantity` is zero; backend errors otherwise.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<()> {
        self.require_identity()?;
        if quantity < 1 {
            return Err(StoreError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        self.inner.backend.add_to_cart(product_id, quantity).await?;
        self.refresh().await
    }

    /// Request a new quantity for an existing line.
    ///
    /// Requests outside `[1, stock]` are dropped locally as advisory
    /// rejections - no remote call is issued. The bound is checked against
    /// the cached catalog, which may be stale; the backend re-checks at
    /// commit time.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(
        &self,
        product_id: ProductId,
        new_quantity: u32,
    ) -> Result<QuantityUpdate> {
        self.require_identity()?;

        let product = self.inner.catalog.get_product(product_id).await?;
        if !stock::is_valid_quantity(new_quantity, product.stock_quantity) {
            return Ok(QuantityUpdate::RejectedOutOfBounds);
        }

        self.inner
            .backend
            .update_cart_item(product_id, new_quantity)
            .await?;
        self.refresh().await?;
        Ok(QuantityUpdate::Applied)
    }

    /// Remove a line from the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: ProductId) -> Result<()> {
        self.require_identity()?;
        self.inner.backend.remove_cart_item(product_id).await?;
        self.refresh().await
    }

    /// Totals for the current cart joined against the current catalog.
    pub async fn totals(&self) -> Result<CartTotals> {
        let lines = self.lines().await?;
        let catalog = self.inner.catalog.list_products().await?;
        Ok(compute_totals(&lines, &catalog))
    }

    /// Mark the cart cache stale, forcing the next read to re-fetch.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate().await;
    }

    /// Subscribe to cart cache changes (stores and invalidations).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.cache.subscribe()
    }

    fn require_identity(&self) -> Result<()> {
        if self.inner.identity.is_authenticated() {
            Ok(())
        } else {
            Err(StoreError::Unauthenticated)
        }
    }

    /// Invalidate and refetch after a confirmed mutation.
    ///
    /// The mutation is only considered complete once this resolves, so a
    /// caller reading afterwards sees a value at least as new as the
    /// mutation's effect. If the refetch fails the cache stays invalidated
    /// and the next read retries.
    async fn refresh(&self) -> Result<()> {
        self.inner.cache.invalidate().await;
        let lines = self.inner.backend.get_cart().await?;
        self.inner.cache.store(lines).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionIdentity;
    use crate::testutil::{FakeBackend, product};

    fn service(backend: Arc<FakeBackend>, signed_in: bool) -> CartService {
        let identity = if signed_in {
            Arc::new(SessionIdentity::signed_in())
        } else {
            Arc::new(SessionIdentity::new())
        };
        let catalog = CatalogCache::new(backend.clone());
        CartService::new(backend, identity, catalog)
    }

    #[test]
    fn test_compute_totals_scenario() {
        let catalog = vec![product(7, "Cedar Planter", 1500, 5)];
        let cart = vec![CartLine {
            product_id: ProductId::new(7),
            quantity: 2,
        }];

        let totals = compute_totals(&cart, &catalog);
        assert_eq!(totals.grand_total, Price::from_minor_units(3000));
        assert_eq!(totals.grand_total.display(), "$30.00");
        assert_eq!(totals.lines.len(), 1);
        assert_eq!(
            totals.lines.first().map(|line| line.line_total),
            Some(Price::from_minor_units(3000))
        );
    }

    #[test]
    fn test_compute_totals_excludes_deleted_products() {
        let catalog = vec![product(1, "Stone Mug", 900, 12)];
        let cart = vec![
            CartLine {
                product_id: ProductId::new(1),
                quantity: 2,
            },
            // Product 2 was deleted from the catalog.
            CartLine {
                product_id: ProductId::new(2),
                quantity: 10,
            },
        ];

        let totals = compute_totals(&cart, &catalog);
        assert_eq!(totals.lines.len(), 1);
        assert_eq!(totals.grand_total, Price::from_minor_units(1800));
    }

    #[test]
    fn test_compute_totals_empty_cart() {
        let totals = compute_totals(&[], &[product(1, "Stone Mug", 900, 12)]);
        assert!(totals.lines.is_empty());
        assert_eq!(totals.grand_total, Price::ZERO);
    }

    #[tokio::test]
    async fn test_add_item_unauthenticated_makes_no_remote_call() {
        let backend = Arc::new(FakeBackend::default());
        let cart = service(backend.clone(), false);

        let err = cart
            .add_item(ProductId::new(1), 1)
            .await
            .expect_err("unauthenticated");
        assert!(matches!(err, StoreError::Unauthenticated));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_item_zero_quantity_rejected_locally() {
        let backend = Arc::new(FakeBackend::default());
        let cart = service(backend.clone(), true);

        let err = cart
            .add_item(ProductId::new(1), 0)
            .await
            .expect_err("invalid quantity");
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_item_refetches_cart() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_product(product(7, "Cedar Planter", 1500, 5)).await;
        let cart = service(backend.clone(), true);

        cart.add_item(ProductId::new(7), 2).await.expect("add");

        let lines = cart.lines().await.expect("lines");
        assert_eq!(
            lines,
            vec![CartLine {
                product_id: ProductId::new(7),
                quantity: 2,
            }]
        );
        // The mutation resolved only after the refetch.
        let calls = backend.calls().await;
        assert_eq!(calls, vec!["addToCart", "getCart"]);
    }

    #[tokio::test]
    async fn test_set_quantity_out_of_bounds_is_local_no_op() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_product(product(7, "Cedar Planter", 1500, 5)).await;
        backend
            .set_cart(vec![CartLine {
                product_id: ProductId::new(7),
                quantity: 2,
            }])
            .await;
        let cart = service(backend.clone(), true);

        // Raising quantity to 6 exceeds stock 5.
        let outcome = cart
            .set_quantity(ProductId::new(7), 6)
            .await
            .expect("advisory rejection is not an error");
        assert_eq!(outcome, QuantityUpdate::RejectedOutOfBounds);

        let below = cart.set_quantity(ProductId::new(7), 0).await.expect("advisory");
        assert_eq!(below, QuantityUpdate::RejectedOutOfBounds);

        // Only the catalog lookup hit the backend; no cart mutation went out.
        let calls = backend.calls().await;
        assert!(!calls.iter().any(|op| op == "updateCartItem"));
    }

    #[tokio::test]
    async fn test_set_quantity_within_bounds_applies_and_refetches() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_product(product(7, "Cedar Planter", 1500, 5)).await;
        backend
            .set_cart(vec![CartLine {
                product_id: ProductId::new(7),
                quantity: 2,
            }])
            .await;
        let cart = service(backend.clone(), true);

        let outcome = cart
            .set_quantity(ProductId::new(7), 5)
            .await
            .expect("update");
        assert_eq!(outcome, QuantityUpdate::Applied);

        let lines = cart.lines().await.expect("lines");
        assert_eq!(lines.first().map(|line| line.quantity), Some(5));
    }

    #[tokio::test]
    async fn test_remove_item_refetches() {
        let backend = Arc::new(FakeBackend::default());
        backend
            .set_cart(vec![CartLine {
                product_id: ProductId::new(7),
                quantity: 2,
            }])
            .await;
        let cart = service(backend.clone(), true);

        cart.remove_item(ProductId::new(7)).await.expect("remove");
        assert!(cart.lines().await.expect("lines").is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_cache_untouched() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_product(product(7, "Cedar Planter", 1500, 5)).await;
        backend
            .set_cart(vec![CartLine {
                product_id: ProductId::new(7),
                quantity: 2,
            }])
            .await;
        let cart = service(backend.clone(), true);

        // Warm the cache.
        let before = cart.lines().await.expect("lines");

        backend.fail_op("addToCart").await;
        let err = cart
            .add_item(ProductId::new(7), 1)
            .await
            .expect_err("backend down");
        assert!(err.is_retryable());

        // The cached cart is exactly as it was before the attempt.
        assert_eq!(cart.last_fetched().await, Some(before));
    }

    #[tokio::test]
    async fn test_failed_refetch_leaves_cache_stale_not_partial() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_product(product(7, "Cedar Planter", 1500, 5)).await;
        let cart = service(backend.clone(), true);

        backend.fail_op("getCart").await;
        let err = cart
            .add_item(ProductId::new(7), 1)
            .await
            .expect_err("refetch failed");
        assert!(err.is_retryable());

        // No stale value is exposed; the next read refetches.
        assert_eq!(cart.last_fetched().await, None);
        backend.clear_failures().await;
        let lines = cart.lines().await.expect("lines");
        assert_eq!(lines.first().map(|line| line.quantity), Some(1));
    }

    #[tokio::test]
    async fn test_totals_joins_cart_and_catalog() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_product(product(7, "Cedar Planter", 1500, 5)).await;
        backend
            .set_cart(vec![CartLine {
                product_id: ProductId::new(7),
                quantity: 2,
            }])
            .await;
        let cart = service(backend, true);

        let totals = cart.totals().await.expect("totals");
        assert_eq!(totals.grand_total.display(), "$30.00");
    }
}
