//! Catalog cache: the client-held, invalidate-on-write snapshot of products.
//!
//! Products are cached with no TTL - staleness is bounded only by explicit
//! invalidation after catalog mutations, and otherwise accepted as a UX
//! tradeoff. All writes go through the backend (see [`crate::admin`]); there
//! is no local mutation API.

use std::sync::Arc;

use moka::future::Cache;
use tokio::sync::watch;
use tracing::{debug, instrument};

use wildroot_core::ProductId;

use crate::backend::BackendApi;
use crate::error::{Result, StoreError};
use crate::types::Product;

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// Client-side cache of the product catalog.
///
/// Cheaply cloneable; all clones share one cache. Pass the instance to every
/// component that needs catalog reads - there are no ambient globals.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Arc<CatalogCacheInner>,
}

struct CatalogCacheInner {
    backend: Arc<dyn BackendApi>,
    cache: Cache<CacheKey, CacheValue>,
    generation: watch::Sender<u64>,
}

impl CatalogCache {
    /// Create a catalog cache backed by the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        // Capacity-bounded, no time-to-live: staleness is bounded by
        // explicit invalidation, not freshness.
        let cache = Cache::builder().max_capacity(1_000).build();
        let (generation, _) = watch::channel(0);

        Self {
            inner: Arc::new(CatalogCacheInner {
                backend,
                cache,
                generation,
            }),
        }
    }

    /// List all products, from cache or backend.
    ///
    /// # Errors
    ///
    /// Returns `RemoteUnavailable` if the backend call fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("cache hit for product list");
            return Ok(products.as_ref().clone());
        }

        let products = self.inner.backend.list_products().await?;
        self.inner
            .cache
            .insert(
                CacheKey::Products,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    /// Get a product by id, from cache or backend.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product no longer exists, or
    /// `RemoteUnavailable` if the backend call fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        if let Some(CacheValue::Product(product)) =
            self.inner.cache.get(&CacheKey::Product(id)).await
        {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product = self
            .inner
            .backend
            .get_product(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("product {id}")))?;

        self.inner
            .cache
            .insert(
                CacheKey::Product(id),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;

        Ok(product)
    }

    /// Invalidate all cached catalog data and notify subscribers.
    ///
    /// Called after any admin create/update/delete; the next read refetches.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
        self.inner
            .generation
            .send_modify(|generation| *generation += 1);
    }

    /// Subscribe to invalidation events.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.generation.subscribe()
    }
}

// =============================================================================
// Client-side filtering
// =============================================================================

/// Case-insensitive substring filter over product name and category.
///
/// Plain contains-matching, no ranking.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|product| {
            product.name.to_lowercase().contains(&query)
                || product.category.to_lowercase().contains(&query)
        })
        .collect()
}

/// Distinct category labels, sorted, for the filter control.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = products
        .iter()
        .map(|product| product.category.clone())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeBackend, product};

    #[tokio::test]
    async fn test_list_products_caches_until_invalidated() {
        let backend = Arc::new(FakeBackend::default());
        backend.put_product(product(1, "Cedar Planter", 1500, 5)).await;
        let catalog = CatalogCache::new(backend.clone());

        assert_eq!(catalog.list_products().await.expect("list").len(), 1);
        backend.put_product(product(2, "Stone Mug", 900, 12)).await;

        // Still served from cache.
        assert_eq!(catalog.list_products().await.expect("list").len(), 1);

        catalog.invalidate().await;
        assert_eq!(catalog.list_products().await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let backend = Arc::new(FakeBackend::default());
        let catalog = CatalogCache::new(backend);

        let err = catalog
            .get_product(ProductId::new(99))
            .await
            .expect_err("missing product");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalidate_notifies_subscribers() {
        let backend = Arc::new(FakeBackend::default());
        let catalog = CatalogCache::new(backend);
        let mut generations = catalog.subscribe();

        catalog.invalidate().await;
        generations.changed().await.expect("sender alive");
        assert_eq!(*generations.borrow(), 1);
    }

    #[test]
    fn test_filter_products_matches_name_and_category() {
        let products = vec![
            product(1, "Cedar Planter", 1500, 5),
            product(2, "Stone Mug", 900, 12),
        ];

        let by_name = filter_products(&products, "cedar");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name.first().map(|p| p.id), Some(ProductId::new(1)));

        // `product` helper assigns the "Garden" category to everything.
        assert_eq!(filter_products(&products, "garden").len(), 2);
        assert_eq!(filter_products(&products, "  ").len(), 2);
        assert!(filter_products(&products, "carbide").is_empty());
    }

    #[test]
    fn test_categories_sorted_distinct() {
        let mut first = product(1, "Cedar Planter", 1500, 5);
        first.category = "Garden".to_string();
        let mut second = product(2, "Stone Mug", 900, 12);
        second.category = "Kitchen".to_string();
        let mut third = product(3, "Trowel", 700, 3);
        third.category = "Garden".to_string();

        assert_eq!(
            categories(&[first, second, third]),
            vec!["Garden".to_string(), "Kitchen".to_string()]
        );
    }
}
