//! Order history: cached view of the caller's placed orders.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use crate::auth::IdentityProvider;
use crate::backend::BackendApi;
use crate::cache::Snapshot;
use crate::error::{Result, StoreError};
use crate::types::Order;

/// The caller's order history, newest first.
///
/// Orders are immutable; the history cache is invalidated on successful
/// placement and refetched on the next read.
#[derive(Clone)]
pub struct OrderHistory {
    inner: Arc<OrderHistoryInner>,
}

struct OrderHistoryInner {
    backend: Arc<dyn BackendApi>,
    identity: Arc<dyn IdentityProvider>,
    cache: Snapshot<Vec<Order>>,
}

impl OrderHistory {
    /// Create an order history view for one session.
    #[must_use]
    pub fn new(backend: Arc<dyn BackendApi>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(OrderHistoryInner {
                backend,
                identity,
                cache: Snapshot::new(),
            }),
        }
    }

    /// List the caller's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without a remote call if no identity is
    /// present, or `RemoteUnavailable` if the fetch fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>> {
        if !self.inner.identity.is_authenticated() {
            return Err(StoreError::Unauthenticated);
        }

        self.inner
            .cache
            .get_or_try_fetch(|| async {
                let mut orders = self.inner.backend.get_orders().await?;
                orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
                Ok::<Vec<Order>, crate::backend::BackendError>(orders)
            })
            .await
            .map_err(StoreError::from)
    }

    /// Mark the history stale, forcing the next read to re-fetch.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate().await;
    }

    /// Subscribe to history cache changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.cache.subscribe()
    }
}
