//! Single-value snapshot caches.
//!
//! Cart, orders, profile, and role are each one value per session, fetched
//! whole and invalidated whole. [`Snapshot`] is the cache service for those:
//! `get`-through with a caller-supplied fetch, explicit `invalidate`, and a
//! generation `subscribe` channel for interested views. The keyed product
//! catalog uses `moka` instead (see [`crate::catalog`]).

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{RwLock, watch};

/// A shared, invalidate-on-write cache holding one fetched snapshot.
///
/// Values are only stored after a confirmed backend response, never
/// optimistically. Concurrent callers may fetch redundantly; the last
/// confirmed response wins and readers always re-derive from the latest
/// stored snapshot.
#[derive(Debug)]
pub struct Snapshot<T> {
    inner: Arc<SnapshotInner<T>>,
}

#[derive(Debug)]
struct SnapshotInner<T> {
    value: RwLock<Option<T>>,
    generation: watch::Sender<u64>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Snapshot<T> {
    /// Create an empty (stale) snapshot.
    #[must_use]
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            inner: Arc::new(SnapshotInner {
                value: RwLock::new(None),
                generation,
            }),
        }
    }

    /// Return the cached value, or run `fetch` and store its result.
    ///
    /// The lock is not held across the fetch, so readers are never blocked
    /// on the backend.
    pub async fn get_or_try_fetch<E, Fut>(
        &self,
        fetch: impl FnOnce() -> Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.inner.value.read().await.clone() {
            return Ok(value);
        }

        let fetched = fetch().await?;
        self.store(fetched.clone()).await;
        Ok(fetched)
    }

    /// The last-fetched value, if any, without touching the backend.
    pub async fn peek(&self) -> Option<T> {
        self.inner.value.read().await.clone()
    }

    /// Store a confirmed value and notify subscribers.
    pub async fn store(&self, value: T) {
        *self.inner.value.write().await = Some(value);
        self.bump();
    }

    /// Mark the snapshot stale, forcing the next read to re-fetch.
    pub async fn invalidate(&self) {
        *self.inner.value.write().await = None;
        self.bump();
    }

    /// Subscribe to generation changes (stores and invalidations).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.generation.subscribe()
    }

    fn bump(&self) {
        self.inner.generation.send_modify(|generation| *generation += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_through_fetches_once() {
        let snapshot: Snapshot<Vec<u32>> = Snapshot::new();

        let first = snapshot
            .get_or_try_fetch(|| async { Ok::<_, ()>(vec![1, 2]) })
            .await
            .expect("fetch");
        assert_eq!(first, vec![1, 2]);

        // Second read must come from the cache, not the fetch closure.
        let second = snapshot
            .get_or_try_fetch(|| async { Ok::<_, ()>(vec![9, 9]) })
            .await
            .expect("fetch");
        assert_eq!(second, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_snapshot_stale() {
        let snapshot: Snapshot<u32> = Snapshot::new();

        let result = snapshot
            .get_or_try_fetch(|| async { Err::<u32, &str>("backend down") })
            .await;
        assert!(result.is_err());
        assert_eq!(snapshot.peek().await, None);

        // A later read retries the fetch.
        let value = snapshot
            .get_or_try_fetch(|| async { Ok::<_, &str>(7) })
            .await
            .expect("fetch");
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_and_notifies() {
        let snapshot: Snapshot<u32> = Snapshot::new();
        let mut generations = snapshot.subscribe();

        snapshot.store(1).await;
        snapshot.invalidate().await;
        assert_eq!(snapshot.peek().await, None);

        generations.changed().await.expect("sender alive");
        assert_eq!(*generations.borrow(), 2);

        let value = snapshot
            .get_or_try_fetch(|| async { Ok::<_, ()>(2) })
            .await
            .expect("fetch");
        assert_eq!(value, 2);
    }
}
