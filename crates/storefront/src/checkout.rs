//! Order placement protocol.
//!
//! Converts a non-empty, stock-valid cart into a submitted order:
//! `Idle -> Submitting -> {Succeeded, Failed}`. Exactly one remote call per
//! attempt, at most one attempt in flight per session, and no client-side
//! retry of partial effects. On success the cart and order-history caches
//! are invalidated before the caller observes the result.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::instrument;

use wildroot_core::OrderId;

use crate::auth::IdentityProvider;
use crate::backend::{BackendApi, BackendError};
use crate::cart::CartService;
use crate::error::{Result, StoreError};
use crate::orders::OrderHistory;

/// Observable placement state, published for submit-control gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementState {
    /// No placement attempt in flight.
    #[default]
    Idle,
    /// The remote call has been issued and not yet resolved.
    Submitting,
    /// The last attempt produced this order.
    Succeeded(OrderId),
    /// The last attempt failed; the cart is untouched and a new attempt may
    /// be started.
    Failed,
}

/// The order placement state machine for one session.
#[derive(Clone)]
pub struct OrderPlacement {
    inner: Arc<OrderPlacementInner>,
}

struct OrderPlacementInner {
    backend: Arc<dyn BackendApi>,
    identity: Arc<dyn IdentityProvider>,
    cart: CartService,
    orders: OrderHistory,
    state: watch::Sender<PlacementState>,
    in_flight: Arc<Mutex<()>>,
}

impl OrderPlacement {
    /// Create the placement protocol for one session.
    #[must_use]
    pub fn new(
        backend: Arc<dyn BackendApi>,
        identity: Arc<dyn IdentityProvider>,
        cart: CartService,
        orders: OrderHistory,
    ) -> Self {
        let (state, _) = watch::channel(PlacementState::Idle);
        Self {
            inner: Arc::new(OrderPlacementInner {
                backend,
                identity,
                cart,
                orders,
                state,
                in_flight: Arc::new(Mutex::new(())),
            }),
        }
    }

    /// Current protocol state.
    #[must_use]
    pub fn state(&self) -> PlacementState {
        *self.inner.state.borrow()
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlacementState> {
        self.inner.state.subscribe()
    }

    /// Place an order consuming the caller's entire cart.
    ///
    /// Preconditions, checked before any remote call: no other placement in
    /// flight, identity present, last-fetched cart non-empty. A cart emptied
    /// concurrently on the backend is still submitted; the backend's own
    /// rules decide that outcome.
    ///
    /// The remote call and the follow-up invalidations run on a detached
    /// task: abandoning this future does not cancel an in-flight placement,
    /// and its result is applied to the shared caches regardless.
    ///
    /// # Errors
    ///
    /// `Validation` if a placement is already in flight or the cart is
    /// empty; `Unauthenticated` without an identity; backend errors
    /// otherwise. On failure no local state is mutated and the caller may
    /// retry from `Idle`.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Result<OrderId> {
        let Ok(guard) = Arc::clone(&self.inner.in_flight).try_lock_owned() else {
            return Err(StoreError::Validation(
                "an order placement is already in progress".to_string(),
            ));
        };

        if !self.inner.identity.is_authenticated() {
            return Err(StoreError::Unauthenticated);
        }

        let lines = self.inner.cart.lines().await?;
        if lines.is_empty() {
            return Err(StoreError::Validation("cart is empty".to_string()));
        }

        self.inner.state.send_replace(PlacementState::Submitting);

        let inner = Arc::clone(&self.inner);
        let attempt = tokio::spawn(async move {
            let _guard = guard;
            match inner.backend.place_order().await {
                Ok(order_id) => {
                    // Both caches are stale before anyone can observe success.
                    inner.cart.invalidate().await;
                    inner.orders.invalidate().await;
                    inner.state.send_replace(PlacementState::Succeeded(order_id));
                    Ok(order_id)
                }
                Err(err) => {
                    inner.state.send_replace(PlacementState::Failed);
                    Err(StoreError::from(err))
                }
            }
        });

        match attempt.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            // The attempt task is never aborted; a lost join can only be
            // observed during runtime shutdown.
            Err(_) => Err(StoreError::RemoteUnavailable(BackendError::Shutdown)),
        }
    }
}
