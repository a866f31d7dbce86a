//! Integration test harness for Wildroot Market.
//!
//! Scenarios in `tests/` drive the full client - session wiring, caches,
//! cart aggregate, placement protocol - against [`ScriptedBackend`], an
//! in-memory backend that enforces the server-side rules the client treats
//! as authoritative: stock bounds at placement time, cart consumption, and
//! order id assignment.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use wildroot_core::{OrderId, OrderStatus, Price, ProductId, Role, Timestamp};
use wildroot_storefront::auth::SessionIdentity;
use wildroot_storefront::backend::{BackendApi, BackendError, ProductInput};
use wildroot_storefront::state::StoreState;
use wildroot_storefront::types::{CartLine, Order, OrderItem, Product, UserProfile};

/// Build a test product.
#[must_use]
pub fn product(id: i64, name: &str, category: &str, price: u64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} from the Wildroot workshop"),
        image_url: String::new(),
        category: category.to_string(),
        price: Price::from_minor_units(price),
        stock_quantity: stock,
    }
}

/// In-memory store backend with authoritative server-side rules.
///
/// Unlike the client's advisory checks, `place_order` here re-validates
/// every line against current stock, decrements stock, consumes the cart,
/// and assigns the order id - the behaviors the client must never assume
/// locally.
#[derive(Default)]
pub struct ScriptedBackend {
    products: RwLock<BTreeMap<ProductId, Product>>,
    cart: RwLock<Vec<CartLine>>,
    orders: RwLock<Vec<Order>>,
    profile: RwLock<Option<UserProfile>>,
    role: RwLock<Role>,
    next_product_id: AtomicI64,
    next_order_id: AtomicI64,
    clock: AtomicI64,
    calls: Mutex<Vec<String>>,
    failing_ops: Mutex<HashSet<String>>,
}

impl ScriptedBackend {
    /// Seed a product directly, bypassing the admin surface.
    pub async fn seed_product(&self, product: Product) {
        self.next_product_id
            .fetch_max(product.id.as_i64(), Ordering::SeqCst);
        self.products.write().await.insert(product.id, product);
    }

    /// Overwrite a product's stock directly, simulating concurrent sales.
    pub async fn set_stock(&self, id: ProductId, stock: u32) {
        if let Some(product) = self.products.write().await.get_mut(&id) {
            product.stock_quantity = stock;
        }
    }

    /// Current server-side stock for a product.
    pub async fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.products
            .read()
            .await
            .get(&id)
            .map(|product| product.stock_quantity)
    }

    /// Seed the caller's cart directly.
    pub async fn seed_cart(&self, lines: Vec<CartLine>) {
        *self.cart.write().await = lines;
    }

    /// The server-side cart as it stands.
    pub async fn cart_snapshot(&self) -> Vec<CartLine> {
        self.cart.read().await.clone()
    }

    /// Set the caller's role.
    pub async fn set_role(&self, role: Role) {
        *self.role.write().await = role;
    }

    /// Set the id the next placed order will receive.
    pub fn set_next_order_id(&self, id: i64) {
        self.next_order_id.store(id - 1, Ordering::SeqCst);
    }

    /// Make the named operation fail with a 503 until cleared.
    pub async fn fail_op(&self, operation: &str) {
        self.failing_ops.lock().await.insert(operation.to_string());
    }

    /// Clear all injected failures.
    pub async fn clear_failures(&self) {
        self.failing_ops.lock().await.clear();
    }

    /// Names of all operations invoked so far, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, operation: &str) -> Result<(), BackendError> {
        self.calls.lock().await.push(operation.to_string());
        if self.failing_ops.lock().await.contains(operation) {
            return Err(BackendError::Status { status: 503 });
        }
        Ok(())
    }

    fn tick(&self) -> Timestamp {
        Timestamp::from_nanos(self.clock.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl BackendApi for ScriptedBackend {
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        self.record("listProducts").await?;
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        self.record("getProduct").await?;
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn create_product(&self, input: ProductInput) -> Result<ProductId, BackendError> {
        self.record("createProduct").await?;
        let id = ProductId::new(self.next_product_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.products.write().await.insert(
            id,
            Product {
                id,
                name: input.name,
                description: input.description,
                image_url: input.image_url,
                category: input.category,
                price: input.price,
                stock_quantity: input.stock_quantity,
            },
        );
        Ok(id)
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> Result<(), BackendError> {
        self.record("updateProduct").await?;
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("product {id}")))?;
        product.name = input.name;
        product.description = input.description;
        product.image_url = input.image_url;
        product.category = input.category;
        product.price = input.price;
        product.stock_quantity = input.stock_quantity;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        self.record("deleteProduct").await?;
        self.products.write().await.remove(&id);
        // Cart lines referencing the product are left orphaned; the client's
        // display policy has to tolerate them.
        Ok(())
    }

    async fn get_cart(&self) -> Result<Vec<CartLine>, BackendError> {
        self.record("getCart").await?;
        Ok(self.cart.read().await.clone())
    }

    async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<(), BackendError> {
        self.record("addToCart").await?;
        if !self.products.read().await.contains_key(&product_id) {
            return Err(BackendError::NotFound(format!("product {product_id}")));
        }
        let mut cart = self.cart.write().await;
        if let Some(line) = cart.iter_mut().find(|line| line.product_id == product_id) {
            line.quantity += quantity;
        } else {
            cart.push(CartLine {
                product_id,
                quantity,
            });
        }
        Ok(())
    }

    async fn update_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        self.record("updateCartItem").await?;
        let mut cart = self.cart.write().await;
        let line = cart
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or_else(|| BackendError::NotFound(format!("cart line {product_id}")))?;
        line.quantity = quantity;
        Ok(())
    }

    async fn remove_cart_item(&self, product_id: ProductId) -> Result<(), BackendError> {
        self.record("removeCartItem").await?;
        self.cart
            .write()
            .await
            .retain(|line| line.product_id != product_id);
        Ok(())
    }

    async fn place_order(&self) -> Result<OrderId, BackendError> {
        self.record("placeOrder").await?;
        let mut cart = self.cart.write().await;
        let mut products = self.products.write().await;

        if cart.is_empty() {
            return Err(BackendError::Rejected("cart is empty".to_string()));
        }

        // Authoritative stock check: the client's advisory bound may have
        // been evaluated against a stale catalog.
        let mut items = Vec::with_capacity(cart.len());
        for line in cart.iter() {
            let product = products.get(&line.product_id).ok_or_else(|| {
                BackendError::Rejected(format!("product {} no longer exists", line.product_id))
            })?;
            if line.quantity > product.stock_quantity {
                return Err(BackendError::Rejected(format!(
                    "insufficient stock for product {}",
                    line.product_id
                )));
            }
            items.push(OrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        for item in &items {
            if let Some(product) = products.get_mut(&item.product_id) {
                product.stock_quantity -= item.quantity;
            }
        }

        let total = items.iter().fold(Price::ZERO, |acc, item| {
            acc.plus(item.unit_price.times(item.quantity))
        });
        let id = OrderId::new(self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.orders.write().await.push(Order {
            id,
            items,
            total,
            status: OrderStatus::Pending,
            placed_at: self.tick(),
        });
        cart.clear();
        Ok(id)
    }

    async fn get_orders(&self) -> Result<Vec<Order>, BackendError> {
        self.record("getOrders").await?;
        Ok(self.orders.read().await.clone())
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, BackendError> {
        self.record("getCallerUserProfile").await?;
        Ok(self.profile.read().await.clone())
    }

    async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), BackendError> {
        self.record("saveCallerUserProfile").await?;
        *self.profile.write().await = Some(profile);
        Ok(())
    }

    async fn get_caller_user_role(&self) -> Result<Role, BackendError> {
        self.record("getCallerUserRole").await?;
        Ok(*self.role.read().await)
    }

    async fn is_caller_admin(&self) -> Result<bool, BackendError> {
        self.record("isCallerAdmin").await?;
        Ok(self.role.read().await.can_manage_catalog())
    }
}

/// One wired-up client session against a scripted backend.
pub struct TestStore {
    /// The scripted backend, for seeding and assertions.
    pub backend: Arc<ScriptedBackend>,
    /// The identity seam, for sign-in toggling.
    pub identity: Arc<SessionIdentity>,
    /// The client under test.
    pub store: StoreState,
}

impl TestStore {
    /// A signed-in session with the given role.
    pub async fn signed_in(role: Role) -> Self {
        let test_store = Self::guest();
        test_store.identity.sign_in();
        test_store.backend.set_role(role).await;
        test_store
    }

    /// A signed-out session.
    #[must_use]
    pub fn guest() -> Self {
        let backend = Arc::new(ScriptedBackend::default());
        let identity = Arc::new(SessionIdentity::new());
        let store = StoreState::new(backend.clone(), identity.clone());
        Self {
            backend,
            identity,
            store,
        }
    }
}
