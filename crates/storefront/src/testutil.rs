//! Shared in-memory backend for unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify, RwLock};

use wildroot_core::{OrderId, OrderStatus, Price, ProductId, Role, Timestamp};

use crate::backend::{BackendApi, BackendError, ProductInput};
use crate::types::{CartLine, Order, OrderItem, Product, UserProfile};

/// Build a test product in the "Garden" category.
pub(crate) fn product(id: i64, name: &str, price: u64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: String::new(),
        image_url: String::new(),
        category: "Garden".to_string(),
        price: Price::from_minor_units(price),
        stock_quantity: stock,
    }
}

/// In-memory `BackendApi` with call recording and per-operation failure
/// injection.
#[derive(Default)]
pub(crate) struct FakeBackend {
    products: RwLock<BTreeMap<ProductId, Product>>,
    cart: RwLock<Vec<CartLine>>,
    orders: RwLock<Vec<Order>>,
    profile: RwLock<Option<UserProfile>>,
    role: RwLock<Role>,
    next_order_id: AtomicI64,
    calls: Mutex<Vec<String>>,
    failing_ops: Mutex<HashSet<String>>,
    paused_ops: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeBackend {
    pub async fn put_product(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    pub async fn set_cart(&self, lines: Vec<CartLine>) {
        *self.cart.write().await = lines;
    }

    pub async fn set_role(&self, role: Role) {
        *self.role.write().await = role;
    }

    /// Make the named operation fail with a 503 until cleared.
    pub async fn fail_op(&self, operation: &str) {
        self.failing_ops.lock().await.insert(operation.to_string());
    }

    pub async fn clear_failures(&self) {
        self.failing_ops.lock().await.clear();
    }

    /// Names of all operations invoked so far, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Set the id the next placed order will receive.
    pub fn set_next_order_id(&self, id: i64) {
        self.next_order_id.store(id - 1, Ordering::SeqCst);
    }

    /// Hold the named operation until the returned `Notify` is signalled.
    pub async fn pause_op(&self, operation: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.paused_ops
            .lock()
            .await
            .insert(operation.to_string(), Arc::clone(&notify));
        notify
    }

    async fn record(&self, operation: &str) -> Result<(), BackendError> {
        self.calls.lock().await.push(operation.to_string());
        let pause = self.paused_ops.lock().await.get(operation).cloned();
        if let Some(notify) = pause {
            notify.notified().await;
        }
        if self.failing_ops.lock().await.contains(operation) {
            return Err(BackendError::Status { status: 503 });
        }
        Ok(())
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
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
        let id = ProductId::new(self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1000);
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
        Ok(())
    }

    async fn get_cart(&self) -> Result<Vec<CartLine>, BackendError> {
        self.record("getCart").await?;
        Ok(self.cart.read().await.clone())
    }

    async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<(), BackendError> {
        self.record("addToCart").await?;
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
        let products = self.products.read().await;

        let items: Vec<OrderItem> = cart
            .iter()
            .filter_map(|line| {
                products.get(&line.product_id).map(|product| OrderItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: product.price,
                })
            })
            .collect();
        let total = items
            .iter()
            .fold(Price::ZERO, |acc, item| {
                acc.plus(item.unit_price.times(item.quantity))
            });

        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.orders.write().await.push(Order {
            id: OrderId::new(id),
            items,
            total,
            status: OrderStatus::Pending,
            placed_at: Timestamp::from_nanos(id),
        });
        cart.clear();
        Ok(OrderId::new(id))
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
