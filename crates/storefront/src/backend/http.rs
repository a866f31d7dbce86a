//! HTTP/JSON implementation of the store backend protocol.
//!
//! Operations are JSON POSTs to `{base_url}/api/{operation}`. Every call
//! carries a fresh request id header so backend logs can be correlated with
//! client traces. The transport collaborator owns retry and timeout policy;
//! this layer never retries.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use wildroot_core::{OrderId, ProductId, Role};

use crate::config::BackendConfig;
use crate::types::{CartLine, Order, Product, UserProfile};

use super::wire::{
    CartItemParams, EmptyParams, ProductIdParams, ProductParams, UpdateProductParams,
    WireCartLine, WireOrder, WireProduct, WireProfile, parse_role,
};
use super::{BackendApi, BackendError, ProductInput};

/// HTTP client for the store backend.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: url::Url,
    api_token: Option<secrecy::SecretString>,
}

impl HttpBackend {
    /// Create a new backend client from configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// Execute one backend operation.
    async fn call<P, R>(&self, operation: &str, params: &P) -> Result<R, BackendError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(&format!("api/{operation}"))
            .map_err(|_| BackendError::Rejected(format!("invalid operation path: {operation}")))?;

        let request_id = Uuid::new_v4();
        let mut request = self
            .client
            .post(url)
            .header("X-Request-Id", request_id.to_string())
            .json(params);

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        match status {
            reqwest::StatusCode::UNAUTHORIZED => return Err(BackendError::Unauthenticated),
            reqwest::StatusCode::FORBIDDEN => return Err(BackendError::Unauthorized),
            reqwest::StatusCode::NOT_FOUND => {
                return Err(BackendError::NotFound(operation.to_string()));
            }
            _ => {}
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(BackendError::Rejected(extract_error_message(&body)));
        }

        if !status.is_success() {
            tracing::error!(
                %operation,
                %request_id,
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    %operation,
                    %request_id,
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse backend response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }
}

/// Pull a human-readable message out of a rejection body.
///
/// The backend sends `{"error": "..."}` envelopes; anything else is passed
/// through truncated.
fn extract_error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorEnvelope {
        error: String,
    }

    serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| body.chars().take(200).collect(),
        |envelope| envelope.error,
    )
}

#[async_trait]
impl BackendApi for HttpBackend {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let wire: Vec<WireProduct> = self.call("listProducts", &EmptyParams {}).await?;
        Ok(wire.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        let wire: Option<WireProduct> = self
            .call(
                "getProduct",
                &ProductIdParams {
                    product_id: id.as_i64(),
                },
            )
            .await?;
        Ok(wire.map(Product::from))
    }

    #[instrument(skip(self, input))]
    async fn create_product(&self, input: ProductInput) -> Result<ProductId, BackendError> {
        let id: i64 = self
            .call("createProduct", &ProductParams::from(input))
            .await?;
        Ok(ProductId::new(id))
    }

    #[instrument(skip(self, input), fields(product_id = %id))]
    async fn update_product(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> Result<(), BackendError> {
        self.call(
            "updateProduct",
            &UpdateProductParams {
                product_id: id.as_i64(),
                fields: ProductParams::from(input),
            },
        )
        .await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        self.call(
            "deleteProduct",
            &ProductIdParams {
                product_id: id.as_i64(),
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn get_cart(&self) -> Result<Vec<CartLine>, BackendError> {
        let wire: Vec<WireCartLine> = self.call("getCart", &EmptyParams {}).await?;
        Ok(wire.into_iter().map(CartLine::from).collect())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<(), BackendError> {
        self.call(
            "addToCart",
            &CartItemParams {
                product_id: product_id.as_i64(),
                quantity,
            },
        )
        .await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn update_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        self.call(
            "updateCartItem",
            &CartItemParams {
                product_id: product_id.as_i64(),
                quantity,
            },
        )
        .await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_cart_item(&self, product_id: ProductId) -> Result<(), BackendError> {
        self.call(
            "removeCartItem",
            &ProductIdParams {
                product_id: product_id.as_i64(),
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn place_order(&self) -> Result<OrderId, BackendError> {
        let id: i64 = self.call("placeOrder", &EmptyParams {}).await?;
        Ok(OrderId::new(id))
    }

    #[instrument(skip(self))]
    async fn get_orders(&self) -> Result<Vec<Order>, BackendError> {
        let wire: Vec<WireOrder> = self.call("getOrders", &EmptyParams {}).await?;
        Ok(wire.into_iter().map(Order::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, BackendError> {
        let wire: Option<WireProfile> = self
            .call("getCallerUserProfile", &EmptyParams {})
            .await?;
        Ok(wire.map(UserProfile::from))
    }

    #[instrument(skip(self, profile))]
    async fn save_caller_user_profile(&self, profile: UserProfile) -> Result<(), BackendError> {
        self.call("saveCallerUserProfile", &WireProfile::from(profile))
            .await
    }

    #[instrument(skip(self))]
    async fn get_caller_user_role(&self) -> Result<Role, BackendError> {
        let role: String = self.call("getCallerUserRole", &EmptyParams {}).await?;
        Ok(parse_role(&role))
    }

    #[instrument(skip(self))]
    async fn is_caller_admin(&self) -> Result<bool, BackendError> {
        self.call("isCallerAdmin", &EmptyParams {}).await
    }
}
