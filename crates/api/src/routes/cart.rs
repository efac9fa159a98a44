//! Cart read and mutation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use cart::{
    CartItem, CartOperation, CartService, CartState, CartStore, Money, ProductId,
    TracingNotificationSink, UpdateItemAmount,
};
use serde::{Deserialize, Serialize};

use crate::catalog::AppCatalog;
use crate::error::ApiError;

/// Cart service as wired by the server.
pub type AppCartService<S> = CartService<AppCatalog, S, TracingNotificationSink>;

/// Shared application state accessible from all handlers.
pub struct AppState<S: CartStore> {
    pub cart: AppCartService<S>,
    pub catalog: AppCatalog,
}

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: u64,
}

#[derive(Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartItemResponse {
    #[serde(flatten)]
    pub item: CartItem,
    pub formatted_price: String,
    pub formatted_subtotal: String,
}

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub item_count: usize,
    pub total_units: u64,
    pub subtotal: Money,
    pub formatted_subtotal: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        let price = item.product.price;
        let subtotal = Money::from_cents(price.cents() * i64::from(item.amount));
        Self {
            formatted_price: price.to_string(),
            formatted_subtotal: subtotal.to_string(),
            item,
        }
    }
}

impl From<CartState> for CartResponse {
    fn from(cart: CartState) -> Self {
        let subtotal = cart.subtotal();
        Self {
            item_count: cart.len(),
            total_units: cart.total_units(),
            subtotal,
            formatted_subtotal: subtotal.to_string(),
            items: cart.items().iter().cloned().map(Into::into).collect(),
        }
    }
}

// -- Handlers --

/// GET /cart — current cart contents.
#[tracing::instrument(skip(state))]
pub async fn get<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<CartResponse> {
    Json(state.cart.cart().await.into())
}

/// POST /cart/items — add one unit of a product.
#[tracing::instrument(skip(state, req))]
pub async fn add_item<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart
        .add_item(ProductId::new(req.product_id))
        .await
        .map_err(ApiError::cart(CartOperation::AddItem))?;

    Ok(Json(cart.into()))
}

/// PUT /cart/items/:product_id — set an item's amount.
#[tracing::instrument(skip(state, req))]
pub async fn set_amount<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(product_id): Path<String>,
    Json(req): Json<UpdateAmountRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let product_id = parse_product_id(&product_id)?;
    let cart = state
        .cart
        .set_item_amount(UpdateItemAmount::new(product_id, req.amount))
        .await
        .map_err(ApiError::cart(CartOperation::SetItemAmount))?;

    Ok(Json(cart.into()))
}

/// DELETE /cart/items/:product_id — remove an item.
#[tracing::instrument(skip(state))]
pub async fn remove_item<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let product_id = parse_product_id(&product_id)?;
    let cart = state
        .cart
        .remove_item(product_id)
        .await
        .map_err(ApiError::cart(CartOperation::RemoveItem))?;

    Ok(Json(cart.into()))
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid product id '{raw}': {e}")))
}
