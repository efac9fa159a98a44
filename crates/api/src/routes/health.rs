//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use cart::CartStore;
use serde::Serialize;

use super::cart::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog: &'static str,
    pub catalog_products: Option<usize>,
    pub cart_items: usize,
}

/// GET /health — liveness plus a summary of what the server holds.
pub async fn check<S: CartStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        catalog: state.catalog.source(),
        catalog_products: state.catalog.product_count(),
        cart_items: state.cart.item_count().await,
    })
}
