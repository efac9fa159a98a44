//! HTTP surface with observability for the storefront cart.
//!
//! Exposes the cart mutations as REST endpoints over a single cart session,
//! with structured logging (tracing) and Prometheus metrics.

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use cart::{CartService, CartStore, TracingNotificationSink};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use catalog::AppCatalog;
use error::StartupError;
use routes::cart::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CartStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/cart", get(routes::cart::get::<S>))
        .route("/cart/items", post(routes::cart::add_item::<S>))
        .route(
            "/cart/items/{product_id}",
            put(routes::cart::set_amount::<S>).delete(routes::cart::remove_item::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state, resuming the cart stored under `storage_key`.
pub async fn create_state<S: CartStore + 'static>(
    catalog: AppCatalog,
    store: S,
    storage_key: &str,
) -> Result<Arc<AppState<S>>, StartupError> {
    let cart = CartService::load(
        catalog.clone(),
        store,
        TracingNotificationSink,
        storage_key,
    )
    .await?;

    Ok(Arc::new(AppState { cart, catalog }))
}
