//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::{CartError, CartOperation, CatalogError, StoreError, notification_message};
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// A cart mutation was rejected.
    Cart {
        operation: CartOperation,
        error: CartError,
    },
}

impl ApiError {
    /// Wraps a rejected mutation together with the operation that produced it.
    pub fn cart(operation: CartOperation) -> impl FnOnce(CartError) -> Self {
        move |error| ApiError::Cart { operation, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::Cart { operation, error } => {
                if !error.is_validation() {
                    tracing::error!(%operation, %error, "cart collaborator failed");
                }
                let status = cart_error_status(&error);
                let body = serde_json::json!({
                    "error": notification_message(operation, &error),
                    "detail": error.to_string(),
                });
                (status, body)
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_status(err: &CartError) -> StatusCode {
    match err {
        CartError::InsufficientStock { .. } => StatusCode::CONFLICT,
        CartError::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
        CartError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
        CartError::TransportFailure(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to load cart: {0}")]
    Cart(#[from] CartError),
}
