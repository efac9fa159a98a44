//! Cart error types.

use cart_store::StoreError;
use common::ProductId;
use thiserror::Error;

use crate::services::CatalogError;

/// Errors a cart mutation can end in.
///
/// Every variant leaves both the in-memory cart and its durable copy
/// untouched.
#[derive(Debug, Error)]
pub enum CartError {
    /// The catalog has fewer units than the cart would hold after the mutation.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// A non-positive target amount was requested.
    #[error("Invalid amount: {amount} (must be greater than 0)")]
    InvalidAmount { amount: i64 },

    /// The product is not in the cart.
    #[error("Item not found in cart: {product_id}")]
    ItemNotFound { product_id: ProductId },

    /// A collaborator call failed.
    #[error("Transport failure: {0}")]
    TransportFailure(#[from] TransportError),
}

/// Faults raised while talking to the catalog or the durable store.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Catalog or inventory lookup failed, including unknown products.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Reading or writing the durable cart entry failed.
    #[error("Cart store error: {0}")]
    Store(#[from] StoreError),

    /// The cart could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CatalogError> for CartError {
    fn from(e: CatalogError) -> Self {
        CartError::TransportFailure(e.into())
    }
}

impl From<StoreError> for CartError {
    fn from(e: StoreError) -> Self {
        CartError::TransportFailure(e.into())
    }
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::TransportFailure(e.into())
    }
}

impl CartError {
    /// Returns true for outcomes the user can resolve by changing the request.
    pub fn is_validation(&self) -> bool {
        !matches!(self, CartError::TransportFailure(_))
    }
}
