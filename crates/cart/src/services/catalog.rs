//! Catalog/inventory client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use common::ProductId;
use serde::Deserialize;
use thiserror::Error;

use crate::product::{Product, Stock};

/// Errors returned by a catalog client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("No stock record for product {0}")]
    StockNotFound(ProductId),

    /// The service could not be reached or answered with a fault.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a body that is not the expected record.
    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),

    #[error("Invalid catalog url: {0}")]
    InvalidUrl(String),
}

/// Read-only access to product records and current stock.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the units currently available for `product_id`.
    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError>;

    /// Fetches the descriptive record for `product_id`.
    async fn fetch_product(&self, product_id: ProductId) -> Result<Product, CatalogError>;
}

/// Catalog document in the shape served by the storefront's mock API:
/// a product list plus a separate stock list keyed by product id.
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<Product>,
    stock: Vec<Stock>,
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
    unavailable: bool,
    stock_requests: usize,
    product_requests: usize,
}

/// In-memory catalog for testing and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a `{ "products": [...], "stock": [...] }` document.
    pub fn from_fixture(json: &str) -> Result<Self, serde_json::Error> {
        let fixture: CatalogFixture = serde_json::from_str(json)?;
        let catalog = Self::new();
        {
            let mut state = catalog.state();
            state.products = fixture.products.into_iter().map(|p| (p.id, p)).collect();
            state.stock = fixture.stock.into_iter().map(|s| (s.id, s.amount)).collect();
        }
        Ok(catalog)
    }

    fn state(&self) -> RwLockWriteGuard<'_, InMemoryCatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `product` with `stock` units available.
    pub fn add_product(&self, product: Product, stock: u32) {
        let mut state = self.state();
        state.stock.insert(product.id, stock);
        state.products.insert(product.id, product);
    }

    /// Sets the units available for `product_id`.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        self.state().stock.insert(product_id, amount);
    }

    /// Configures every following request to fail as if the service were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Returns the number of stock requests served or refused.
    pub fn stock_requests(&self) -> usize {
        self.state().stock_requests
    }

    /// Returns the number of product requests served or refused.
    pub fn product_requests(&self) -> usize {
        self.state().product_requests
    }

    /// Returns the number of products in the catalog.
    pub fn product_count(&self) -> usize {
        self.state().products.len()
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        let mut state = self.state();
        state.stock_requests += 1;

        if state.unavailable {
            return Err(CatalogError::Unavailable("connection refused".to_string()));
        }

        state
            .stock
            .get(&product_id)
            .map(|&amount| Stock::new(product_id, amount))
            .ok_or(CatalogError::StockNotFound(product_id))
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        let mut state = self.state();
        state.product_requests += 1;

        if state.unavailable {
            return Err(CatalogError::Unavailable("connection refused".to_string()));
        }

        state
            .products
            .get(&product_id)
            .cloned()
            .ok_or(CatalogError::ProductNotFound(product_id))
    }
}
