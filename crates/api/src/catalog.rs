//! Catalog selection for the server.

use std::path::Path;

use async_trait::async_trait;
use cart::{
    CatalogClient, CatalogError, HttpCatalog, InMemoryCatalog, Product, ProductId, Stock,
};

use crate::config::Config;
use crate::error::StartupError;

/// Demo catalog used when neither a catalog URL nor a fixture path is configured.
pub const DEMO_CATALOG: &str = include_str!("../fixtures/catalog.json");

/// The catalog the server validates mutations against.
#[derive(Debug, Clone)]
pub enum AppCatalog {
    /// Products and stock loaded once from a JSON document.
    Fixture(InMemoryCatalog),
    /// Live stock and products served by the catalog API.
    Remote(HttpCatalog),
}

impl AppCatalog {
    /// Picks the catalog from configuration: `CATALOG_URL` wins, then
    /// `CATALOG_FIXTURE`, then the built-in demo catalog.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        match config.catalog_url.as_deref() {
            Some(url) => Ok(Self::Remote(HttpCatalog::new(url, config.catalog_timeout)?)),
            None => Self::from_fixture(config.catalog_fixture.as_deref()),
        }
    }

    /// Loads a fixture catalog from `path`, or the demo catalog if no path is given.
    pub fn from_fixture(path: Option<&Path>) -> Result<Self, StartupError> {
        let document = match path {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEMO_CATALOG.to_string(),
        };
        Ok(Self::Fixture(InMemoryCatalog::from_fixture(&document)?))
    }

    /// Returns `"fixture"` or `"remote"`.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Fixture(_) => "fixture",
            Self::Remote(_) => "remote",
        }
    }

    /// Returns the number of known products; only a fixture catalog knows it.
    pub fn product_count(&self) -> Option<usize> {
        match self {
            Self::Fixture(catalog) => Some(catalog.product_count()),
            Self::Remote(_) => None,
        }
    }
}

#[async_trait]
impl CatalogClient for AppCatalog {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        match self {
            Self::Fixture(catalog) => catalog.fetch_stock(product_id).await,
            Self::Remote(catalog) => catalog.fetch_stock(product_id).await,
        }
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        match self {
            Self::Fixture(catalog) => catalog.fetch_product(product_id).await,
            Self::Remote(catalog) => catalog.fetch_product(product_id).await,
        }
    }
}
