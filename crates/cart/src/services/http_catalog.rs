//! Catalog client for the storefront's HTTP catalog API.
//!
//! The API serves `GET stock/{id}` as `{ "id", "amount" }` and
//! `GET products/{id}` as `{ "id", "title", "price", "image" }`, with prices
//! in cents.

use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::catalog::{CatalogClient, CatalogError};
use crate::product::{Product, Stock};

/// Request timeout used when none is configured.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(5);

/// Catalog client that queries live stock and product records over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalog {
    /// Creates a client for the catalog rooted at `base_url`.
    ///
    /// A base URL with a path prefix (`http://host/api`) resolves requests
    /// below that prefix.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| CatalogError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(format!("http client setup failed: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Fetches and decodes `path`; a 404 is `Ok(None)`.
    #[tracing::instrument(name = "catalog_http_get", skip(self))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, CatalogError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::InvalidUrl(format!("{path}: {e}")))?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("request failed url={url}: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.bytes().await.map_err(|e| {
                    CatalogError::Unavailable(format!("read body failed url={url}: {e}"))
                })?;
                serde_json::from_slice(&body)
                    .map(Some)
                    .map_err(|e| CatalogError::InvalidResponse(format!("url={url}: {e}")))
            }
            status => {
                tracing::warn!(%url, %status, "catalog request failed");
                Err(CatalogError::Unavailable(format!("status={status} url={url}")))
            }
        }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        self.get(&format!("stock/{product_id}"))
            .await?
            .ok_or(CatalogError::StockNotFound(product_id))
    }

    async fn fetch_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        self.get(&format!("products/{product_id}"))
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))
    }
}
