//! Catalog records as the cart sees them.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A product record fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display title.
    pub title: String,

    /// Unit price in cents.
    pub price: Money,

    /// Image reference (URL or asset path).
    pub image: String,
}

impl Product {
    /// Creates a new product record.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Money,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
        }
    }
}

/// Units of a product currently available for purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }
}
