//! Cart items, the cart sequence, and its durable document format.

use std::collections::HashSet;

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;

/// A product in the cart together with the number of units requested.
///
/// Serialized flat: the product fields and `amount` share one JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,

    /// Units requested, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    /// Returns the product identifier.
    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Reasons a decoded item list cannot be used as a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartStateError {
    #[error("Duplicate cart entry for product {0}")]
    DuplicateItem(ProductId),

    #[error("Cart entry for product {0} has zero amount")]
    ZeroAmount(ProductId),
}

/// Ordered cart contents, unique by product id.
///
/// Items keep the order in which they were first added. Mutating helpers
/// never touch `self`; they return the next state, so a snapshot handed out
/// earlier is never observed half-updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the items in cart order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the position of the item for `product_id`.
    pub fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == product_id)
    }

    /// Returns the item for `product_id`.
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Returns the requested amount for `product_id`, or 0 if it is not in the cart.
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.amount)
    }

    /// Returns the total number of units across all items.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Returns the sum of price times amount over all items.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(
            self.items
                .iter()
                .map(|item| item.product.price.cents() * i64::from(item.amount))
                .sum(),
        )
    }

    /// Returns a copy with `product` appended at amount 1.
    pub(crate) fn with_appended(&self, product: Product) -> Self {
        let mut items = self.items.clone();
        items.push(CartItem::new(product, 1));
        Self { items }
    }

    /// Returns a copy with the item at `index` set to `amount`.
    pub(crate) fn with_amount(&self, index: usize, amount: u32) -> Self {
        let mut items = self.items.clone();
        if let Some(item) = items.get_mut(index) {
            item.amount = amount;
        }
        Self { items }
    }

    /// Returns a copy without the item at `index`.
    pub(crate) fn without(&self, index: usize) -> Self {
        let mut items = self.items.clone();
        if index < items.len() {
            items.remove(index);
        }
        Self { items }
    }

    /// Serializes the cart to its durable JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a durable JSON document.
    ///
    /// Fails on malformed JSON, duplicate product ids, or zero amounts.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl TryFrom<Vec<CartItem>> for CartState {
    type Error = CartStateError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(CartStateError::ZeroAmount(item.id()));
            }
            if !seen.insert(item.id()) {
                return Err(CartStateError::DuplicateItem(item.id()));
            }
        }
        Ok(Self { items })
    }
}

impl From<CartState> for Vec<CartItem> {
    fn from(state: CartState) -> Self {
        state.items
    }
}
