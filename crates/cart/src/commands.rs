//! Cart command payloads.

use common::ProductId;

/// Request to set an item's amount to an absolute value.
///
/// The amount is signed because callers pass through whatever the user
/// typed; non-positive values are rejected by the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateItemAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateItemAmount {
    /// Creates a new UpdateItemAmount command.
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}
