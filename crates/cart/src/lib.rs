//! Shopping cart state for the storefront.
//!
//! This crate provides the cart state container and the collaborators it
//! talks to:
//! - `CatalogClient` for product records and available stock
//! - `CartStore` (re-exported from `cart-store`) for the durable copy
//! - `NotificationSink` for user-facing failure messages
//!
//! Every mutation is validated against fresh stock before anything is
//! committed. A committed cart is published to memory and then persisted.

pub mod commands;
pub mod error;
pub mod notification;
pub mod product;
pub mod service;
pub mod services;
pub mod state;

pub use cart_store::{CartStore, DEFAULT_STORAGE_KEY, InMemoryCartStore, StoreError};
pub use commands::UpdateItemAmount;
pub use common::{Money, ProductId};
pub use error::{CartError, TransportError};
pub use notification::{
    CartOperation, InMemoryNotificationSink, NotificationSink, TracingNotificationSink,
    notification_message,
};
pub use product::{Product, Stock};
pub use service::{CartHandle, CartService};
pub use services::{
    CatalogClient, CatalogError, DEFAULT_CATALOG_TIMEOUT, HttpCatalog, InMemoryCatalog,
};
pub use state::{CartItem, CartState, CartStateError};
