//! Shared value types for the storefront cart crates.

pub mod types;

pub use types::{Money, ProductId};
