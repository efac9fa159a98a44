//! External collaborator traits and their implementations.

pub mod catalog;
pub mod http_catalog;

pub use catalog::{CatalogClient, CatalogError, InMemoryCatalog};
pub use http_catalog::{DEFAULT_CATALOG_TIMEOUT, HttpCatalog};
