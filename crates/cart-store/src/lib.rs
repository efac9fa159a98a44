pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;
pub use store::{CartStore, DEFAULT_STORAGE_KEY};
