use async_trait::async_trait;

use crate::Result;

/// Namespace key under which the storefront keeps its cart.
pub const DEFAULT_STORAGE_KEY: &str = "storefront:cart";

/// Key/value persistence surface for the serialized cart.
///
/// Values are opaque serialized documents; the store never interprets them
/// beyond what its backend requires. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns None if nothing has been written under that key yet.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// The write is atomic: on error the previous value is still in place.
    async fn write(&self, key: &str, value: String) -> Result<()>;
}
