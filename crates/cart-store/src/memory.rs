use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CartStore, Result, StoreError};

/// In-memory cart store for testing and single-process deployments.
///
/// Clones share the same entries, so a test can keep a handle to inspect what
/// the cart service persisted.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
    fail_on_read: Arc<AtomicBool>,
    fail_on_write: Arc<AtomicBool>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(RwLock::new(entries)),
            ..Self::default()
        }
    }

    /// Configures every following read to fail.
    pub fn set_fail_on_read(&self, fail: bool) {
        self.fail_on_read.store(fail, Ordering::SeqCst);
    }

    /// Configures every following write to fail.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.fail_on_write.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the raw value under `key` without going through the trait.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        if self.fail_on_read.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read refused".to_string()));
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        if self.fail_on_write.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write refused".to_string()));
        }
        self.entries.write().await.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
