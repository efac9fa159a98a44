//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use cart::DEFAULT_CATALOG_TIMEOUT;
use cart_store::DEFAULT_STORAGE_KEY;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3333`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — Postgres URL for the cart store (default: in-memory store)
/// - `CART_STORAGE_KEY` — key the cart is persisted under (default: [`DEFAULT_STORAGE_KEY`])
/// - `CATALOG_URL` — base URL of the catalog API (default: unset, fixture catalog)
/// - `CATALOG_TIMEOUT_MS` — catalog request timeout (default: 5000)
/// - `CATALOG_FIXTURE` — catalog JSON document used without `CATALOG_URL`
///   (default: built-in demo catalog)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub storage_key: String,
    pub catalog_url: Option<String>,
    pub catalog_timeout: Duration,
    pub catalog_fixture: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            storage_key: lookup("CART_STORAGE_KEY")
                .filter(|key| !key.is_empty())
                .unwrap_or(defaults.storage_key),
            catalog_url: lookup("CATALOG_URL").filter(|url| !url.is_empty()),
            catalog_timeout: lookup("CATALOG_TIMEOUT_MS")
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.catalog_timeout),
            catalog_fixture: lookup("CATALOG_FIXTURE").map(PathBuf::from),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3333,
            log_level: "info".to_string(),
            database_url: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            catalog_url: None,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            catalog_fixture: None,
        }
    }
}
