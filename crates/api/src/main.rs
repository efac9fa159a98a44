//! API server entry point.

use std::sync::Arc;

use api::AppCatalog;
use api::config::Config;
use api::error::StartupError;
use api::routes::cart::AppState;
use cart::CartStore;
use cart_store::{InMemoryCartStore, PostgresCartStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<S: CartStore + 'static>(
    config: &Config,
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Result<(), StartupError> {
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the catalog
    let catalog = AppCatalog::from_config(&config)?;
    match &catalog {
        AppCatalog::Remote(remote) => {
            tracing::info!(url = remote.base_url(), "using remote catalog");
        }
        AppCatalog::Fixture(fixture) => {
            tracing::info!(products = fixture.product_count(), "fixture catalog loaded");
        }
    }

    // 4. Pick the cart store, resume the cart, and serve
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PostgresCartStore::connect(url).await?;
            store.run_migrations().await?;
            let state = api::create_state(catalog, store, &config.storage_key).await?;
            serve(&config, state, metrics_handle).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, cart will not survive restarts");
            let state =
                api::create_state(catalog, InMemoryCartStore::new(), &config.storage_key).await?;
            serve(&config, state, metrics_handle).await
        }
    }
}
