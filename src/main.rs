//! WorkIn Metrics - dashboard metrics service with a persisted TTL cache

mod api;
mod cache;
mod clock;
mod config;
mod documents;
mod error;
mod metrics;
mod models;
mod storage;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::MetricsCache;
use config::Config;
use documents::InMemoryDocumentStore;
use storage::FileBackend;
use tasks::spawn_cleanup_task;

/// Main entry point for the metrics service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the file-backed cache storage and run the legacy-slot migration
/// 4. Seed the document store if a seed file is configured
/// 5. Start the background expiry-sweep task
/// 6. Create the Axum router and serve, with graceful shutdown on
///    SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workin_metrics=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting WorkIn metrics service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: storage_dir={}, port={}, cleanup_interval={}s",
        config.storage_dir.display(),
        config.server_port,
        config.cleanup_interval
    );

    let backend = FileBackend::new(&config.storage_dir)
        .with_context(|| format!("opening storage dir {}", config.storage_dir.display()))?;
    let mut metrics_cache = MetricsCache::with_system_clock(Box::new(backend));

    let migrated = metrics_cache.migrate_legacy_slots();
    if migrated > 0 {
        info!("Migrated {} legacy cache slots", migrated);
    }

    let documents = Arc::new(load_documents(&config)?);
    let state = AppState::new(metrics_cache, documents);
    info!("Metrics cache initialized");

    let cleanup_handle = spawn_cleanup_task(state.cache.clone(), config.cleanup_interval);
    info!("Background expiry sweep started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the document store, seeded from `SEED_FILE` when configured.
fn load_documents(config: &Config) -> anyhow::Result<InMemoryDocumentStore> {
    let Some(path) = &config.seed_file else {
        return Ok(InMemoryDocumentStore::new());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let seed = serde_json::from_str(&text)
        .with_context(|| format!("parsing seed file {}", path.display()))?;
    info!("Document store seeded from {}", path.display());
    Ok(InMemoryDocumentStore::from_seed(seed))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Sweep task aborted");
}
