//! Book Listing server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_listing::books::{ContentStore, InMemoryBookStore};
use book_listing::listing::{install_item_renderer, ItemRenderer};
use book_listing::{create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the book listing server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Install the item renderer and load the book store
/// 4. Start the expired listing sweep
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_listing=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting book listing server");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        max_cache_entries = config.max_cache_entries,
        cleanup_interval = config.cleanup_interval,
        listing_path = %config.listing_path,
        "configuration loaded"
    );
    if config.nonce_secret.is_none() {
        warn!("NONCE_SECRET not set, load-more tokens will not survive a restart");
    }

    match ItemRenderer::new(config.date_format.clone()) {
        Ok(renderer) => install_item_renderer(renderer)?,
        Err(e) => warn!(error = %e, "falling back to the default date format"),
    }

    let store: Arc<dyn ContentStore> = match &config.books_seed_path {
        Some(path) => {
            let store = InMemoryBookStore::from_seed_file(path)
                .await
                .with_context(|| format!("loading books from {}", path.display()))?;
            Arc::new(store)
        }
        None => {
            info!("no seed file configured, starting with an empty book store");
            Arc::new(InMemoryBookStore::new())
        }
    };

    let state = AppState::from_config(&config, store)?;
    let cleanup_handle = spawn_cleanup_task(state.cache_store(), config.cleanup_interval);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the sweep task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
    warn!("Expired listing sweep aborted");
}
