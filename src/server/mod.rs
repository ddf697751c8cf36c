//! Recipe HTTP server
//!
//! Maps `/api/recipes` onto [`RecipeStore`] operations and renders results
//! as JSON. Store calls are blocking file I/O and run on tokio's blocking
//! pool; the store's own write lock keeps mutations serialized.
//!
//! Also serves an optional static front-end directory at `/`.

pub mod config;
mod handlers;
mod routes;

pub use config::ServiceConfig;
pub use routes::create_router;

use crate::store::{RecipeStore, StoreConfig};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
    /// Recipe collection settings
    pub store: StoreConfig,
    /// Directory with the browser front-end
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            store: StoreConfig::default(),
            static_dir: None,
        }
    }
}

/// Shared server state
pub struct ServerState {
    pub config: ServerConfig,
    pub store: Arc<RecipeStore>,
}

impl ServerState {
    /// Open the recipe collection for serving.
    pub fn new(config: ServerConfig) -> crate::Result<Self> {
        let store = RecipeStore::open(config.store.clone())?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Serve an already opened store.
    pub fn with_store(config: ServerConfig, store: Arc<RecipeStore>) -> Self {
        Self { config, store }
    }
}

/// Start the recipe server
pub async fn run_server(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting recipe server on {}", config.bind_addr);
    tracing::info!("Collection: {:?}", config.store.path);
    if let Some(ref dir) = config.static_dir {
        tracing::info!("Front-end: {:?}", dir);
    }

    let state = ServerState::new(config.clone()).with_context(|| {
        format!("Failed to open recipe collection {}", config.store.path.display())
    })?;
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Open http://{} in your browser", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Recipe server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
