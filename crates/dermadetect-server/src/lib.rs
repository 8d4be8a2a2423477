//! HTTP front end: static pages plus the `/detect` image upload endpoint.

mod error;
mod handlers;
pub mod pages;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use dermadetect_ai::ClassifierProvider;
use tracing::info;

pub use error::ApiError;
pub use handlers::FILE_FIELD;

/// Default upload cap: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Listener and request limits.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn ClassifierProvider>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn ClassifierProvider>) -> Self {
        Self { classifier }
    }
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/signin", get(handlers::signin))
        .route("/signup", get(handlers::signup))
        .route(
            "/dashboard",
            get(handlers::dashboard).post(handlers::dashboard),
        )
        .route(
            "/detect",
            get(handlers::detect_form).post(handlers::detect_upload),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig, classifier: Arc<dyn ClassifierProvider>) -> anyhow::Result<()> {
    let app = router(AppState::new(classifier), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(addr = %config.addr, max_upload_bytes = config.max_upload_bytes, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
