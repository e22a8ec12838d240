//! HTTP server.
//!
//! Shared state is an `Arc<AppState>`; the router is built by
//! [`create_router`]. The server shuts down gracefully on Ctrl-C.

pub mod envelope;
mod handlers;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;

pub use routes::create_router;

use crate::auth::JwtVerifier;
use crate::client::WorkerClient;
use crate::db::Database;
use crate::search::SearchPipeline;

/// A dependency `/ready` checks.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Name reported in the readiness body.
    fn name(&self) -> &'static str;

    /// Succeeds when the dependency answers.
    async fn check(&self) -> Result<(), String>;
}

#[async_trait]
impl ReadinessProbe for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.ping().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ReadinessProbe for WorkerClient {
    fn name(&self) -> &'static str {
        "worker"
    }

    async fn check(&self) -> Result<(), String> {
        self.health_check().await.map_err(|e| e.to_string())
    }
}

/// State shared by every handler.
pub struct AppState {
    /// Search pipeline.
    pub search: SearchPipeline,

    /// Dependencies checked by `/ready`.
    pub probes: Vec<Arc<dyn ReadinessProbe>>,

    /// Bearer token verifier.
    pub jwt: JwtVerifier,

    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Create state with no readiness probes.
    #[must_use]
    pub fn new(search: SearchPipeline, jwt: JwtVerifier, allowed_origins: Vec<String>) -> Self {
        Self { search, probes: Vec::new(), jwt, allowed_origins }
    }

    /// Add a dependency to the readiness check.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn ReadinessProbe>) -> Self {
        self.probes.push(probe);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("search", &self.search)
            .field("probes", &self.probes.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

/// Serve HTTP on `port` until Ctrl-C.
///
/// # Errors
///
/// Returns error if the port cannot be bound or the server fails.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let router = create_router(Arc::new(state));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl-C handler; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
