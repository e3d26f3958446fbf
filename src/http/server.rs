//! HTTP server for the question-answering API and frontend

use axum::{
    routing::{get, post},
    Router,
};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use super::handler::{
    examples_handler, fallback_handler, health_handler, index_handler, query_handler, reset_handler,
    stats_handler,
};
use crate::rag::PipelineService;

#[derive(RustEmbed)]
#[folder = "src/http/static/"]
pub(crate) struct Assets;

/// Routes of the public API
pub fn router(service: Arc<PipelineService>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/query", post(query_handler))
        .route("/api/examples", get(examples_handler))
        .route("/api/reset", post(reset_handler))
        .fallback(fallback_handler)
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// HTTP server bound to a single address
pub struct HttpServer {
    service: Arc<PipelineService>,
    address: String,
}

impl HttpServer {
    pub fn new(service: Arc<PipelineService>, address: impl Into<String>) -> Self {
        Self { service, address: address.into() }
    }

    /// Bind and serve until Ctrl+C. A bind failure is returned to the caller.
    pub async fn start(&self) -> std::io::Result<()> {
        let app = router(Arc::clone(&self.service));
        let listener = tokio::net::TcpListener::bind(&self.address).await?;
        let local = listener.local_addr()?;

        info!("Frontend available at http://localhost:{}", local.port());
        info!("API health check: http://localhost:{}/api/health", local.port());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
