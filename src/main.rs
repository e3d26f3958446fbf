use loregraph::http::HttpServer;
use loregraph::rag::{EnvBootstrap, PipelineService};
use loregraph::ServerConfig;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Loregraph v{} - Lord of the Rings Knowledge Graph API ===", loregraph::version());

    let server_config = ServerConfig::from_env()?;
    let service = Arc::new(PipelineService::new(
        Arc::new(EnvBootstrap),
        server_config.strict_execution,
    ));

    // A failed initialization leaves the server up in degraded mode
    if let Err(e) = service.initialize().await {
        error!("Starting in degraded mode: {}", e);
        error!("Check the NEO4J_* and GOOGLE_API_KEY environment variables, then POST /api/reset");
    }

    let server = HttpServer::new(service, server_config.bind_address());
    if let Err(e) = server.start().await {
        error!("Could not serve on {}: {}", server_config.bind_address(), e);
        return Err(e.into());
    }

    Ok(())
}
