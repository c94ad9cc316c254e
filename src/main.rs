use anyhow::Context;
use columbus::columbus_config::{IdentityConfig, ServerConfig};
use columbus::logging::init_tracing;
use columbus::metrics::{init_metrics, metrics_app};
use columbus::router::init_router;
use columbus::state::init_app_state;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env();
    let identity_config = IdentityConfig::from_env()?;

    let state = init_app_state(&server_config, &identity_config).await?;
    let app = init_router(state);

    if let Some(handle) = init_metrics()? {
        let listener = TcpListener::bind(&server_config.metrics_addr)
            .await
            .with_context(|| format!("failed to bind {}", server_config.metrics_addr))?;
        info!(addr = %server_config.metrics_addr, "Metrics server running");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %err, "Metrics server stopped");
            }
        });
    }

    let listener = TcpListener::bind(&server_config.server_addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.server_addr))?;
    info!(
        addr = %server_config.server_addr,
        identity_header = %identity_config.header_key,
        provider = %identity_config.provider_default_name,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
