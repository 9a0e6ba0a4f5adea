//! activity-server binary

use activity_server::{AppState, Config, create_router, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    logger::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref());

    tracing::info!(
        "Starting activity-server (env: {}, upstream: {})",
        config.environment,
        config.gateway.target.entry_url()
    );

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let state = AppState::new(config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("activity-server HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("activity-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
