use std::sync::Arc;

use anyhow::Context;

use shopfront_api::app::{self, services};
use shopfront_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shopfront_observability::init();

    let config = ApiConfig::from_env()?;
    let services = Arc::new(services::AppServices::in_memory(&config.jwt_secret));

    if config.seed_demo_data {
        let seed = services::seed_demo_data(&services, &config.jwt_secret)?;
        tracing::info!(user_id = %seed.user_id, token = %seed.token, "seeded demo data");
    }

    let app = app::build_app(services, &config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
