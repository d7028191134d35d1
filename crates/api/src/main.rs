use anyhow::Context;
use tracing::{info, warn};

use company_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    company_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(?config, "starting company service");

    let app = company_api::app::build_app(&config)
        .await
        .context("failed to wire services")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to install Ctrl+C handler; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
