use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod dashboard;

use api::SportsApi;
use config::Config;
use dashboard::DashboardController;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let api = SportsApi::new(&config.backend_url, config.request_timeout())?;
    info!("Prediction backend: {}", api.base_url());

    match api.health().await {
        Ok(status) => info!("Backend health: {}", status),
        Err(e) => warn!("{} ({}); dashboard will keep retrying", e, e.cause()),
    }

    let mut controller = DashboardController::new(
        Arc::new(api),
        config.refresh_settings(),
        config.default_sport.trim(),
        config.sport_list(),
    );
    let app = dashboard::router(controller.handle());
    controller.start()?;

    let addr: SocketAddr = config
        .dashboard_addr
        .parse()
        .with_context(|| format!("Invalid dashboard address '{}'", config.dashboard_addr))?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run dashboard server until Ctrl-C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
