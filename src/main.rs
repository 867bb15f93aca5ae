//! Payroll engine HTTP server.

use std::env;

use anyhow::Context;
use payroll_engine::api::{create_router, AppState};
use payroll_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "PAYROLL_ENGINE_CONFIG";
const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading configuration from {}", config_dir))?;

    let settings = config.settings().clone();
    info!(
        name = %settings.name,
        version = %settings.version,
        plans = config.plans().len(),
        default_strategy = %settings.default_strategy,
        "Configuration loaded"
    );

    let router = create_router(AppState::in_memory(config));
    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("binding {}", settings.bind_address))?;
    info!(address = %settings.bind_address, "Listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
