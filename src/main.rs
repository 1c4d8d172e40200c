mod config;
mod handlers;
mod models;
mod server;
mod services;

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;

use config::Config;
use handlers::AnalysisHandler;
use server::create_router;
use services::{ImaggaClient, NutritionService, TaggingService, UsdaClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting Cal Track backend...");

    let config = Config::from_env()?;
    let http = services::http_client(config.upstream_timeout)?;

    let tagging: Arc<dyn TaggingService> = Arc::new(ImaggaClient::new(
        config.imagga_api_key.clone(),
        config.imagga_api_secret.clone(),
        config.imagga_api_url.clone(),
        http.clone(),
    ));
    log::info!("✅ Imagga tagging client initialized ({})", config.imagga_api_url);

    let nutrition: Arc<dyn NutritionService> = Arc::new(UsdaClient::new(
        config.usda_api_key.clone(),
        config.usda_api_url.clone(),
        http,
    ));
    log::info!("✅ USDA nutrition client initialized ({})", config.usda_api_url);

    let analysis_handler = Arc::new(AnalysisHandler::new(tagging, nutrition));
    let app = create_router(analysis_handler, config.allowed_origin.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("🌐 Server listening on {} (CORS origin: {:?})", addr, config.allowed_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("🛑 Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
