use financial_twin::{api::start_server, config::AppConfig, AssistantPipeline};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    if config.gemini.api_key.is_empty() {
        warn!("GEMINI_API_KEY not set; advisory replies will report the backend as unavailable");
    }

    info!("Financial Digital Twin - API Server");
    info!("Port: {}", config.port);

    let pipeline = Arc::new(AssistantPipeline::from_config(&config)?);

    info!("Pipeline initialized");

    start_server(pipeline, config.port).await?;

    Ok(())
}
