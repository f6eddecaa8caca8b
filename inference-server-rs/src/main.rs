// inference-server-rs/src/main.rs
// Loads the model artifacts and serves /ping and /invocations

use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

use cost_model::{init_logging, LoggingConfig};
use inference_server::{InferenceServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging(&LoggingConfig::from_env("inference-server", false));

    let config = ServerConfig::from_env()?;
    let server = InferenceServer::load(&config.model_dir)
        .with_context(|| format!("failed to load model from {}", config.model_dir.display()))?;
    let app = Arc::new(server).create_router();

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Inference server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
