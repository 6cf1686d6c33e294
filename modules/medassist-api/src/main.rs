use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medassist_api::{build_router, prompts, AppState};
use medassist_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = Config::from_env()?;
    info!(
        model = %config.gemini_model,
        temperature = config.temperature,
        origins = ?config.cors_origins,
        "Configuration loaded"
    );

    prompts::verify_templates()?;

    let state = Arc::new(AppState::from_config(&config));
    let app = build_router(state, &config);

    let addr = config.bind_addr();
    info!("Medical assistant API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
