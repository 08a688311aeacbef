// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use demandas::config::{AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    let app = demandas::app(app_state);

    let listener = TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📖 OpenAPI em /api/docs/openapi.json");

    axum::serve(listener, app).await?;

    Ok(())
}
