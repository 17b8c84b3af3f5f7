use anyhow::Result;
use std::env;
use tracing::info;

use verimail_auth::create_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber to log to stdout
    tracing_subscriber::fmt::init();

    // Load a local .env when present; deployments set the environment directly.
    dotenvy::dotenv().ok();

    let app = create_router()?;

    // Get optional bind endpoint from environment
    let endpoint = env::var("VERIMAIL_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    info!("Starting at endpoint:{}", endpoint);
    info!(
        "Starting Verimail auth API server v{}...",
        env!("CARGO_PKG_VERSION")
    );

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
