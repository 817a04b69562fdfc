use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use language_rdf_publisher::config::Config;
use language_rdf_publisher::db::Database;
use language_rdf_publisher::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("language_rdf_publisher=info".parse()?),
        )
        .init();

    info!("Starting language RDF publisher");

    // Load configuration from environment
    let config = Config::from_env()?;

    let db = Database::new(&config.database_path)?;
    info!("Opened database at {}", config.database_path);

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
