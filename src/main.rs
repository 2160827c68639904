use anyhow::Result;
use civica_core::{config::Config, migration, server};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civica_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Civica Core Service");

    if std::env::args().any(|arg| arg == "migrate") {
        migration::run_migrations(&config).await?;
        return Ok(());
    }

    info!("HTTP server listening on {}", config.http_addr());
    server::run(config).await
}
