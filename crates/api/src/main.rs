// Pickup Hoops API server
// Decision: Postgres in production, in-memory store when DEV_MODE is set

use anyhow::{Context, Result};
use hoops_api::config::ServerConfig;
use hoops_api::storage::{HoopsStore, InMemoryStore, PostgresStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading RUST_LOG or any other setting
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoops_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("hoops-api starting...");
    if let Some(path) = dotenv_path {
        tracing::info!("Loaded .env from {:?}", path);
    }

    let config = ServerConfig::from_env().context("Invalid configuration")?;

    let store: Arc<dyn HoopsStore> = match config.database_url.as_deref() {
        Some(url) if !config.dev_mode => {
            let store = PostgresStore::connect(url, config.max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            if config.run_migrations {
                store.migrate().await.context("Failed to run migrations")?;
                tracing::info!("Database migrations applied");
            }
            Arc::new(store)
        }
        _ => {
            tracing::warn!("DEV_MODE enabled: using in-memory store, data is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_allowed_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_allowed_origins, "CORS origins configured");
    }

    let app = hoops_api::build_app(store, &config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("hoops-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
