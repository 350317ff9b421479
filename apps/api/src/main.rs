use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use daycare_api::api::{build_app, AppState};
use daycare_api::config::ApiSettings;
use daycare_api::domain::repositories::Store;
use daycare_api::infrastructure::repositories::{MemoryStore, PostgresStore};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load settings; nothing is served if they are invalid
    let settings = ApiSettings::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;
    tracing::info!(
        port = settings.port,
        origins = ?settings.cors.origins,
        allow_credentials = settings.cors.allow_credentials,
        "Settings loaded"
    );

    let store: Arc<dyn Store> = match &settings.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            let store = PostgresStore::new(pool);
            store.migrate().await?;
            tracing::info!("Database connected and migrated");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, settings.jwt_secret.as_str());
    let app = build_app(state, &settings)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
