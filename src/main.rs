//! Server binary. Reads configuration from the environment (and `.env`), prepares the store and serves the API.
//!
//! With `DATABASE_URL` set the PostgreSQL database is created if missing and its tables ensured;
//! without it the server runs on the in-process store.

use axum::extract::Request;
use axum::ServiceExt;
use starwars_api::config::DEFAULT_LOG_FILTER;
use starwars_api::{build_app, ensure_database_exists, AppState, Config, EntityStore, MemoryStore, PgStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let store: Arc<dyn EntityStore> = match &config.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let store = PgStore::connect(database_url, config.max_connections).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-process store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let app = build_app(AppState::new(store), config.body_limit_bytes);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
