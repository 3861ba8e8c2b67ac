//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the event pipeline and the Axum
//! server lifecycle.

use crate::config::Config;
use crate::domain::event_bus::EventBus;
use crate::domain::repositories::{LinkRepository, StatsRepository, TokenRepository};
use crate::domain::stat_aggregator::spawn_stat_aggregator;
use crate::infrastructure::persistence::{PgLinkRepository, PgStatsRepository, PgTokenRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes, in order:
/// - PostgreSQL connection pool
/// - Schema migrations
/// - The process-wide [`EventBus`]
/// - Exactly one stat aggregator subscribed to it
/// - Axum HTTP server, stopped gracefully on Ctrl-C / SIGTERM
///
/// The aggregator gets no shutdown signal; it ends with the process.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let stats_repository: Arc<dyn StatsRepository> =
        Arc::new(PgStatsRepository::new(pool.clone()));
    let token_repository: Arc<dyn TokenRepository> =
        Arc::new(PgTokenRepository::new(pool.clone()));

    let event_bus = EventBus::new(config.event_queue_capacity);

    // Subscribe before serving so no early click is dropped.
    spawn_stat_aggregator(&event_bus, stats_repository.clone());

    let state = AppState::new(
        link_repository,
        stats_repository,
        token_repository,
        event_bus,
        config.base_url.clone(),
        config.token_signing_secret.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
}
