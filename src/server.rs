//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, the rate limiter evictor and the Axum
//! server lifecycle including graceful shutdown.

use crate::api::middleware::{CorsPolicy, RateLimitGate, RequestMetrics};
use crate::application::services::{AuthService, QuoteService, UserService};
use crate::config::Config;
use crate::domain::client_registry::{ClientRegistry, run_client_evictor};
use crate::domain::repositories::{PermissionRepository, UserRepository};
use crate::infrastructure::mailer::{LogMailer, Mailer};
use crate::infrastructure::persistence::{
    PgPermissionRepository, PgQuoteRepository, PgTokenRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Rate limiter registry and its evictor task
/// - Axum HTTP server
///
/// On `Ctrl+C` / `SIGTERM` the server stops accepting connections, drains
/// in-flight requests, then signals the evictor and waits for it to exit.
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
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let permissions: Arc<dyn PermissionRepository> =
        Arc::new(PgPermissionRepository::new(pool.clone()));
    let tokens = Arc::new(PgTokenRepository::new(pool.clone()));
    let quotes = Arc::new(PgQuoteRepository::new(pool.clone()));
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(config.smtp_sender.clone()));

    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        tokens,
        config.token_signing_secret.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        users,
        permissions.clone(),
        auth_service.clone(),
        mailer,
    ));

    let state = AppState {
        quote_service: Arc::new(QuoteService::new(quotes)),
        user_service,
        auth_service,
        permissions,
        metrics: Arc::new(RequestMetrics::new()),
        environment: config.environment.clone(),
    };

    let registry = Arc::new(ClientRegistry::new(config.limiter_settings()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let evictor = tokio::spawn(run_client_evictor(registry.clone(), shutdown_rx));
    tracing::info!("Rate limiter evictor started");

    let limiter = RateLimitGate::new(registry, config.limiter_enabled, config.behind_proxy);
    let cors_policy = CorsPolicy::new(config.cors_trusted_origins.clone());

    let app = app_router(state, limiter, cors_policy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, shutting down background tasks");
    let _ = shutdown_tx.send(true);
    evictor.await.context("Rate limiter evictor panicked")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
