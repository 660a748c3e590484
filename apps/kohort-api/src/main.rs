//! Kohort API service.
//!
//! Assembles the batch governance and enrollment routers over a shared
//! PostgreSQL pool, with health endpoints and an OpenAPI document.

mod auth;
mod config;
mod health;
mod logging;
mod openapi;

use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Router};
use config::Config;
use kohort_api_batches::{batches_router, BatchesState};
use kohort_api_enrollments::{enrollments_router, EnrollmentsState};
use kohort_core::TierGate;
use kohort_db::{run_migrations, DbPool};
use kohort_enrollment::{BulkEnrollmentRunner, EnrollmentReconciler};
use kohort_governance::BatchLifecycleService;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

#[tokio::main]
async fn main() {
    // Load configuration (fail-fast on missing required values).
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        "Starting kohort API"
    );

    // Connect and migrate.
    let pool = match DbPool::connect(&config.database_url).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool).await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    // Wire services; the tier gate is the single authorization check every
    // mutating operation consults.
    let gate = Arc::new(TierGate);
    let lifecycle = Arc::new(BatchLifecycleService::new(
        pool.inner().clone(),
        gate.clone(),
    ));
    let reconciler = Arc::new(EnrollmentReconciler::new(
        pool.inner().clone(),
        gate.clone(),
    ));
    let runner = Arc::new(BulkEnrollmentRunner::new(pool.inner().clone(), gate));

    // Authenticated API routes: the gateway headers become a CallerContext.
    let api_routes = Router::new()
        .merge(batches_router(BatchesState::new(lifecycle)))
        .merge(enrollments_router(EnrollmentsState::new(
            pool.inner().clone(),
            reconciler,
            runner,
        )))
        .layer(middleware::from_fn(auth::caller_context_middleware));

    // Unauthenticated plumbing routes.
    let plumbing_routes = Router::new()
        .route("/healthz", get(health::healthz_handler))
        .route("/readyz", get(health::readyz_handler))
        .route("/openapi.json", get(openapi::openapi_handler));

    let app = Router::new()
        .merge(api_routes)
        .merge(plumbing_routes)
        .layer(Extension(pool.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, addr = %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "Listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .unwrap_or_else(|e| tracing::error!(error = %e, "Failed to install Ctrl+C handler"));
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
