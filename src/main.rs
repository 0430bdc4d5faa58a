use std::any::Any;

use anyhow::Context;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

mod categories;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod seed;

use crate::config::{Config, DbConfig};

/// Shared application state. The pool is an `Arc` internally, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fridge_service=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!(
        host = %config.db.host,
        port = config.db.port,
        database = %config.db.name,
        user = %config.db.user,
        max_connections = config.db.max_connections,
        "Starting fridge service"
    );

    let pool = db::create_pool(&config.db);

    let probe = db::wait_for_database(&pool, config.db.connect_retries, config.db.retry_delay).await;
    resolve_probe(probe, &config.db)?;

    if db::try_init_schema(&pool).await && config.seed_examples {
        if let Err(e) = seed::seed_examples(&pool).await {
            error!(error = %e, "Seeding example items failed");
        }
    }

    let app = build_router(AppState { db: pool });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Outcome of the startup connectivity probe once policy is applied.
#[derive(Debug, PartialEq, Eq)]
enum DbStartup {
    Reachable { attempts: usize },
    Unreachable,
}

/// Abort when the database is required and the probe gave up; otherwise
/// start anyway and say so loudly.
fn resolve_probe(probe: Result<usize, sqlx::Error>, db: &DbConfig) -> anyhow::Result<DbStartup> {
    let attempts = db.connect_retries.max(1);
    match probe {
        Ok(attempts) => {
            info!(attempts, "Database reachable");
            Ok(DbStartup::Reachable { attempts })
        }
        Err(e) if db.required => {
            Err(e).with_context(|| format!("database unreachable after {} attempts", attempts))
        }
        Err(e) => {
            error!(
                error = %e,
                attempts,
                "Database unreachable, starting anyway; requests will fail until it recovers (set DB_REQUIRED=true to abort instead)"
            );
            Ok(DbStartup::Unreachable)
        }
    }
}

fn build_router(state: AppState) -> Router {
    use handlers::{categories, items, not_found};

    Router::new()
        .route("/", get(handlers::root).fallback(not_found))
        // ── Health ──────────────────────────────────────────────────────────
        .route("/api/health", get(handlers::health).fallback(not_found))
        .route(
            "/api/test-connection",
            get(handlers::test_connection).fallback(not_found),
        )
        // ── Items ───────────────────────────────────────────────────────────
        .route(
            "/api/items",
            get(items::list_items)
                .post(items::create_item)
                .fallback(not_found),
        )
        .route(
            "/api/items/:id/toggle",
            patch(items::toggle_item).fallback(not_found),
        )
        .route("/api/items/:id", delete(items::delete_item).fallback(not_found))
        // ── Categories ──────────────────────────────────────────────────────
        .route(
            "/api/categories",
            get(categories::list_categories).fallback(not_found),
        )
        .route(
            "/api/categories/:category/items",
            get(categories::items_by_category).fallback(not_found),
        )
        .route(
            "/api/statistics",
            get(categories::statistics).fallback(not_found),
        )
        .route("/api/search", post(categories::search_items).fallback(not_found))
        .fallback(not_found)
        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(details = %details, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received SIGTERM, shutting down"),
    }
}
