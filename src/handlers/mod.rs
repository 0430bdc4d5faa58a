pub mod categories;
pub mod items;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

use crate::{db, AppState};

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match db::database_time(&state.db).await {
        Ok(db_time) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "database": "connected",
                "timestamp": db_time,
            })),
        ),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "ERROR",
                    "database": "disconnected",
                    "error": e.to_string(),
                })),
            )
        }
    }
}

pub async fn test_connection(State(state): State<AppState>) -> Json<Value> {
    let body = match db::connection_report(&state.db).await {
        Ok(report) => json!({
            "status": "success",
            "database": {
                "version": report.version,
                "connection": "established",
                "total_items": report.total_items,
                "items_in_fridge": report.items_in_fridge,
                "items_out_of_fridge": report.total_items - report.items_in_fridge,
            },
            "timestamp": Utc::now(),
        }),
        Err(e) => {
            error!(error = %e, "Connection test failed");
            json!({
                "status": "error",
                "database": {
                    "connection": "failed",
                    "error": e.to_string(),
                },
                "timestamp": Utc::now(),
            })
        }
    };

    Json(body)
}

pub async fn root() -> Json<Value> {
    let endpoints = [
        ("/api/health", "GET", "Service and database health"),
        ("/api/test-connection", "GET", "Item counts and database version"),
        ("/api/items", "GET", "List all items, newest first"),
        ("/api/items", "POST", "Add an item"),
        ("/api/items/:id/toggle", "PATCH", "Move an item in or out of the fridge"),
        ("/api/items/:id", "DELETE", "Delete an item"),
        ("/api/categories", "GET", "Known product categories"),
        ("/api/categories/:category/items", "GET", "Items in a category"),
        ("/api/statistics", "GET", "Per-category statistics"),
        ("/api/search", "POST", "Search items by name or category"),
    ];

    Json(json!({
        "message": "Fridge service is running",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
        "endpoints": endpoints
            .iter()
            .map(|(path, method, description)| json!({
                "path": path,
                "method": method,
                "description": description,
            }))
            .collect::<Vec<_>>(),
    }))
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}
