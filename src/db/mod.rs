pub mod pool;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::*;

pub use pool::{create_pool, wait_for_database};

// ── Schema ────────────────────────────────────────────────────────────────────

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS fridge_items (
        id           SERIAL PRIMARY KEY,
        name         VARCHAR(255) NOT NULL,
        is_in_fridge BOOLEAN NOT NULL DEFAULT TRUE,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_fridge_items_name ON fridge_items (name)",
    "CREATE INDEX IF NOT EXISTS idx_fridge_items_is_in_fridge ON fridge_items (is_in_fridge)",
];

/// Create the table and its indexes if absent. Safe on every start.
pub async fn init_schema(pool: &PgPool) -> AppResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Schema ready (fridge_items)");
    Ok(())
}

/// Startup wrapper around [`init_schema`]: failures are logged, never fatal.
pub async fn try_init_schema(pool: &PgPool) -> bool {
    match init_schema(pool).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Schema initialization failed");
            false
        }
    }
}

// ── Health ────────────────────────────────────────────────────────────────────

pub async fn database_time(pool: &PgPool) -> AppResult<DateTime<Utc>> {
    let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
        .fetch_one(pool)
        .await?;
    Ok(now)
}

/// Row counts and server version for `GET /api/test-connection`.
#[derive(Debug, sqlx::FromRow)]
pub struct ConnectionReport {
    pub total_items: i64,
    pub items_in_fridge: i64,
    pub version: String,
}

pub async fn connection_report(pool: &PgPool) -> AppResult<ConnectionReport> {
    let report = sqlx::query_as::<_, ConnectionReport>(
        r#"
        SELECT COUNT(*) AS total_items,
               COUNT(*) FILTER (WHERE is_in_fridge) AS items_in_fridge,
               version() AS version
        FROM fridge_items
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(report)
}

// ── Items ─────────────────────────────────────────────────────────────────────

pub async fn fetch_all_items(pool: &PgPool) -> AppResult<Vec<FridgeItem>> {
    let items = sqlx::query_as::<_, FridgeItem>(
        r#"
        SELECT id, name, is_in_fridge, created_at
        FROM fridge_items
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn insert_item(pool: &PgPool, item: &NewItem) -> AppResult<FridgeItem> {
    let item = sqlx::query_as::<_, FridgeItem>(
        r#"
        INSERT INTO fridge_items (name, is_in_fridge)
        VALUES ($1, $2)
        RETURNING id, name, is_in_fridge, created_at
        "#,
    )
    .bind(&item.name)
    .bind(item.is_in_fridge)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

/// Flip `is_in_fridge` in a single statement; 404 when no row matches.
pub async fn toggle_item(pool: &PgPool, id: i32) -> AppResult<FridgeItem> {
    sqlx::query_as::<_, FridgeItem>(
        r#"
        UPDATE fridge_items
        SET is_in_fridge = NOT is_in_fridge
        WHERE id = $1
        RETURNING id, name, is_in_fridge, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(AppError::item_not_found)
}

pub async fn delete_item(pool: &PgPool, id: i32) -> AppResult<FridgeItem> {
    sqlx::query_as::<_, FridgeItem>(
        "DELETE FROM fridge_items WHERE id = $1 RETURNING id, name, is_in_fridge, created_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(AppError::item_not_found)
}

pub async fn count_items(pool: &PgPool) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fridge_items")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Bulk insert via UNNEST; used by the example seeder.
pub async fn insert_items(pool: &PgPool, items: &[NewItem]) -> AppResult<Vec<FridgeItem>> {
    let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
    let flags: Vec<bool> = items.iter().map(|i| i.is_in_fridge).collect();

    let inserted = sqlx::query_as::<_, FridgeItem>(
        r#"
        INSERT INTO fridge_items (name, is_in_fridge)
        SELECT * FROM UNNEST($1::text[], $2::bool[])
        RETURNING id, name, is_in_fridge, created_at
        "#,
    )
    .bind(&names)
    .bind(&flags)
    .fetch_all(pool)
    .await?;

    Ok(inserted)
}
