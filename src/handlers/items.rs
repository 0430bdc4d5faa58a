use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::{
    db,
    error::{AppError, AppResult},
    models::{CreateItem, FridgeItem},
    AppState,
};

/// Ids are SERIAL; anything that is not an integer cannot match a row.
fn parse_id(raw: &str) -> AppResult<i32> {
    raw.parse().map_err(|_| AppError::item_not_found())
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<FridgeItem>>> {
    let start = Instant::now();
    let items = db::fetch_all_items(&state.db).await?;

    info!(
        count = items.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Listed items"
    );

    Ok(Json(items))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItem>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FridgeItem>)> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest {
        message: "Invalid JSON body".to_string(),
        details: Some(rejection.body_text()),
    })?;
    let new_item = payload.validate()?;

    let start = Instant::now();
    let item = db::insert_item(&state.db, &new_item).await?;

    info!(
        id = item.id,
        name = %item.name,
        is_in_fridge = item.is_in_fridge,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Created item"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

// ── Toggle ────────────────────────────────────────────────────────────────────

pub async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FridgeItem>> {
    let id = parse_id(&id)?;
    let item = db::toggle_item(&state.db, id).await?;

    info!(id, is_in_fridge = item.is_in_fridge, "Toggled item");

    Ok(Json(item))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    let item = db::delete_item(&state.db, id).await?;

    info!(id, name = %item.name, "Deleted item");

    Ok(Json(json!({
        "message": "Item deleted",
        "deletedItem": item,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_parse() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-1").unwrap(), -1);
    }

    #[test]
    fn non_integer_ids_are_not_found() {
        for raw in ["abc", "1.5", "", "99999999999"] {
            assert!(matches!(parse_id(raw), Err(AppError::NotFound(_))), "{}", raw);
        }
    }
}
