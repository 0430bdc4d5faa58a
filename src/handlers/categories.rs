use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    categories::{self, Statistics, CATEGORIES},
    db,
    error::{AppError, AppResult},
    models::SearchRequest,
    AppState,
};

pub async fn list_categories() -> Json<Value> {
    let names: Vec<&str> = CATEGORIES.iter().map(|(name, _)| *name).collect();

    Json(json!({
        "categories": names,
        "total_categories": names.len(),
        "category_examples": categories::examples(),
        "timestamp": Utc::now(),
    }))
}

pub async fn items_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> AppResult<Json<Value>> {
    let items = db::fetch_all_items(&state.db).await?;
    let matched = categories::filter_by_category(items, &category);

    info!(category = %category, count = matched.len(), "Filtered items by category");

    Ok(Json(json!({
        "category": category,
        "count": matched.len(),
        "items": matched,
        "timestamp": Utc::now(),
    })))
}

pub async fn statistics(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let items = db::fetch_all_items(&state.db).await?;
    let stats = Statistics::from_items(&items);

    Ok(Json(json!({
        "total_products": stats.total_products,
        "categories": stats.categories,
        "summary": stats.summary,
        "timestamp": Utc::now(),
    })))
}

pub async fn search_items(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest {
        message: "Invalid JSON body".to_string(),
        details: Some(rejection.body_text()),
    })?;

    let query = request.query.trim().to_lowercase();
    if query.is_empty() {
        return Err(AppError::bad_request("Search query is required"));
    }

    let items = db::fetch_all_items(&state.db).await?;
    let found = categories::search(items, &query);

    info!(query = %query, count = found.len(), "Searched items");

    Ok(Json(json!({
        "search_query": query,
        "found_count": found.len(),
        "items": found,
        "timestamp": Utc::now(),
    })))
}
