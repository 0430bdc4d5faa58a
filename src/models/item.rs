use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Upper bound enforced by the `VARCHAR(255)` column.
pub const MAX_NAME_LEN: usize = 255;

/// One row of `fridge_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FridgeItem {
    pub id: i32,
    pub name: String,
    /// true = in the fridge, false = somewhere else
    pub is_in_fridge: bool,
    pub created_at: DateTime<Utc>,
}

/// Item annotated with its computed product category.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedItem {
    #[serde(flatten)]
    pub item: FridgeItem,
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Category,
    Name,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of `POST /api/items`. Both fields may be absent or null on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct CreateItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "isInFridge")]
    pub is_in_fridge: Option<bool>,
}

/// A validated insert: trimmed name, resolved location flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub is_in_fridge: bool,
}

impl CreateItem {
    pub fn validate(self) -> AppResult<NewItem> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::bad_request("Name is required"))?;

        // Postgres text cannot hold NUL.
        if name.contains('\0') {
            return Err(AppError::bad_request("Name must not contain NUL characters"));
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(NewItem {
            name: name.to_string(),
            is_in_fridge: self.is_in_fridge.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}
