use sqlx::PgPool;
use tracing::info;

use crate::db;
use crate::error::AppResult;
use crate::models::{FridgeItem, NewItem};

/// Example inventory; mirrors the rows in `sql/init.sql`.
static EXAMPLES: &[(&str, bool)] = &[
    ("Молоко", true),
    ("Сыр", true),
    ("Яйца", true),
    ("Яблоки", false),
    ("Хлеб", false),
    ("Колбаса", true),
];

pub fn example_items() -> Vec<NewItem> {
    EXAMPLES
        .iter()
        .map(|(name, is_in_fridge)| NewItem {
            name: name.to_string(),
            is_in_fridge: *is_in_fridge,
        })
        .collect()
}

/// Insert the example rows, but only into an empty table.
pub async fn seed_examples(pool: &PgPool) -> AppResult<Vec<FridgeItem>> {
    let existing = db::count_items(pool).await?;
    if existing > 0 {
        info!(existing, "Table already has items, skipping seed");
        return Ok(Vec::new());
    }

    let inserted = db::insert_items(pool, &example_items()).await?;
    info!(count = inserted.len(), "Seeded example items");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_examples_with_valid_names() {
        let items = example_items();
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|i| !i.name.trim().is_empty()));
        assert_eq!(items.iter().filter(|i| !i.is_in_fridge).count(), 2);
    }
}
