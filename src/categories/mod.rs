//! Keyword-based product categories.
//!
//! Categories are never stored; they are derived from the item name each
//! time an endpoint needs them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{CategorizedItem, FridgeItem, MatchType};

pub const UNCATEGORIZED: &str = "другое";

/// Ordered: the first category with a matching keyword wins.
pub static CATEGORIES: &[(&str, &[&str])] = &[
    (
        "молочные",
        &["молоко", "сыр", "йогурт", "кефир", "творог", "сметана", "масло", "сливки"],
    ),
    (
        "овощи",
        &["помидор", "огурец", "картофель", "морковь", "лук", "капуста", "перец"],
    ),
    (
        "фрукты",
        &["яблоко", "банан", "апельсин", "лимон", "груша", "виноград"],
    ),
    (
        "мясо",
        &["колбаса", "сосиски", "курица", "говядина", "свинина", "ветчина"],
    ),
    ("напитки", &["сок", "вода", "чай", "кофе", "лимонад", "компот"]),
    ("хлеб", &["хлеб", "батон", "булка", "лаваш", "сухари"]),
    ("яйца", &["яйца", "яичница", "омлет"]),
];

pub fn categorize(name: &str) -> &'static str {
    if name.is_empty() {
        return UNCATEGORIZED;
    }
    let lower = name.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(UNCATEGORIZED)
}

fn keywords_of(category: &str) -> &'static [&'static str] {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

pub fn with_category(item: FridgeItem) -> CategorizedItem {
    let category = categorize(&item.name);
    CategorizedItem {
        item,
        category,
        match_type: None,
    }
}

/// Items whose category contains `category` (case-insensitive).
pub fn filter_by_category(items: Vec<FridgeItem>, category: &str) -> Vec<CategorizedItem> {
    let needle = category.to_lowercase();
    items
        .into_iter()
        .map(with_category)
        .filter(|c| c.category.contains(&needle))
        .collect()
}

/// Match `query` against category names, item names, and the keyword list of
/// a category named exactly `query`. The query is normalised here.
pub fn search(items: Vec<FridgeItem>, query: &str) -> Vec<CategorizedItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let keywords = keywords_of(&query);

    items
        .into_iter()
        .filter_map(|item| {
            let category = categorize(&item.name);
            let name = item.name.to_lowercase();
            let by_category = category.contains(&query);
            let hit = by_category
                || name.contains(&query)
                || keywords.iter().any(|k| name.contains(k));
            hit.then(|| CategorizedItem {
                item,
                category,
                match_type: Some(if by_category {
                    MatchType::Category
                } else {
                    MatchType::Name
                }),
            })
        })
        .collect()
}

/// Up to three example keywords per category.
pub fn examples() -> BTreeMap<&'static str, Vec<&'static str>> {
    CATEGORIES
        .iter()
        .map(|(name, keywords)| (*name, keywords.iter().take(3).copied().collect()))
        .collect()
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub total: usize,
    pub in_fridge: usize,
    pub out_of_fridge: usize,
    pub in_fridge_percentage: f64,
    pub out_of_fridge_percentage: f64,
}

#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub total_in_fridge: usize,
    pub total_out_of_fridge: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct Statistics {
    pub total_products: usize,
    pub categories: BTreeMap<&'static str, CategoryStats>,
    pub summary: Summary,
}

impl Statistics {
    pub fn from_items(items: &[FridgeItem]) -> Self {
        let mut categories: BTreeMap<&'static str, CategoryStats> = BTreeMap::new();

        for item in items {
            let stats = categories.entry(categorize(&item.name)).or_default();
            stats.total += 1;
            if item.is_in_fridge {
                stats.in_fridge += 1;
            } else {
                stats.out_of_fridge += 1;
            }
        }

        let mut summary = Summary::default();
        for stats in categories.values_mut() {
            stats.in_fridge_percentage = percentage(stats.in_fridge, stats.total);
            stats.out_of_fridge_percentage = percentage(stats.out_of_fridge, stats.total);
            summary.total_in_fridge += stats.in_fridge;
            summary.total_out_of_fridge += stats.out_of_fridge;
        }

        Self {
            total_products: items.len(),
            categories,
            summary,
        }
    }
}

/// Share of `part` in `total`, rounded to one decimal.
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: i32, name: &str, is_in_fridge: bool) -> FridgeItem {
        FridgeItem {
            id,
            name: name.to_string(),
            is_in_fridge,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn categorize_is_case_insensitive_substring() {
        assert_eq!(categorize("Молоко 3.2%"), "молочные");
        assert_eq!(categorize("Яблоко зелёное"), "фрукты");
        assert_eq!(categorize("ХЛЕБ бородинский"), "хлеб");
    }

    #[test]
    fn first_matching_category_wins() {
        // "лимонад" also contains the fruit keyword "лимон"
        assert_eq!(categorize("Лимонад"), "фрукты");
    }

    #[test]
    fn unknown_and_empty_names_are_uncategorized() {
        assert_eq!(categorize("Кетчуп"), UNCATEGORIZED);
        assert_eq!(categorize(""), UNCATEGORIZED);
    }

    #[test]
    fn filter_matches_partial_category_name() {
        let items = vec![item(1, "Сыр", true), item(2, "Огурец", true), item(3, "Творог", false)];
        let dairy = filter_by_category(items, "МОЛОЧ");
        let ids: Vec<i32> = dairy.iter().map(|c| c.item.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(dairy.iter().all(|c| c.category == "молочные"));
    }

    #[test]
    fn search_by_category_name_marks_category_match() {
        let found = search(vec![item(1, "Кефир", true), item(2, "Сок", true)], " Молочные ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].item.id, 1);
        assert_eq!(found[0].match_type, Some(MatchType::Category));
    }

    #[test]
    fn search_by_name_marks_name_match() {
        let found = search(vec![item(1, "Кетчуп острый", true), item(2, "Сок", true)], "кетчуп");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].match_type, Some(MatchType::Name));
        assert_eq!(found[0].category, UNCATEGORIZED);
    }

    #[test]
    fn blank_search_finds_nothing() {
        assert!(search(vec![item(1, "Сыр", true)], "   ").is_empty());
    }

    #[test]
    fn examples_take_at_most_three_keywords() {
        let examples = examples();
        assert_eq!(examples.len(), CATEGORIES.len());
        assert_eq!(examples["молочные"], vec!["молоко", "сыр", "йогурт"]);
        assert!(examples.values().all(|k| k.len() <= 3));
    }

    #[test]
    fn statistics_count_and_round_percentages() {
        let items = vec![
            item(1, "Молоко", true),
            item(2, "Сыр", false),
            item(3, "Кефир", true),
            item(4, "Хлеб", false),
        ];
        let stats = Statistics::from_items(&items);

        assert_eq!(stats.total_products, 4);
        let dairy = &stats.categories["молочные"];
        assert_eq!((dairy.total, dairy.in_fridge, dairy.out_of_fridge), (3, 2, 1));
        assert_eq!(dairy.in_fridge_percentage, 66.7);
        assert_eq!(dairy.out_of_fridge_percentage, 33.3);
        assert_eq!(stats.categories["хлеб"].out_of_fridge_percentage, 100.0);
        assert_eq!(stats.summary.total_in_fridge, 2);
        assert_eq!(stats.summary.total_out_of_fridge, 2);
    }

    #[test]
    fn statistics_of_empty_inventory() {
        let stats = Statistics::from_items(&[]);
        assert_eq!(stats.total_products, 0);
        assert!(stats.categories.is_empty());
    }
}
