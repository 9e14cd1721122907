use {
    chrono::NaiveDateTime,
    serde::{Deserialize, Serialize},
};

use crate::domain::HistoryRange;

/// Body of `GET /api/token/latest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenPrice {
    /// Copper.
    pub price: i64,
    /// Unix seconds (backend clock).
    pub last_updated: i64,
    pub formatted: String,
}

/// A point on a price series (token or watched item).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: i64,
    /// Unix seconds. The item endpoint sends fractional seconds.
    pub last_updated_timestamp: f64,
}

impl PricePoint {
    pub fn timestamp_secs(&self) -> i64 {
        self.last_updated_timestamp as i64
    }
}

/// One entry of the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedItem {
    pub id: i64,
    pub item_id: i64,
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub current_price: i64,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
}

/// Price history of the one watched item currently expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemHistory {
    pub item_id: i64,
    pub range: HistoryRange,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reagent {
    pub item_id: i64,
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
}

/// A tracked crafting recipe with its costing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default = "default_crafted_quantity")]
    pub crafted_quantity: i64,
    #[serde(default)]
    pub reagents: Vec<Reagent>,
    #[serde(default)]
    pub target_price: i64,
    #[serde(default)]
    pub total_cost: i64,
    #[serde(default)]
    pub profit: i64,
}

fn default_crafted_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSearchResult {
    pub id: i64,
    pub name: String,
}

/// Backend error body (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub(crate) detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_history_rows_ignore_storage_columns() {
        let body = r#"[{"id": 4, "price": 2500000, "last_updated_timestamp": 1771000000, "region": "eu", "created_at": "2026-02-25T14:15:00"}]"#;
        let points: Vec<PricePoint> = serde_json::from_str(body).unwrap();
        assert_eq!(points[0].price, 2_500_000);
        assert_eq!(points[0].timestamp_secs(), 1_771_000_000);
    }

    #[test]
    fn recipe_defaults_fill_missing_costing() {
        let recipe: Recipe = serde_json::from_str(r#"{"id": 7, "name": "Flask"}"#).unwrap();
        assert_eq!(recipe.crafted_quantity, 1);
        assert!(recipe.reagents.is_empty());
        assert_eq!(recipe.profit, 0);
    }
}
