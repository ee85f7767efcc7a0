//! Catalog Item Model

use serde::{Deserialize, Serialize};

/// Catalog item entity
///
/// Read-only reference data. Carts store `item_id` and attach this snapshot
/// on read; prices are display values only (no arithmetic happens here).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub image_url: Option<String>,
}
