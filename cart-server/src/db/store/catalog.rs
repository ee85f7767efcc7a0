//! Item catalog read operations
//!
//! The cart service only reads the catalog. Entries reference items by id
//! and cart views are enriched with a snapshot of the item row; catalog
//! management lives elsewhere.

use shared::models::Item;
use sqlx::SqliteConnection;

use super::BoxError;

/// Fetch the given items, returning whatever subset exists.
///
/// Missing ids are simply absent from the result; callers treat a stale
/// reference as "item no longer available" rather than an error.
pub async fn get_items_by_ids(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> Result<Vec<Item>, BoxError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, name, description, price, category, image_url FROM items WHERE id IN ({placeholders})"
    );

    let mut query = sqlx::query_as::<_, Item>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let items = query.fetch_all(&mut *conn).await?;
    Ok(items)
}

/// True when the item exists in the catalog.
pub async fn item_exists(conn: &mut SqliteConnection, item_id: i64) -> Result<bool, BoxError> {
    let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM items WHERE id = ?")
        .bind(item_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}
