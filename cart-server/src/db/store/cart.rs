//! Cart and cart entry database operations

use shared::models::{Cart, CartEntry, CartStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqliteConnection;

use super::BoxError;

// ── Carts ──

pub async fn find_active_cart_by_owner(
    conn: &mut SqliteConnection,
    owner_id: i64,
) -> Result<Option<Cart>, BoxError> {
    let cart = sqlx::query_as::<_, Cart>(
        "SELECT id, owner_id, status, created_at, updated_at FROM carts
         WHERE owner_id = ? AND status = 'active'",
    )
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(cart)
}

pub async fn find_cart_by_id(
    conn: &mut SqliteConnection,
    cart_id: i64,
) -> Result<Option<Cart>, BoxError> {
    let cart = sqlx::query_as::<_, Cart>(
        "SELECT id, owner_id, status, created_at, updated_at FROM carts WHERE id = ?",
    )
    .bind(cart_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(cart)
}

/// Insert a new active cart. `owner_id` None creates a guest cart.
///
/// Fails with a unique violation if the owner already has an active cart;
/// the engine resolves that race by re-reading.
pub async fn create_cart(
    conn: &mut SqliteConnection,
    owner_id: Option<i64>,
) -> Result<Cart, BoxError> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO carts (id, owner_id, status, created_at, updated_at)
         VALUES (?1, ?2, 'active', ?3, ?3)",
    )
    .bind(id)
    .bind(owner_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Cart {
        id,
        owner_id,
        status: CartStatus::Active,
        created_at: now,
        updated_at: now,
        entries: Vec::new(),
    })
}

/// Update the cart status, returning the refreshed row.
pub async fn set_cart_status(
    conn: &mut SqliteConnection,
    cart_id: i64,
    status: CartStatus,
) -> Result<Cart, BoxError> {
    let result = sqlx::query("UPDATE carts SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now_millis())
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err("Cart not found".into());
    }

    let cart = find_cart_by_id(conn, cart_id).await?.ok_or("Cart not found")?;
    Ok(cart)
}

/// Bump the cart's updated_at after an entry mutation.
pub async fn touch_cart(conn: &mut SqliteConnection, cart_id: i64) -> Result<(), BoxError> {
    sqlx::query("UPDATE carts SET updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Delete a cart; entries go with it via ON DELETE CASCADE.
pub async fn delete_cart(conn: &mut SqliteConnection, cart_id: i64) -> Result<(), BoxError> {
    let result = sqlx::query("DELETE FROM carts WHERE id = ?")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err("Cart not found".into());
    }
    Ok(())
}

pub async fn list_carts_by_owner(
    conn: &mut SqliteConnection,
    owner_id: i64,
) -> Result<Vec<Cart>, BoxError> {
    let carts = sqlx::query_as::<_, Cart>(
        "SELECT id, owner_id, status, created_at, updated_at FROM carts
         WHERE owner_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(owner_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(carts)
}

pub async fn list_all_carts(
    conn: &mut SqliteConnection,
    limit: i64,
    offset: i64,
) -> Result<Vec<Cart>, BoxError> {
    let carts = sqlx::query_as::<_, Cart>(
        "SELECT id, owner_id, status, created_at, updated_at FROM carts
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *conn)
    .await?;
    Ok(carts)
}

// ── Cart Entries ──

/// Entries in creation order, oldest first. Ties on created_at (same
/// millisecond) fall back to id so the order is stable.
pub async fn list_entries(
    conn: &mut SqliteConnection,
    cart_id: i64,
) -> Result<Vec<CartEntry>, BoxError> {
    let entries = sqlx::query_as::<_, CartEntry>(
        "SELECT id, cart_id, item_id, quantity, instructions, created_at, updated_at
         FROM cart_entries WHERE cart_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(cart_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(entries)
}

/// Look up an entry by its dedup key (item_id, instructions).
///
/// NULL and non-NULL instructions are separate slots, so the lookup
/// branches on the presence of the text.
pub async fn find_entry_by_key(
    conn: &mut SqliteConnection,
    cart_id: i64,
    item_id: i64,
    instructions: Option<&str>,
) -> Result<Option<CartEntry>, BoxError> {
    let entry = match instructions {
        Some(text) => {
            sqlx::query_as::<_, CartEntry>(
                "SELECT id, cart_id, item_id, quantity, instructions, created_at, updated_at
                 FROM cart_entries
                 WHERE cart_id = ?1 AND item_id = ?2 AND instructions = ?3",
            )
            .bind(cart_id)
            .bind(item_id)
            .bind(text)
            .fetch_optional(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_as::<_, CartEntry>(
                "SELECT id, cart_id, item_id, quantity, instructions, created_at, updated_at
                 FROM cart_entries
                 WHERE cart_id = ?1 AND item_id = ?2 AND instructions IS NULL",
            )
            .bind(cart_id)
            .bind(item_id)
            .fetch_optional(&mut *conn)
            .await?
        }
    };
    Ok(entry)
}

/// Look up an entry by id, scoped to a cart so one shopper cannot reach
/// into another shopper's cart.
pub async fn find_entry_in_cart(
    conn: &mut SqliteConnection,
    entry_id: i64,
    cart_id: i64,
) -> Result<Option<CartEntry>, BoxError> {
    let entry = sqlx::query_as::<_, CartEntry>(
        "SELECT id, cart_id, item_id, quantity, instructions, created_at, updated_at
         FROM cart_entries WHERE id = ?1 AND cart_id = ?2",
    )
    .bind(entry_id)
    .bind(cart_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(entry)
}

pub async fn insert_entry(
    conn: &mut SqliteConnection,
    cart_id: i64,
    item_id: i64,
    quantity: i64,
    instructions: Option<&str>,
) -> Result<CartEntry, BoxError> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO cart_entries (id, cart_id, item_id, quantity, instructions, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(cart_id)
    .bind(item_id)
    .bind(quantity)
    .bind(instructions)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(CartEntry {
        id,
        cart_id,
        item_id,
        quantity,
        instructions: instructions.map(str::to_string),
        created_at: now,
        updated_at: now,
        item: None,
    })
}

/// Add `delta` to an entry's quantity (merge-on-add path).
pub async fn add_entry_quantity(
    conn: &mut SqliteConnection,
    entry_id: i64,
    delta: i64,
) -> Result<(), BoxError> {
    let result = sqlx::query(
        "UPDATE cart_entries SET quantity = quantity + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(delta)
    .bind(now_millis())
    .bind(entry_id)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err("Cart entry not found".into());
    }
    Ok(())
}

/// Partial update: absent fields keep their current value.
pub async fn update_entry(
    conn: &mut SqliteConnection,
    entry_id: i64,
    quantity: Option<i64>,
    instructions: Option<&str>,
) -> Result<CartEntry, BoxError> {
    let result = sqlx::query(
        "UPDATE cart_entries SET
            quantity = COALESCE(?1, quantity),
            instructions = COALESCE(?2, instructions),
            updated_at = ?3
         WHERE id = ?4",
    )
    .bind(quantity)
    .bind(instructions)
    .bind(now_millis())
    .bind(entry_id)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err("Cart entry not found".into());
    }

    let entry = sqlx::query_as::<_, CartEntry>(
        "SELECT id, cart_id, item_id, quantity, instructions, created_at, updated_at
         FROM cart_entries WHERE id = ?",
    )
    .bind(entry_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or("Cart entry not found")?;
    Ok(entry)
}

pub async fn delete_entry(conn: &mut SqliteConnection, entry_id: i64) -> Result<(), BoxError> {
    let result = sqlx::query("DELETE FROM cart_entries WHERE id = ?")
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err("Cart entry not found".into());
    }
    Ok(())
}
