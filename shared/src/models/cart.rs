//! Cart Model

use serde::{Deserialize, Serialize};

use super::item::Item;

/// Cart lifecycle status
///
/// `Active` carts accept mutation and may participate in a merge;
/// `Completed` is terminal (set once at checkout, never reversed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum CartStatus {
    Active,
    Completed,
}

/// Cart entity
///
/// One shopping session. `owner_id` is the account that owns the cart, or
/// `None` for guest carts (addressed by id via the guest token). At most one
/// active cart exists per non-null owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i64,
    pub owner_id: Option<i64>,
    pub status: CartStatus,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --

    /// Cart entries ordered oldest first
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub entries: Vec<CartEntry>,
}

impl Cart {
    pub fn is_active(&self) -> bool {
        self.status == CartStatus::Active
    }
}

/// Cart entry entity
///
/// One distinct selection within a cart. `(item_id, instructions)` is unique
/// per cart; adding the same pair again increments `quantity` instead of
/// creating a second row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartEntry {
    pub id: i64,
    pub cart_id: i64,
    pub item_id: i64,
    /// Always >= 1; removing a selection deletes the entry instead
    pub quantity: i64,
    /// Optional free-text note ("no onions"); part of the dedup key
    pub instructions: Option<String>,
    /// Unix millis, drives stable display ordering
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --

    /// Catalog item snapshot, attached on read
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub item: Option<Item>,
}

/// Update cart entry payload
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartEntryUpdate {
    pub quantity: Option<i64>,
    pub instructions: Option<String>,
}
