//! Cart engine
//!
//! The business core: cart resolution, entry mutation, completion and
//! guest-to-owner merge. Each operation runs inside a single transaction
//! on the single-connection pool, so concurrent operations on the same
//! cart are serialized rather than interleaved, and any failure rolls
//! back the whole operation.

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{Cart, CartEntryUpdate, CartStatus, Identity, Item};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::store::{self, is_unique_violation};
use crate::error::ServiceResult;

/// Upper bound for the instructions note on an entry.
const MAX_INSTRUCTIONS_LEN: usize = 500;

#[derive(Clone)]
pub struct CartEngine {
    pool: SqlitePool,
}

impl CartEngine {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Return the owner's active cart, creating one if none exists.
    ///
    /// Calling this twice for the same owner yields the same cart id.
    pub async fn get_or_create_active_cart(&self, owner_id: i64) -> ServiceResult<Cart> {
        let mut tx = self.pool.begin().await?;
        let cart = resolve_or_create_cart(&mut tx, owner_id).await?;
        let cart = load_cart_view(&mut tx, cart).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Create a fresh guest cart. The caller keeps its id as the guest token.
    pub async fn create_guest_cart(&self) -> ServiceResult<Cart> {
        let mut tx = self.pool.begin().await?;
        let cart = store::create_cart(&mut tx, None).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Current cart for the identity, entries enriched with catalog items.
    ///
    /// Accounts resolve to their active cart (`NoActiveCart` if none).
    /// Guest tokens resolve by cart id; a missing or already-completed
    /// guest cart is reported as `CartNotFound`.
    pub async fn get_cart(&self, identity: Identity) -> ServiceResult<Cart> {
        let mut conn = self.pool.acquire().await?;
        let cart = match identity {
            Identity::Account { id, .. } => store::find_active_cart_by_owner(&mut conn, id)
                .await?
                .ok_or(AppError::new(ErrorCode::NoActiveCart))?,
            Identity::Guest { cart_id } => {
                let cart = store::find_cart_by_id(&mut conn, cart_id)
                    .await?
                    .ok_or(AppError::new(ErrorCode::CartNotFound))?;
                if !cart.is_active() {
                    return Err(AppError::new(ErrorCode::CartNotFound).into());
                }
                cart
            }
        };
        load_cart_view(&mut conn, cart).await
    }

    /// Add an item selection to the identity's cart.
    ///
    /// An entry with the same `(item_id, instructions)` already in the cart
    /// absorbs the quantity; otherwise a new entry is inserted.
    pub async fn add_item(
        &self,
        identity: Identity,
        item_id: i64,
        quantity: i64,
        instructions: Option<String>,
    ) -> ServiceResult<Cart> {
        if quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1").into());
        }
        let instructions = normalize_instructions(instructions)?;

        let mut tx = self.pool.begin().await?;

        let cart = resolve_open_cart(&mut tx, identity).await?;

        if !store::item_exists(&mut tx, item_id).await? {
            return Err(AppError::new(ErrorCode::ItemNotFound).into());
        }

        match store::find_entry_by_key(&mut tx, cart.id, item_id, instructions.as_deref()).await? {
            Some(existing) => {
                store::add_entry_quantity(&mut tx, existing.id, quantity).await?;
            }
            None => {
                store::insert_entry(&mut tx, cart.id, item_id, quantity, instructions.as_deref())
                    .await?;
            }
        }
        store::touch_cart(&mut tx, cart.id).await?;

        let cart = load_cart_view(&mut tx, cart).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Partially update an entry in the caller's cart.
    ///
    /// Absent fields keep their current value. Changing instructions onto a
    /// key another entry already holds is rejected as `DuplicateEntry`
    /// rather than silently merging the two rows.
    pub async fn update_entry(
        &self,
        identity: Identity,
        entry_id: i64,
        update: CartEntryUpdate,
    ) -> ServiceResult<Cart> {
        if let Some(quantity) = update.quantity {
            if quantity < 1 {
                return Err(AppError::validation("Quantity must be at least 1").into());
            }
        }
        let instructions = match update.instructions {
            None => None,
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    // COALESCE keeps the old value for absent fields, so an
                    // empty string cannot mean "clear"; reject it outright.
                    return Err(AppError::validation("Instructions cannot be empty").into());
                }
                if trimmed.len() > MAX_INSTRUCTIONS_LEN {
                    return Err(AppError::validation("Instructions are too long").into());
                }
                Some(trimmed.to_string())
            }
        };

        let mut tx = self.pool.begin().await?;

        let cart = current_open_cart(&mut tx, identity).await?;
        let entry = store::find_entry_in_cart(&mut tx, entry_id, cart.id)
            .await?
            .ok_or(AppError::new(ErrorCode::EntryNotFound))?;

        if let Some(new_instructions) = instructions.as_deref() {
            if entry.instructions.as_deref() != Some(new_instructions) {
                let collision =
                    store::find_entry_by_key(&mut tx, cart.id, entry.item_id, Some(new_instructions))
                        .await?;
                if collision.is_some_and(|other| other.id != entry.id) {
                    return Err(AppError::new(ErrorCode::DuplicateEntry).into());
                }
            }
        }

        store::update_entry(&mut tx, entry_id, update.quantity, instructions.as_deref()).await?;
        store::touch_cart(&mut tx, cart.id).await?;

        let cart = load_cart_view(&mut tx, cart).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Remove an entry from the caller's cart.
    ///
    /// Removing the last entry leaves the (empty, still active) cart in place.
    pub async fn remove_entry(&self, identity: Identity, entry_id: i64) -> ServiceResult<Cart> {
        let mut tx = self.pool.begin().await?;

        let cart = current_open_cart(&mut tx, identity).await?;
        if store::find_entry_in_cart(&mut tx, entry_id, cart.id).await?.is_none() {
            return Err(AppError::new(ErrorCode::EntryNotFound).into());
        }

        store::delete_entry(&mut tx, entry_id).await?;
        store::touch_cart(&mut tx, cart.id).await?;

        let cart = load_cart_view(&mut tx, cart).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Transition the caller's cart Active → Completed (checkout).
    ///
    /// Terminal: the identity has no active cart afterwards, and a
    /// subsequent add starts a fresh cart for account owners.
    pub async fn complete_cart(&self, identity: Identity) -> ServiceResult<Cart> {
        let mut tx = self.pool.begin().await?;

        let cart = match identity {
            Identity::Account { id, .. } => store::find_active_cart_by_owner(&mut tx, id)
                .await?
                .ok_or(AppError::new(ErrorCode::NoActiveCart))?,
            Identity::Guest { cart_id } => {
                let cart = store::find_cart_by_id(&mut tx, cart_id)
                    .await?
                    .ok_or(AppError::new(ErrorCode::CartNotFound))?;
                if !cart.is_active() {
                    return Err(AppError::new(ErrorCode::CartClosed).into());
                }
                cart
            }
        };

        let cart = store::set_cart_status(&mut tx, cart.id, CartStatus::Completed).await?;
        let cart = load_cart_view(&mut tx, cart).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Fold a guest cart into an owner's active cart, then retire it.
    ///
    /// Runs entirely in one transaction: every guest entry either merges
    /// into a matching owner entry or is copied over, then the guest cart
    /// is deleted. A replay with the already-deleted guest cart id fails
    /// with `GuestCartNotFound` and leaves the owner cart untouched.
    pub async fn merge_guest_cart_into_owner(
        &self,
        guest_cart_id: i64,
        owner_id: i64,
    ) -> ServiceResult<Cart> {
        let mut tx = self.pool.begin().await?;

        let guest = store::find_cart_by_id(&mut tx, guest_cart_id)
            .await?
            .ok_or(AppError::new(ErrorCode::GuestCartNotFound))?;
        if !guest.is_active() {
            return Err(AppError::new(ErrorCode::GuestCartNotFound).into());
        }
        match guest.owner_id {
            // The "guest" id points at the owner's own cart: nothing to move.
            Some(id) if id == owner_id => {
                let cart = load_cart_view(&mut tx, guest).await?;
                tx.commit().await?;
                return Ok(cart);
            }
            // Someone else's cart is not mergeable, and not discoverable.
            Some(_) => return Err(AppError::new(ErrorCode::GuestCartNotFound).into()),
            None => {}
        }

        let owner_cart = resolve_or_create_cart(&mut tx, owner_id).await?;

        let guest_entries = store::list_entries(&mut tx, guest.id).await?;
        for entry in &guest_entries {
            let existing = store::find_entry_by_key(
                &mut tx,
                owner_cart.id,
                entry.item_id,
                entry.instructions.as_deref(),
            )
            .await?;
            match existing {
                Some(target) => {
                    store::add_entry_quantity(&mut tx, target.id, entry.quantity).await?;
                }
                None => {
                    store::insert_entry(
                        &mut tx,
                        owner_cart.id,
                        entry.item_id,
                        entry.quantity,
                        entry.instructions.as_deref(),
                    )
                    .await?;
                }
            }
        }

        store::delete_cart(&mut tx, guest.id).await?;
        store::touch_cart(&mut tx, owner_cart.id).await?;

        let cart = load_cart_view(&mut tx, owner_cart).await?;
        tx.commit().await?;
        Ok(cart)
    }

    /// Delete the identity's current cart and everything in it.
    ///
    /// Only active carts can be abandoned; completed carts are history.
    pub async fn delete_cart(&self, identity: Identity) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;
        let cart = current_open_cart(&mut tx, identity).await?;
        store::delete_cart(&mut tx, cart.id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// All carts ever owned by the account, newest first, enriched.
    pub async fn list_carts(&self, owner_id: i64) -> ServiceResult<Vec<Cart>> {
        let mut conn = self.pool.acquire().await?;
        let carts = store::list_carts_by_owner(&mut conn, owner_id).await?;
        let mut views = Vec::with_capacity(carts.len());
        for cart in carts {
            views.push(load_cart_view(&mut conn, cart).await?);
        }
        Ok(views)
    }

    /// Administrative listing of every cart, paginated, without entries.
    pub async fn list_all_carts(&self, limit: i64, offset: i64) -> ServiceResult<Vec<Cart>> {
        let mut conn = self.pool.acquire().await?;
        let carts = store::list_all_carts(&mut conn, limit, offset).await?;
        Ok(carts)
    }

    /// Administrative deletion of any cart, regardless of status.
    pub async fn delete_cart_by_id(&self, cart_id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;
        if store::find_cart_by_id(&mut tx, cart_id).await?.is_none() {
            return Err(AppError::new(ErrorCode::CartNotFound).into());
        }
        store::delete_cart(&mut tx, cart_id).await?;
        tx.commit().await?;
        Ok(())
    }
}

// ── Helpers ──

/// Active cart for the owner, created on demand.
///
/// If the insert loses to a concurrent creator on the unique index, the
/// winner's cart is re-read and returned instead.
async fn resolve_or_create_cart(
    conn: &mut SqliteConnection,
    owner_id: i64,
) -> ServiceResult<Cart> {
    if let Some(cart) = store::find_active_cart_by_owner(conn, owner_id).await? {
        return Ok(cart);
    }
    match store::create_cart(conn, Some(owner_id)).await {
        Ok(cart) => Ok(cart),
        Err(err) if is_unique_violation(&err) => {
            let cart = store::find_active_cart_by_owner(conn, owner_id)
                .await?
                .ok_or(AppError::new(ErrorCode::CartConflict))?;
            Ok(cart)
        }
        Err(err) => Err(err.into()),
    }
}

/// Cart that may receive new items for this identity.
///
/// Accounts get their active cart (created on demand); guest tokens must
/// point at an existing, still-active cart.
async fn resolve_open_cart(conn: &mut SqliteConnection, identity: Identity) -> ServiceResult<Cart> {
    match identity {
        Identity::Account { id, .. } => resolve_or_create_cart(conn, id).await,
        Identity::Guest { cart_id } => {
            let cart = store::find_cart_by_id(conn, cart_id)
                .await?
                .ok_or(AppError::new(ErrorCode::CartNotFound))?;
            if !cart.is_active() {
                return Err(AppError::new(ErrorCode::CartClosed).into());
            }
            Ok(cart)
        }
    }
}

/// Existing open cart for this identity; never creates one.
///
/// Used by operations that only make sense against a cart that already
/// has content (update, remove, abandon).
async fn current_open_cart(conn: &mut SqliteConnection, identity: Identity) -> ServiceResult<Cart> {
    match identity {
        Identity::Account { id, .. } => {
            let cart = store::find_active_cart_by_owner(conn, id)
                .await?
                .ok_or(AppError::new(ErrorCode::NoActiveCart))?;
            Ok(cart)
        }
        Identity::Guest { cart_id } => {
            let cart = store::find_cart_by_id(conn, cart_id)
                .await?
                .ok_or(AppError::new(ErrorCode::CartNotFound))?;
            if !cart.is_active() {
                return Err(AppError::new(ErrorCode::CartClosed).into());
            }
            Ok(cart)
        }
    }
}

/// Attach entries (creation order) and their catalog items to the cart.
async fn load_cart_view(conn: &mut SqliteConnection, mut cart: Cart) -> ServiceResult<Cart> {
    let mut entries = store::list_entries(conn, cart.id).await?;

    let mut item_ids: Vec<i64> = entries.iter().map(|e| e.item_id).collect();
    item_ids.sort_unstable();
    item_ids.dedup();

    let items = store::get_items_by_ids(conn, &item_ids).await?;
    let by_id: HashMap<i64, Item> = items.into_iter().map(|item| (item.id, item)).collect();
    for entry in &mut entries {
        entry.item = by_id.get(&entry.item_id).cloned();
    }

    cart.entries = entries;
    Ok(cart)
}

/// Trim the note; an all-whitespace note collapses to None.
fn normalize_instructions(instructions: Option<String>) -> ServiceResult<Option<String>> {
    match instructions {
        None => Ok(None),
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.len() > MAX_INSTRUCTIONS_LEN {
                return Err(AppError::validation("Instructions are too long").into());
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests;
