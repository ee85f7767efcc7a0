//! Shopper cart endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError};
use shared::models::{Cart, CartEntryUpdate, Identity};

use crate::state::AppState;

use super::ApiResult;

#[derive(Serialize)]
pub struct GuestCartResponse {
    /// Sent back as `X-Guest-Cart` on every following request
    pub cart_token: String,
    pub cart: Cart,
}

/// POST /api/guest/cart
///
/// Bootstrap endpoint for anonymous shoppers: creates an empty guest cart
/// and hands back its token.
pub async fn create_guest_cart(State(state): State<AppState>) -> ApiResult<GuestCartResponse> {
    let cart = state.engine.create_guest_cart().await?;
    Ok(Json(GuestCartResponse {
        cart_token: cart.id.to_string(),
        cart,
    }))
}

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Cart> {
    let cart = state.engine.get_cart(identity).await?;
    Ok(Json(cart))
}

/// POST /api/cart
///
/// Ensures the caller has an open cart and returns it. Account owners get
/// their active cart created on first call; a guest token resolves to the
/// cart it already names.
pub async fn open_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Cart> {
    let cart = match identity {
        Identity::Account { id, .. } => state.engine.get_or_create_active_cart(id).await?,
        Identity::Guest { .. } => state.engine.get_cart(identity).await?,
    };
    Ok(Json(cart))
}

/// POST /api/cart/items
#[derive(Deserialize)]
pub struct AddItemRequest {
    pub item_id: i64,
    /// Defaults to 1
    pub quantity: Option<i64>,
    pub instructions: Option<String>,
}

pub async fn add_item(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<AddItemRequest>,
) -> ApiResult<Cart> {
    let quantity = req.quantity.unwrap_or(1);
    let cart = state
        .engine
        .add_item(identity, req.item_id, quantity, req.instructions)
        .await?;
    Ok(Json(cart))
}

/// PATCH /api/cart/items/{entry_id}
pub async fn update_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(entry_id): Path<i64>,
    Json(update): Json<CartEntryUpdate>,
) -> ApiResult<Cart> {
    let cart = state.engine.update_entry(identity, entry_id, update).await?;
    Ok(Json(cart))
}

/// DELETE /api/cart/items/{entry_id}
pub async fn remove_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(entry_id): Path<i64>,
) -> ApiResult<Cart> {
    let cart = state.engine.remove_entry(identity, entry_id).await?;
    Ok(Json(cart))
}

/// POST /api/cart/complete
///
/// Checkout: freezes the cart. Payment and fulfillment are driven by the
/// caller after this returns the completed snapshot.
pub async fn complete_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Cart> {
    let cart = state.engine.complete_cart(identity).await?;
    Ok(Json(cart))
}

/// DELETE /api/cart
pub async fn delete_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<ApiResponse<()>, AppError> {
    state.engine.delete_cart(identity).await?;
    Ok(ApiResponse::ok())
}

/// POST /api/cart/merge
#[derive(Deserialize)]
pub struct MergeCartRequest {
    pub guest_cart_id: i64,
}

pub async fn merge_guest_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<MergeCartRequest>,
) -> ApiResult<Cart> {
    let Some(owner_id) = identity.account_id() else {
        return Err(AppError::permission_denied("Sign in to merge a guest cart"));
    };
    let cart = state
        .engine
        .merge_guest_cart_into_owner(req.guest_cart_id, owner_id)
        .await?;
    Ok(Json(cart))
}

/// GET /api/cart/history
pub async fn cart_history(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<Cart>> {
    let Some(owner_id) = identity.account_id() else {
        return Err(AppError::permission_denied("Sign in to view cart history"));
    };
    let carts = state.engine.list_carts(owner_id).await?;
    Ok(Json(carts))
}
