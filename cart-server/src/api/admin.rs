//! Admin cart management endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Cart, Identity};

use crate::state::AppState;

use super::ApiResult;

fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if !identity.is_admin() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(())
}

/// GET /api/admin/carts
#[derive(Deserialize)]
pub struct ListCartsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub async fn list_carts(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListCartsQuery>,
) -> ApiResult<Vec<Cart>> {
    require_admin(&identity)?;

    let per_page = query.per_page.unwrap_or(20).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let carts = state.engine.list_all_carts(per_page, offset).await?;
    Ok(Json(carts))
}

/// DELETE /api/admin/carts/{cart_id}
pub async fn delete_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(cart_id): Path<i64>,
) -> Result<ApiResponse<()>, AppError> {
    require_admin(&identity)?;
    state.engine.delete_cart_by_id(cart_id).await?;
    Ok(ApiResponse::ok())
}
