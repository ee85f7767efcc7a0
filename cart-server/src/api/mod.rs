//! HTTP API for the cart service
//!
//! Three route groups share one router: shopper cart endpoints and admin
//! endpoints sit behind the identity middleware, while the guest cart
//! bootstrap and the health probe stay open.

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use shared::error::AppError;

use crate::state::AppState;

pub mod admin;
pub mod cart;
pub mod health;
pub mod identity;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

pub fn create_router(state: AppState) -> Router {
    let shopper_routes = Router::new()
        .route(
            "/api/cart",
            get(cart::get_cart)
                .post(cart::open_cart)
                .delete(cart::delete_cart),
        )
        .route("/api/cart/items", post(cart::add_item))
        .route(
            "/api/cart/items/{entry_id}",
            patch(cart::update_entry).delete(cart::remove_entry),
        )
        .route("/api/cart/complete", post(cart::complete_cart))
        .route("/api/cart/merge", post(cart::merge_guest_cart))
        .route("/api/cart/history", get(cart::cart_history))
        .layer(middleware::from_fn(identity::resolve_identity));

    let guest_routes = Router::new().route("/api/guest/cart", post(cart::create_guest_cart));

    let admin_routes = Router::new()
        .route("/api/admin/carts", get(admin::list_carts))
        .route("/api/admin/carts/{cart_id}", delete(admin::delete_cart))
        .layer(middleware::from_fn(identity::resolve_identity));

    Router::new()
        .merge(shopper_routes)
        .merge(guest_routes)
        .merge(admin_routes)
        .route("/health", get(health::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
