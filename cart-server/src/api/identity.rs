//! Identity resolution middleware
//!
//! The engine never authenticates, it receives a resolved identity. An
//! upstream gateway terminates real authentication and forwards the
//! result in trusted headers:
//! - `X-Account-Id` (plus optional `X-Account-Role`) for signed-in accounts
//! - `X-Guest-Cart` carrying the guest cart token

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderMap;
use shared::error::AppError;
use shared::models::{Identity, Role};

pub async fn resolve_identity(mut request: Request, next: Next) -> Result<Response, AppError> {
    let identity = identity_from_headers(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Build an [`Identity`] from the gateway headers.
///
/// An account header wins over a guest token when both are present (the
/// shopper just signed in and the client has not dropped its token yet).
fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, AppError> {
    if let Some(value) = headers.get("x-account-id") {
        let id: i64 = value
            .to_str()
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| AppError::invalid_request("Invalid X-Account-Id header"))?;

        let role = match headers.get("x-account-role") {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(Role::from_name)
                .ok_or_else(|| AppError::invalid_request("Invalid X-Account-Role header"))?,
            None => Role::Customer,
        };

        return Ok(Identity::Account { id, role });
    }

    if let Some(value) = headers.get("x-guest-cart") {
        let cart_id: i64 = value
            .to_str()
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| AppError::invalid_request("Invalid X-Guest-Cart header"))?;
        return Ok(Identity::Guest { cart_id });
    }

    Err(AppError::not_authenticated())
}
