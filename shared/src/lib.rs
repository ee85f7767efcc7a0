//! Shared types for the cart service
//!
//! Common types used across crates: domain models, the unified error
//! framework, response structures, and ID/timestamp utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Error framework re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
