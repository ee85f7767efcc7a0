//! Data models
//!
//! Shared between cart-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod cart;
pub mod identity;
pub mod item;

// Re-exports
pub use cart::*;
pub use identity::*;
pub use item::*;
