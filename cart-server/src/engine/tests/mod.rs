use super::*;
use crate::error::ServiceError;
use shared::models::Role;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Engine backed by a fresh in-memory database with migrations and the
/// seed catalog (items 1..8) applied.
async fn test_engine() -> CartEngine {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    CartEngine::new(pool)
}

fn account(id: i64) -> Identity {
    Identity::Account {
        id,
        role: Role::Customer,
    }
}

fn guest(cart_id: i64) -> Identity {
    Identity::Guest { cart_id }
}

/// Registry code carried by a failed operation.
fn error_code(err: ServiceError) -> ErrorCode {
    AppError::from(err).code
}
