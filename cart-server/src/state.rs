//! Shared application state.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::config::Config;
use crate::engine::CartEngine;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub engine: CartEngine,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(config.store_timeout_ms))
            .journal_mode(SqliteJournalMode::Wal);

        // A single connection serializes all cart mutations: two requests
        // touching the same cart never interleave, the loser just waits.
        // Waiters past the acquire timeout get a retryable timeout error.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(config.store_timeout_ms))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let engine = CartEngine::new(pool.clone());

        Ok(AppState { pool, engine })
    }
}
