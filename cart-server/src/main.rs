//! cart-server — Storefront cart service
//!
//! Long-running service that:
//! - Keeps one active cart per signed-in account
//! - Tracks anonymous guest carts addressed by token
//! - Merges a guest cart into an account cart at sign-in
//! - Provides admin visibility over all carts

mod api;
mod config;
mod db;
mod engine;
mod error;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cart_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting cart-server (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("cart-server HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
