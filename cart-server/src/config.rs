//! Server configuration loaded from environment variables.

use std::env;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// How long a request may wait for the store before giving up (ms)
    pub store_timeout_ms: u64,
    /// Deployment environment name (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, applying defaults
    /// where a variable is unset.
    ///
    /// The on-disk default for `DATABASE_URL` only applies in development;
    /// anywhere else the deployment must say where the store lives.
    pub fn from_env() -> Result<Self, BoxError> {
        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                if environment != "development" {
                    return Err(
                        format!("DATABASE_URL must be set in {environment} environment").into(),
                    );
                }
                "sqlite://cart-server.db".to_string()
            }
        };

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        let store_timeout_ms = env::var("STORE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        Ok(Config {
            database_url,
            http_port,
            store_timeout_ms,
            environment,
        })
    }
}
