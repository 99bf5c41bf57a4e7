//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Fallback key for the opaque-id codec when the environment does not
/// provide one. Fine for development; production sets OPAQUE_ID_KEY.
const DEFAULT_OPAQUE_ID_KEY: u64 = 0x9e37_79b9_7f4a_7c15;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Key for the opaque public-id codec.
    pub opaque_id_key: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let opaque_id_key = match env::var("OPAQUE_ID_KEY") {
            Ok(raw) => raw
                .trim()
                .parse()
                .context("OPAQUE_ID_KEY must be a valid u64")?,
            Err(_) => DEFAULT_OPAQUE_ID_KEY,
        };

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            opaque_id_key,
        })
    }
}
