//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Page size used when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound on requested page sizes; larger requests are capped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Page size when the request omits pageSize.
    pub default_page_size: u32,

    /// Largest page size a single request may ask for.
    pub max_page_size: u32,
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

        let default_page_size = env::var("DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .context("DEFAULT_PAGE_SIZE must be a valid u32")?;

        let max_page_size = env::var("MAX_PAGE_SIZE")
            .unwrap_or_else(|_| MAX_PAGE_SIZE.to_string())
            .parse()
            .context("MAX_PAGE_SIZE must be a valid u32")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            default_page_size,
            max_page_size,
        })
    }
}
