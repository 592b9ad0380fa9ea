//! Database connection
//!
//! `Database` owns the pool and hands out fresh sessions. It is cheap to
//! clone; every clone shares the same pool.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::config::{Config, is_memory_url};
use crate::query::DbSession;
use crate::session::Session;

/// Database wrapper providing connection pool access
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = pool_options(url, max_connections)
            .connect(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        tracing::info!(url = %url, max_connections, "Database connected");
        Ok(Self { pool })
    }

    /// Connect using a loaded configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::connect(&config.database_url, config.max_connections).await
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a new, empty query session
    pub fn session(&self) -> DbSession {
        DbSession::new(self.pool.clone())
    }

    /// Start a new, empty session wrapped with the conditional helpers
    pub fn wrapped_session(&self) -> Session {
        Session::new(self.session())
    }
}

/// Pool options for `url`. An in-memory database keeps one connection open
/// for the life of the pool, since closing the last one drops its data.
fn pool_options(url: &str, max_connections: u32) -> SqlitePoolOptions {
    let options = SqlitePoolOptions::new().max_connections(max_connections);
    if is_memory_url(url) {
        options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options
    }
}
