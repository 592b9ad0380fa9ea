//! Database configuration management

use std::env;

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Database configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite connection URL (e.g. `sqlite://data/app.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pool size
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: default_max_connections(DEFAULT_DATABASE_URL),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if any).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid DATABASE_MAX_CONNECTIONS '{}'", raw))?,
            None => default_max_connections(&database_url),
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

/// Whether the URL names an in-memory database, which is gone once its last
/// connection closes.
pub(crate) fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn default_max_connections(database_url: &str) -> u32 {
    if is_memory_url(database_url) {
        1
    } else {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_single_memory_connection() {
        let config = Config::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_file_database_gets_pool() {
        let config = Config::from_lookup(lookup_in(&[("DATABASE_URL", "sqlite://data/app.db")]))
            .unwrap();
        assert_eq!(config.database_url, "sqlite://data/app.db");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_explicit_max_connections() {
        let config = Config::from_lookup(lookup_in(&[("DATABASE_MAX_CONNECTIONS", "4")])).unwrap();
        assert_eq!(config.max_connections, 4);

        let err = Config::from_lookup(lookup_in(&[("DATABASE_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_memory_url_detection() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:shared?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://data/app.db"));
    }
}
