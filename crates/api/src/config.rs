// Server configuration
//
// Loaded once at startup from environment variables (and `.env` via dotenvy).

use anyhow::{bail, Result};
use axum::http::HeaderValue;
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_UPCOMING_EVENTS_LIMIT: i64 = 5;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration for the API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Postgres connection string, None in dev mode
    pub database_url: Option<String>,

    /// Use the in-memory store instead of Postgres
    pub dev_mode: bool,

    pub host: String,
    pub port: u16,

    /// Prefix for API routes, e.g. `/api` (health stays unprefixed)
    pub api_prefix: String,

    /// Origins allowed for cross-origin requests. Empty disables CORS.
    pub cors_allowed_origins: Vec<HeaderValue>,

    /// Default size of the upcoming events list
    pub upcoming_events_limit: i64,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,

    /// Postgres pool size
    pub max_connections: u32,
}

impl ServerConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `DATABASE_URL`: Postgres connection string (required unless `DEV_MODE`)
    /// - `DEV_MODE`: `true`/`1` runs on the in-memory store
    /// - `HOST` (default: 0.0.0.0), `PORT` (default: 9000)
    /// - `API_PREFIX`: Prefix for API routes (default: empty)
    /// - `CORS_ALLOWED_ORIGINS`: Comma separated origins
    /// - `UPCOMING_EVENTS_LIMIT`: Default upcoming list size (default: 5)
    /// - `RUN_MIGRATIONS`: Apply migrations on startup (default: true)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dev_mode = lookup("DEV_MODE").map(|v| is_truthy(&v)).unwrap_or(false);

        let database_url = lookup("DATABASE_URL").filter(|v| !v.is_empty());
        if database_url.is_none() && !dev_mode {
            bail!("DATABASE_URL environment variable required (or set DEV_MODE=true)");
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();

        let upcoming_events_limit = parse_or(
            &lookup,
            "UPCOMING_EVENTS_LIMIT",
            DEFAULT_UPCOMING_EVENTS_LIMIT,
        )
        .max(1);

        Ok(Self {
            database_url,
            dev_mode,
            host: lookup("HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            api_prefix: lookup("API_PREFIX").unwrap_or_default(),
            cors_allowed_origins,
            upcoming_events_limit,
            run_migrations: lookup("RUN_MIGRATIONS")
                .map(|v| is_truthy(&v))
                .unwrap_or(true),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
        })
    }

    /// Address for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            dev_mode: true,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_prefix: String::new(),
            cors_allowed_origins: Vec::new(),
            upcoming_events_limit: DEFAULT_UPCOMING_EVENTS_LIMIT,
            run_migrations: true,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid number, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_database_url_required_without_dev_mode() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_dev_mode_without_database() {
        let config = ServerConfig::from_lookup(lookup(&[("DEV_MODE", "1")])).unwrap();
        assert!(config.dev_mode);
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.upcoming_events_limit, 5);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/hoops"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("API_PREFIX", "/api"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com, https://b.example.com"),
            ("UPCOMING_EVENTS_LIMIT", "10"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert!(!config.dev_mode);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.cors_allowed_origins.len(), 2);
        assert_eq!(config.upcoming_events_limit, 10);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DEV_MODE", "true"),
            ("PORT", "not-a-port"),
            ("UPCOMING_EVENTS_LIMIT", "-3"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.upcoming_events_limit, 1);
    }
}
