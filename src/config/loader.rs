//! Build [`Config`] from the process environment, falling back to defaults.

use crate::config::types::{Config, CorsConfig, DatabaseConfig, ServerConfig};
use crate::error::ConfigError;

pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PASSWORD: &str = "postgres";
pub const DEFAULT_DB_NAME: &str = "app_db";
pub const DEFAULT_DB_PORT: &str = "5432";
pub const DEFAULT_CORS_ALLOW_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_CORS_ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
pub const DEFAULT_CORS_ALLOW_HEADERS: &str = "Origin,Content-Type,Accept,Authorization";

impl Config {
    /// Read `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or empty values take the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, fallback: &str| -> String {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Ok(Config {
            server: ServerConfig {
                host: get("HOST", DEFAULT_HOST),
                port: parse_port("PORT", get("PORT", DEFAULT_PORT))?,
            },
            database: DatabaseConfig {
                host: get("DB_HOST", DEFAULT_DB_HOST),
                user: get("DB_USER", DEFAULT_DB_USER),
                password: get("DB_PASSWORD", DEFAULT_DB_PASSWORD),
                name: get("DB_NAME", DEFAULT_DB_NAME),
                port: parse_port("DB_PORT", get("DB_PORT", DEFAULT_DB_PORT))?,
            },
            cors: CorsConfig {
                allow_origins: get("CORS_ALLOW_ORIGINS", DEFAULT_CORS_ALLOW_ORIGINS),
                allow_methods: get("CORS_ALLOW_METHODS", DEFAULT_CORS_ALLOW_METHODS),
                allow_headers: get("CORS_ALLOW_HEADERS", DEFAULT_CORS_ALLOW_HEADERS),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.into(),
                port: 8080,
            },
            database: DatabaseConfig {
                host: DEFAULT_DB_HOST.into(),
                user: DEFAULT_DB_USER.into(),
                password: DEFAULT_DB_PASSWORD.into(),
                name: DEFAULT_DB_NAME.into(),
                port: 5432,
            },
            cors: CorsConfig {
                allow_origins: DEFAULT_CORS_ALLOW_ORIGINS.into(),
                allow_methods: DEFAULT_CORS_ALLOW_METHODS.into(),
                allow_headers: DEFAULT_CORS_ALLOW_HEADERS.into(),
            },
        }
    }
}

fn parse_port(key: &'static str, value: String) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
