//! Process configuration: server bind address, database settings, CORS policy.

use crate::error::ConfigError;
use axum::http::{HeaderName, HeaderValue, Method};
use sqlx::postgres::PgConnectOptions;
use tower_http::cors::CorsLayer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connection settings handed to storage-backed modules. Nothing in this crate opens a pool.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("port", &self.port)
            .finish()
    }
}

/// Comma-separated lists exactly as read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allow_origins: String,
    pub allow_methods: String,
    pub allow_headers: String,
}

impl CorsConfig {
    /// Build the tower-http layer. `*` in origins allows any origin.
    pub fn layer(&self) -> Result<CorsLayer, ConfigError> {
        let methods = split_list(&self.allow_methods)
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes()).map_err(|e| ConfigError::Cors {
                    key: "CORS_ALLOW_METHODS",
                    reason: format!("{}: {}", m, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let headers = split_list(&self.allow_headers)
            .map(|h| {
                HeaderName::from_bytes(h.as_bytes()).map_err(|e| ConfigError::Cors {
                    key: "CORS_ALLOW_HEADERS",
                    reason: format!("{}: {}", h, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let layer = CorsLayer::new().allow_methods(methods).allow_headers(headers);

        if split_list(&self.allow_origins).any(|o| o == "*") {
            return Ok(layer.allow_origin(tower_http::cors::Any));
        }
        let origins = split_list(&self.allow_origins)
            .map(|o| {
                HeaderValue::from_str(o).map_err(|e| ConfigError::Cors {
                    key: "CORS_ALLOW_ORIGINS",
                    reason: format!("{}: {}", o, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(layer.allow_origin(origins))
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
