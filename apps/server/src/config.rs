//! Server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                   | Default           |
//! |----------------------------|-------------------|
//! | `OPTIC_HTTP_PORT`          | `8080`            |
//! | `OPTIC_BIND_ADDR`          | `0.0.0.0`         |
//! | `OPTIC_DATABASE_PATH`      | `./data/optic.db` |
//! | `OPTIC_DB_MAX_CONNECTIONS` | `5`               |
//! | `OPTIC_SHOP_NAME`          | `Lens Optic`      |
//! | `OPTIC_CURRENCY_SYMBOL`    | `$`               |
//! | `OPTIC_UTC_OFFSET_MINUTES` | `0`               |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use optic_db::DbConfig;
use optic_print::RenderOptions;
use serde::Serialize;

/// Largest accepted UTC offset, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

/// Server configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Interface to bind
    pub bind_addr: IpAddr,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Shop name printed in the receipt title
    pub shop_name: String,

    /// Prefix for amounts on printed receipts
    pub currency_symbol: String,

    /// Offset applied to the printed receipt date
    pub utc_offset_minutes: i32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = ServerConfig {
            http_port: parse(&lookup, "OPTIC_HTTP_PORT", 8080)?,
            bind_addr: parse(&lookup, "OPTIC_BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?,
            database_path: PathBuf::from(text("OPTIC_DATABASE_PATH", "./data/optic.db")),
            db_max_connections: parse(&lookup, "OPTIC_DB_MAX_CONNECTIONS", 5)?,
            shop_name: text("OPTIC_SHOP_NAME", "Lens Optic"),
            currency_symbol: text("OPTIC_CURRENCY_SYMBOL", "$"),
            utc_offset_minutes: parse(&lookup, "OPTIC_UTC_OFFSET_MINUTES", 0)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::OutOfRange("OPTIC_DB_MAX_CONNECTIONS".to_string()));
        }

        if config.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::OutOfRange("OPTIC_UTC_OFFSET_MINUTES".to_string()));
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }

    /// Pool settings for the configured database file.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }

    /// Presentation settings for printed receipts.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            currency_symbol: self.currency_symbol.clone(),
            utc_offset_minutes: self.utc_offset_minutes,
            ..RenderOptions::for_shop(&self.shop_name)
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(value) if !value.is_empty() => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        _ => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Value out of range for {0}")]
    OutOfRange(String),
}
