// src/config.rs
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "properties.sqlite3";
pub const DEFAULT_SCHEMA_PATH: &str = "sql/schema.sql";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_WORKERS: usize = 8;
pub const DEFAULT_GEOCODE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Google Maps API key is required (set GOOGLE_MAPS_API_KEY)")]
    MissingApiKey,
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for both the map widget and the geocoding API.
    /// Absence is not fatal to the process, only to the map screens.
    pub maps_api_key: Option<String>,
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub geocode_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let maps_api_key = lookup("GOOGLE_MAPS_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let database_path =
            lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        let schema_path = lookup("SCHEMA_PATH").unwrap_or_else(|| DEFAULT_SCHEMA_PATH.to_string());

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let max_workers = parse_or("MAX_WORKERS", lookup("MAX_WORKERS"), DEFAULT_MAX_WORKERS)?;
        if max_workers == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_WORKERS",
                value: "0".into(),
            });
        }

        let timeout_secs = parse_or(
            "GEOCODE_TIMEOUT_SECS",
            lookup("GEOCODE_TIMEOUT_SECS"),
            DEFAULT_GEOCODE_TIMEOUT_SECS,
        )?;

        Ok(Self {
            maps_api_key,
            database_path,
            schema_path,
            bind_addr,
            max_workers,
            geocode_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// The credential, or the configuration error the map screens display.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.maps_api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
