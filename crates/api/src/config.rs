//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use domain::{Catalog, CatalogError, ReservationStrategy};

/// Which counter store backs the reservation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterStoreKind {
    #[default]
    Redis,
    Memory,
}

impl std::str::FromStr for CounterStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CounterStoreKind::Redis),
            "memory" | "in-memory" => Ok(CounterStoreKind::Memory),
            other => Err(format!("unknown counter store '{other}'")),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `1245`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `COUNTER_STORE`: `redis` or `memory` (default: `redis`)
/// - `REDIS_URL`: Redis connection string (default: `"redis://127.0.0.1:6379"`)
/// - `RESERVATION_STRATEGY`: `atomic` or `read-then-write` (default: `atomic`)
/// - `CATALOG_PATH`: JSON catalog file (default: built-in suitcases)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub counter_store: CounterStoreKind,
    pub redis_url: String,
    pub reservation_strategy: ReservationStrategy,
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: parse_or_default("LOG_FORMAT", lookup("LOG_FORMAT")),
            counter_store: parse_or_default("COUNTER_STORE", lookup("COUNTER_STORE")),
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            reservation_strategy: parse_or_default(
                "RESERVATION_STRATEGY",
                lookup("RESERVATION_STRATEGY"),
            ),
            catalog_path: lookup("CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Loads the configured catalog file, or the built-in catalog.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::suitcases()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1245,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            counter_store: CounterStoreKind::default(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            reservation_strategy: ReservationStrategy::default(),
            catalog_path: None,
        }
    }
}

fn parse_or_default<T>(key: &str, value: Option<String>) -> T
where
    T: std::str::FromStr<Err = String> + Default,
{
    match value.map(|v| v.parse::<T>()) {
        Some(Ok(parsed)) => parsed,
        Some(Err(reason)) => {
            tracing::warn!(%key, %reason, "invalid configuration value, using default");
            T::default()
        }
        None => T::default(),
    }
}
