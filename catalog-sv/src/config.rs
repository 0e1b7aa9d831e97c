use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::db::schema::{DEFAULT_COLLECTION, DEFAULT_DATABASE};

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_DATABASE_URL: &str = "mongodb://127.0.0.1:27017";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { name: String, value: String },
    #[error("unknown STORE_BACKEND {0:?}, expected mongo or memory")]
    UnknownBackend(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub bind: String,
    pub database_url: String,
    pub database_name: String,
    pub collection: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub store: StoreBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where
            F: Fn(&str) -> Option<String>,
    {
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let timeout = |name: &str| -> Result<Duration, ConfigError> {
            match lookup(name) {
                None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
                Some(value) => value.trim().parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidTimeout { name: name.to_string(), value }),
            }
        };

        Ok(Config {
            bind: or_default("BIND_ADDR", DEFAULT_BIND),
            database_url: or_default("DATABASE_URL", DEFAULT_DATABASE_URL),
            database_name: or_default("DATABASE_NAME", DEFAULT_DATABASE),
            collection: or_default("MOVIES_COLLECTION", DEFAULT_COLLECTION),
            read_timeout: timeout("READ_TIMEOUT_SECS")?,
            write_timeout: timeout("WRITE_TIMEOUT_SECS")?,
            store: or_default("STORE_BACKEND", "mongo").parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_local_setup() {
        let cfg = config(&[]).unwrap();

        assert_eq!(cfg.bind, "127.0.0.1:8000");
        assert_eq!(cfg.database_url, "mongodb://127.0.0.1:27017");
        assert_eq!(cfg.database_name, "appdb");
        assert_eq!(cfg.collection, "movies");
        assert_eq!(cfg.read_timeout, Duration::from_secs(15));
        assert_eq!(cfg.write_timeout, Duration::from_secs(15));
        assert_eq!(cfg.store, StoreBackend::Mongo);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("DATABASE_NAME", "films"),
            ("READ_TIMEOUT_SECS", " 30 "),
            ("STORE_BACKEND", "Memory"),
        ]).unwrap();

        assert_eq!(cfg.bind, "0.0.0.0:9000");
        assert_eq!(cfg.database_name, "films");
        assert_eq!(cfg.read_timeout, Duration::from_secs(30));
        assert_eq!(cfg.store, StoreBackend::Memory);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(matches!(
            config(&[("WRITE_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            config(&[("STORE_BACKEND", "postgres")]),
            Err(ConfigError::UnknownBackend(_))
        ));
    }
}
