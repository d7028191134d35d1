//! Process configuration, read once from the environment in `main`.

use std::net::SocketAddr;

use thiserror::Error;
use tracing::warn;

/// Insecure secret used when `JWT_SECRET` is not set.
pub const DEV_JWT_SECRET: &str = "dev-secret";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_EVENTS_TOPIC: &str = "company-events";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Postgres + Redis when true, in-memory store and bus otherwise.
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub redis_url: String,
    pub events_topic: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            var: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let use_persistent_stores = match lookup("USE_PERSISTENT_STORES") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                value: v,
            })?,
            None => false,
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    var: "DATABASE_MAX_CONNECTIONS",
                    value: v,
                })?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            use_persistent_stores,
            database_url,
            database_max_connections,
            redis_url: env_or("REDIS_URL", DEFAULT_REDIS_URL),
            events_topic: env_or("COMPANY_EVENTS_TOPIC", DEFAULT_EVENTS_TOPIC),
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("use_persistent_stores", &self.use_persistent_stores)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("database_max_connections", &self.database_max_connections)
            .field("redis_url", &self.redis_url)
            .field("events_topic", &self.events_topic)
            .finish()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_are_in_memory_dev_setup() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert!(!cfg.use_persistent_stores);
        assert_eq!(cfg.redis_url, "redis://localhost:6379");
        assert_eq!(cfg.events_topic, "company-events");
        assert_eq!(cfg.database_max_connections, 10);
    }

    #[test]
    fn persistent_mode_requires_database_url() {
        assert_eq!(
            config(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );

        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "1"),
            ("DATABASE_URL", "postgres://localhost/companies"),
            ("COMPANY_EVENTS_TOPIC", "companies"),
        ])
        .unwrap();
        assert!(cfg.use_persistent_stores);
        assert_eq!(cfg.events_topic, "companies");
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            config(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid { var: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid { var: "DATABASE_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(
            config(&[("USE_PERSISTENT_STORES", "maybe")]),
            Err(ConfigError::Invalid { var: "USE_PERSISTENT_STORES", .. })
        ));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = config(&[("JWT_SECRET", "hunter2")]).unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
