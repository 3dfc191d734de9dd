//! Server configuration read from the environment.

use flow_valve_core::params::FlowValveDefaults;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const ADDR_VAR: &str = "FLOW_VALVE_ADDR";
pub const DEFAULTS_VAR: &str = "FLOW_VALVE_DEFAULTS";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FLOW_VALVE_ADDR is not a socket address: {0}")]
    InvalidAddr(String),

    #[error("Cannot read defaults file {path:?}: {source}")]
    DefaultsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid defaults file {path:?}: {source}")]
    DefaultsParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Starting values for every command session.
    pub defaults: FlowValveDefaults,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `lookup` returns `None` for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;

        let defaults = match lookup(DEFAULTS_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let json = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::DefaultsIo {
                        path: path.clone(),
                        source,
                    }
                })?;
                FlowValveDefaults::from_json(&json)
                    .map_err(|source| ConfigError::DefaultsParse { path, source })?
            }
            None => FlowValveDefaults::default(),
        };

        Ok(Self { addr, defaults })
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
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.defaults, FlowValveDefaults::default());
    }

    #[test]
    fn test_custom_addr() {
        let config = ServerConfig::from_lookup(lookup(&[(ADDR_VAR, "0.0.0.0:8080")])).unwrap();
        assert_eq!(config.addr.port(), 8080);
    }

    #[test]
    fn test_invalid_addr() {
        let err = ServerConfig::from_lookup(lookup(&[(ADDR_VAR, "not-an-addr")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr(_)));
    }

    #[test]
    fn test_missing_defaults_file() {
        let err = ServerConfig::from_lookup(lookup(&[(DEFAULTS_VAR, "/nonexistent/flow-valve.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsIo { .. }));
    }

    #[test]
    fn test_defaults_file_loaded() {
        let path = std::env::temp_dir().join(format!("flow-valve-defaults-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"length": 250, "hole_count": 8}"#).unwrap();

        let config =
            ServerConfig::from_lookup(lookup(&[(DEFAULTS_VAR, path.to_str().unwrap())])).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.defaults.length, 250.0);
        assert_eq!(config.defaults.hole_count, 8.0);
        assert_eq!(config.defaults.main_diameter, 40.0);
    }
}
