//! Service configuration
//!
//! Layered configuration in the usual order: compiled defaults, then an
//! optional `bridgesrv.toml`, then `BRIDGESRV_*` environment variables
//! (double underscore separates sections, e.g. `BRIDGESRV_SERVER__PORT`).

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use common::error::{BridgeError, Result};

/// Default command listener port
pub const DEFAULT_PORT: u16 = 9999;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional TOML file and the
    /// environment
    pub fn load_from(path: &Path) -> Result<Self> {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("BRIDGESRV_").split("__"))
            .extract()
            .map_err(|e| BridgeError::config(format!("failed to load configuration: {}", e)))
    }

    /// Listener address in `host:port` form
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Service identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            description: None,
        }
    }
}

/// Command listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host; the bridge is a local facility, so loopback by default
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bounded wait per accept attempt, so shutdown is observed promptly
    #[serde(default = "default_accept_timeout_ms")]
    pub accept_timeout_ms: u64,
    /// Maximum bytes read from a client in the single request read
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Optional per-connection deadline in milliseconds; 0 disables it
    #[serde(default)]
    pub request_timeout_ms: u64,
    #[serde(default = "default_backlog")]
    pub backlog: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            accept_timeout_ms: default_accept_timeout_ms(),
            read_buffer_size: default_read_buffer_size(),
            request_timeout_ms: 0,
            backlog: default_backlog(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Whether to write daily-rolling log files in addition to the console
    #[serde(default)]
    pub file_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            file_enabled: false,
        }
    }
}

fn default_service_name() -> String {
    "bridgesrv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_accept_timeout_ms() -> u64 {
    1000
}

fn default_read_buffer_size() -> usize {
    1024
}

fn default_backlog() -> u32 {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.service.name, "bridgesrv");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.accept_timeout_ms, 1000);
        assert_eq!(config.server.read_buffer_size, 1024);
        assert_eq!(config.server.request_timeout_ms, 0);
        assert_eq!(config.bind_address(), "127.0.0.1:9999");
        assert!(!config.logging.file_enabled);
    }

    #[test]
    fn test_load_from_toml_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bridgesrv.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"0.0.0.0\"\nport = 4242\n\n[logging]\nlevel = \"debug\"\n",
        )
        .expect("write config");

        let config = AppConfig::load_from(&path).expect("load config");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4242);
        assert_eq!(config.logging.level, "debug");
        // Untouched sections keep their defaults
        assert_eq!(config.server.read_buffer_size, 1024);
        assert_eq!(config.service.name, "bridgesrv");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("does_not_exist.toml");
        let config = AppConfig::load_from(&path).expect("load config");
        assert_eq!(config.server.port, DEFAULT_PORT);
    }
}
